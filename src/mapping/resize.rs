//! Width/height → `resize` edit.

use super::params::parse_dimension;
use crate::edits::ImageEdits;
use crate::types::FitMode;

/// Build the `resize` fragment from raw width and height candidates.
///
/// A dimension of 0 means "unspecified", never a zero-size request:
///
/// | width | height | result |
/// |---|---|---|
/// | 0 | 0 | no edit |
/// | w | 0 | `{width: w, height: null, fit: "inside"}` |
/// | 0 | h | `{width: null, height: h, fit: "inside"}` |
/// | w | h | `{width: w, height: h}` |
pub fn map_resize(width: Option<&str>, height: Option<&str>) -> ImageEdits {
    let width = parse_dimension(width);
    let height = parse_dimension(height);

    if width == 0 && height == 0 {
        return ImageEdits::new();
    }

    let mut resize = ImageEdits::new()
        .with("width", non_zero(width))
        .with("height", non_zero(height));
    if width == 0 || height == 0 {
        resize.insert("fit", FitMode::Inside.as_str());
    }

    ImageEdits::new().with("resize", resize)
}

fn non_zero(value: i64) -> Option<i64> {
    (value != 0).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::edits_from_json;
    use serde_json::json;

    #[test]
    fn both_zero_is_no_edit() {
        assert!(map_resize(Some("0"), Some("0")).is_empty());
        assert!(map_resize(None, None).is_empty());
        assert!(map_resize(Some(""), Some("abc")).is_empty());
    }

    #[test]
    fn width_only_fits_inside() {
        assert_eq!(
            map_resize(Some("300"), None),
            edits_from_json(json!({"resize": {"width": 300, "height": null, "fit": "inside"}}))
        );
    }

    #[test]
    fn height_only_fits_inside() {
        assert_eq!(
            map_resize(Some("0"), Some("200")),
            edits_from_json(json!({"resize": {"width": null, "height": 200, "fit": "inside"}}))
        );
    }

    #[test]
    fn both_dimensions_have_no_fit() {
        let edits = map_resize(Some("300"), Some("200"));
        assert_eq!(
            edits,
            edits_from_json(json!({"resize": {"width": 300, "height": 200}}))
        );
        assert!(edits.pointer(&["resize", "fit"]).is_none());
    }

    #[test]
    fn non_numeric_side_counts_as_zero() {
        assert_eq!(
            map_resize(Some("300px"), Some("tall")),
            edits_from_json(json!({"resize": {"width": 300, "height": null, "fit": "inside"}}))
        );
    }

    #[test]
    fn hex_dimension() {
        assert_eq!(
            map_resize(Some("0x10"), Some("0x20")),
            edits_from_json(json!({"resize": {"width": 16, "height": 32}}))
        );
    }

    #[test]
    fn dimension_grid() {
        for w in [0i64, 1, 640] {
            for h in [0i64, 1, 480] {
                let edits = map_resize(Some(&w.to_string()), Some(&h.to_string()));
                match (w, h) {
                    (0, 0) => assert!(edits.is_empty()),
                    (0, _) | (_, 0) => {
                        assert_eq!(
                            edits.pointer(&["resize", "fit"]).and_then(|v| v.as_str()),
                            Some("inside")
                        );
                    }
                    _ => {
                        let width = edits.pointer(&["resize", "width"]);
                        let height = edits.pointer(&["resize", "height"]);
                        assert_eq!(width.and_then(|v| v.as_int()), Some(w));
                        assert_eq!(height.and_then(|v| v.as_int()), Some(h));
                    }
                }
            }
        }
    }
}
