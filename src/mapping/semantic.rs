//! Query-parameter dialect: `?w=300&h=200&fit=cover&fm=webp&q=80`.

use super::{EditMapper, MapperError, RequestStyle, map_fit, map_format, map_resize};
use crate::edits::{ImageEdits, merge_edits};
use crate::request::RequestDescriptor;
use tracing::{debug, warn};

/// Parameters that must appear at most once per request.
const RESERVED_PARAMS: [&str; 5] = ["h", "w", "fit", "fm", "q"];

/// Vector sources are passed through untouched.
const SVG_EXTENSION: &str = "svg";

#[derive(Debug, Clone, Copy, Default)]
pub struct SemanticMapper;

impl SemanticMapper {
    pub fn new() -> Self {
        Self
    }

    /// Reserved keys that carry more than one value, in `RESERVED_PARAMS` order.
    fn repeated_params(request: &RequestDescriptor) -> Vec<String> {
        RESERVED_PARAMS
            .iter()
            .filter(|key| request.values(key).len() > 1)
            .map(|key| key.to_string())
            .collect()
    }
}

impl EditMapper for SemanticMapper {
    fn style(&self) -> RequestStyle {
        RequestStyle::Semantic
    }

    fn map_to_edits(&self, request: &RequestDescriptor) -> Result<ImageEdits, MapperError> {
        let original_format = request.extension();

        if original_format.is_some_and(|ext| ext.eq_ignore_ascii_case(SVG_EXTENSION)) {
            debug!(path = %request.path, "svg source, skipping edits");
            return Ok(ImageEdits::new());
        }

        let repeated = Self::repeated_params(request);
        if !repeated.is_empty() {
            warn!(path = %request.path, params = ?repeated, "rejecting repeated query parameters");
            return Err(MapperError::MultipleValuesNotAllowed(repeated));
        }

        let edits = merge_edits([
            map_format(request.query("fm"), request.query("q"), original_format),
            map_resize(request.query("w"), request.query("h")),
            map_fit(request.query("fit")),
        ]);

        debug!(
            style = %self.style(),
            path = %request.path,
            edits = ?edits.keys().collect::<Vec<_>>(),
            "mapped request"
        );
        Ok(edits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{edits_from_json, request};
    use serde_json::json;

    fn map(req: &RequestDescriptor) -> ImageEdits {
        SemanticMapper::new().map_to_edits(req).unwrap()
    }

    #[test]
    fn width_height_and_format() {
        let req = RequestDescriptor::from_uri("/photos/dawn.png?w=300&h=200&fm=webp&q=80");
        assert_eq!(
            map(&req),
            edits_from_json(json!({
                "toFormat": "webp",
                "webp": {"quality": 80},
                "resize": {"width": 300, "height": 200}
            }))
        );
    }

    #[test]
    fn explicit_fit_overrides_implicit_inside() {
        let req = RequestDescriptor::from_uri("/dawn.jpg?w=300&fit=cover");
        assert_eq!(
            map(&req),
            edits_from_json(json!({
                "resize": {"width": 300, "height": null, "fit": "cover"}
            }))
        );
    }

    #[test]
    fn thumb_alias_without_dimensions() {
        let req = RequestDescriptor::from_uri("/dawn.jpg?fit=thumb");
        assert_eq!(map(&req), edits_from_json(json!({"resize": {"fit": "cover"}})));
    }

    #[test]
    fn quality_only_uses_original_extension() {
        let req = RequestDescriptor::from_uri("/dawn.png?q=55");
        assert_eq!(map(&req), edits_from_json(json!({"png": {"quality": 55}})));
    }

    #[test]
    fn jpg_target_defaults_quality() {
        let req = RequestDescriptor::from_uri("/dawn.png?fm=jpg");
        assert_eq!(
            map(&req),
            edits_from_json(json!({"toFormat": "jpg", "jpeg": {"quality": 60}}))
        );
    }

    #[test]
    fn svg_bypasses_everything() {
        let req = RequestDescriptor::from_uri("/logo.SVG?w=300&fm=png&q=10");
        assert!(map(&req).is_empty());
    }

    #[test]
    fn svg_bypass_wins_over_repeated_params() {
        let req = RequestDescriptor::from_uri("/logo.svg?w=1&w=2");
        assert!(map(&req).is_empty());
    }

    #[test]
    fn repeated_reserved_param_is_rejected() {
        let req = request("/dawn.jpg", &[("w", "300")], &[("h", &["10", "20"][..])]);
        let err = SemanticMapper::new().map_to_edits(&req).unwrap_err();
        assert!(matches!(
            err,
            MapperError::MultipleValuesNotAllowed(ref keys) if keys == &["h".to_string()]
        ));
    }

    #[test]
    fn every_reserved_param_is_checked() {
        for key in RESERVED_PARAMS {
            let req = request("/dawn.jpg", &[], &[(key, &["1", "2"][..])]);
            let err = SemanticMapper::new().map_to_edits(&req).unwrap_err();
            assert!(
                matches!(
                    err,
                    MapperError::MultipleValuesNotAllowed(ref keys) if keys == &[key.to_string()]
                ),
                "{key} should be rejected"
            );
        }
    }

    #[test]
    fn all_repeated_params_are_reported() {
        let req = RequestDescriptor::from_uri("/dawn.jpg?q=1&w=1&q=2&w=2");
        let err = SemanticMapper::new().map_to_edits(&req).unwrap_err();
        assert!(matches!(
            err,
            MapperError::MultipleValuesNotAllowed(ref keys) if keys == &["w", "q"]
        ));
    }

    #[test]
    fn hex_width_is_honoured() {
        let req = RequestDescriptor::from_uri("/dawn.jpg?w=0x10");
        assert_eq!(
            map(&req),
            edits_from_json(json!({"resize": {"width": 16, "height": null, "fit": "inside"}}))
        );
    }

    #[test]
    fn repeated_unreserved_param_is_fine() {
        let req = RequestDescriptor::from_uri("/dawn.jpg?w=100&tag=a&tag=b");
        assert_eq!(
            map(&req),
            edits_from_json(json!({
                "resize": {"width": 100, "height": null, "fit": "inside"}
            }))
        );
    }

    #[test]
    fn single_multi_value_entry_is_fine() {
        let req = request("/dawn.jpg", &[("w", "10")], &[("w", &["10"][..])]);
        assert!(!map(&req).is_empty());
    }

    #[test]
    fn no_parameters_is_no_edit() {
        assert!(map(&RequestDescriptor::from_uri("/dawn.jpg")).is_empty());
    }
}
