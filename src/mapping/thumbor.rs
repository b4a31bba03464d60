//! Minimal Thumbor-style path dialect: `/fit-in/300x200/photos/dawn.jpg`.
//!
//! Only the resize part of the Thumbor URL grammar is understood. The first
//! `WxH` segment sets the dimensions (either side may be empty or 0) and a
//! `fit-in` segment asks for the image to fit inside the box. Filters, crops
//! and smart-cropping segments are ignored.

use super::fit::fit_edit;
use super::{EditMapper, MapperError, RequestStyle, map_resize};
use crate::edits::{ImageEdits, merge_edits};
use crate::request::RequestDescriptor;
use crate::types::FitMode;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static DIMENSIONS_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d*)x(\d*)$").expect("static regex"));

const FIT_IN_SEGMENT: &str = "fit-in";

#[derive(Debug, Clone, Copy, Default)]
pub struct ThumborMapper;

impl ThumborMapper {
    pub fn new() -> Self {
        Self
    }

    fn map_dimensions(path: &str) -> ImageEdits {
        path.split('/')
            .find_map(|segment| DIMENSIONS_SEGMENT.captures(segment))
            .map(|caps| {
                map_resize(
                    caps.get(1).map(|m| m.as_str()),
                    caps.get(2).map(|m| m.as_str()),
                )
            })
            .unwrap_or_default()
    }

    fn map_fit_in(path: &str) -> ImageEdits {
        if path.split('/').any(|segment| segment == FIT_IN_SEGMENT) {
            fit_edit(FitMode::Inside)
        } else {
            ImageEdits::new()
        }
    }
}

impl EditMapper for ThumborMapper {
    fn style(&self) -> RequestStyle {
        RequestStyle::Thumbor
    }

    fn map_to_edits(&self, request: &RequestDescriptor) -> Result<ImageEdits, MapperError> {
        let edits = merge_edits([
            Self::map_dimensions(&request.path),
            Self::map_fit_in(&request.path),
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
    use crate::test_helpers::edits_from_json;
    use serde_json::json;

    fn map(uri: &str) -> ImageEdits {
        ThumborMapper::new()
            .map_to_edits(&RequestDescriptor::from_uri(uri))
            .unwrap()
    }

    #[test]
    fn dimensions_segment() {
        assert_eq!(
            map("/300x200/photos/dawn.jpg"),
            edits_from_json(json!({"resize": {"width": 300, "height": 200}}))
        );
    }

    #[test]
    fn fit_in_with_dimensions() {
        assert_eq!(
            map("/fit-in/300x200/dawn.jpg"),
            edits_from_json(json!({"resize": {"width": 300, "height": 200, "fit": "inside"}}))
        );
    }

    #[test]
    fn open_side_fits_inside() {
        assert_eq!(
            map("/300x/dawn.jpg"),
            edits_from_json(json!({"resize": {"width": 300, "height": null, "fit": "inside"}}))
        );
        assert_eq!(
            map("/0x120/dawn.jpg"),
            edits_from_json(json!({"resize": {"width": null, "height": 120, "fit": "inside"}}))
        );
    }

    #[test]
    fn zero_by_zero_is_no_edit() {
        assert!(map("/0x0/dawn.jpg").is_empty());
        assert!(map("/x/dawn.jpg").is_empty());
    }

    #[test]
    fn first_dimension_segment_wins() {
        assert_eq!(
            map("/10x20/40x50/dawn.jpg"),
            edits_from_json(json!({"resize": {"width": 10, "height": 20}}))
        );
    }

    #[test]
    fn filename_is_not_a_dimension() {
        assert!(map("/photos/300x200.jpg").is_empty());
    }

    #[test]
    fn plain_path_is_no_edit() {
        assert!(map("/photos/dawn.jpg").is_empty());
    }
}
