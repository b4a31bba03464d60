//! Fit token → `resize.fit` edit.

use crate::edits::ImageEdits;
use crate::types::FitMode;

/// Legacy alias accepted for [`FitMode::Cover`].
const THUMB_ALIAS: &str = "thumb";

/// Map a `fit` query token to a `resize.fit` fragment.
///
/// Unknown or absent tokens produce no edit.
pub fn map_fit(token: Option<&str>) -> ImageEdits {
    let mode = match token {
        Some(THUMB_ALIAS) => Some(FitMode::Cover),
        Some(token) => token.parse::<FitMode>().ok(),
        None => None,
    };

    match mode {
        Some(mode) => fit_edit(mode),
        None => ImageEdits::new(),
    }
}

pub(crate) fn fit_edit(mode: FitMode) -> ImageEdits {
    ImageEdits::new().with("resize", ImageEdits::new().with("fit", mode.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::edits_from_json;
    use serde_json::json;

    #[test]
    fn thumb_is_cover() {
        assert_eq!(
            map_fit(Some("thumb")),
            edits_from_json(json!({"resize": {"fit": "cover"}}))
        );
    }

    #[test]
    fn known_modes_pass_through() {
        for mode in FitMode::ALL {
            let edits = map_fit(Some(mode.as_str()));
            let fit = edits.pointer(&["resize", "fit"]).and_then(|v| v.as_str());
            assert_eq!(fit, Some(mode.as_str()));
        }
    }

    #[test]
    fn unknown_or_absent_is_no_edit() {
        assert!(map_fit(Some("bogus")).is_empty());
        assert!(map_fit(Some("")).is_empty());
        assert!(map_fit(Some("COVER")).is_empty());
        assert!(map_fit(None).is_empty());
    }
}
