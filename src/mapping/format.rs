//! Target format and quality → `toFormat` and per-format option bags.

use super::params::parse_leading_int;
use crate::edits::ImageEdits;
use crate::types::ImageFormat;

/// JPEG quality applied when a JPEG target is requested without `q`.
pub const DEFAULT_JPEG_QUALITY: i64 = 60;

/// Map the `fm` (target format) and `q` (quality) parameters.
///
/// `original_format` is the extension of the requested file; it keys the
/// quality option bag when no explicit target format is given. Empty
/// parameter values count as not supplied.
///
/// The raw `fm` string is used both for `toFormat` and as the quality key,
/// except for the JPEG default, which is always keyed `"jpeg"`.
pub fn map_format(
    target: Option<&str>,
    quality: Option<&str>,
    original_format: Option<&str>,
) -> ImageEdits {
    let target = target.filter(|t| !t.is_empty());
    let quality = quality.filter(|q| !q.is_empty());
    let mut edits = ImageEdits::new();

    if let Some(target) = target {
        edits.insert("toFormat", target);
    }

    let format = target.or(original_format).filter(|f| !f.is_empty());
    if let (Some(format), Some(quality)) = (format, quality.and_then(parse_leading_int)) {
        edits.insert(format, ImageEdits::new().with("quality", quality));
    }

    // Exact lowercase spellings only; "JPG" gets no default.
    let jpeg_target = matches!(target, Some("jpg" | "jpeg"));
    if jpeg_target && quality.is_none() {
        edits.insert(
            ImageFormat::Jpeg.as_str(),
            ImageEdits::new().with("quality", DEFAULT_JPEG_QUALITY),
        );
    }

    edits
}
