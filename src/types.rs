//! Enumerations understood by the downstream image engine.
//!
//! These are the closed sets the mappers validate tokens against. Their
//! string forms are exactly the tokens the engine expects in an edit
//! instruction, so they serialize in lowercase.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How an image is scaled into the requested box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    /// Crop to cover both dimensions.
    Cover,
    /// Letterbox inside both dimensions.
    Contain,
    /// Stretch, ignoring aspect ratio.
    Fill,
    /// Shrink to fit inside, preserving aspect ratio.
    Inside,
    /// Grow to cover, preserving aspect ratio.
    Outside,
}

impl FitMode {
    pub const ALL: [FitMode; 5] = [
        FitMode::Cover,
        FitMode::Contain,
        FitMode::Fill,
        FitMode::Inside,
        FitMode::Outside,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FitMode::Cover => "cover",
            FitMode::Contain => "contain",
            FitMode::Fill => "fill",
            FitMode::Inside => "inside",
            FitMode::Outside => "outside",
        }
    }
}

impl fmt::Display for FitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-sensitive: `"Cover"` is not a fit mode.
impl FromStr for FitMode {
    type Err = UnknownToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FitMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| UnknownToken(s.to_string()))
    }
}

/// Image file formats recognised from a path extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpg,
    Jpeg,
    Png,
    Webp,
    Tiff,
    Heif,
    Heic,
    Raw,
    Gif,
    Avif,
}

impl ImageFormat {
    pub const ALL: [ImageFormat; 10] = [
        ImageFormat::Jpg,
        ImageFormat::Jpeg,
        ImageFormat::Png,
        ImageFormat::Webp,
        ImageFormat::Tiff,
        ImageFormat::Heif,
        ImageFormat::Heic,
        ImageFormat::Raw,
        ImageFormat::Gif,
        ImageFormat::Avif,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ImageFormat::Jpg => "jpg",
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Png => "png",
            ImageFormat::Webp => "webp",
            ImageFormat::Tiff => "tiff",
            ImageFormat::Heif => "heif",
            ImageFormat::Heic => "heic",
            ImageFormat::Raw => "raw",
            ImageFormat::Gif => "gif",
            ImageFormat::Avif => "avif",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive: `"PNG"` and `"png"` are the same format.
impl FromStr for ImageFormat {
    type Err = UnknownToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ImageFormat::ALL
            .into_iter()
            .find(|format| format.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownToken(s.to_string()))
    }
}

/// A token that is not part of the enumerated set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown token: {0}")]
pub struct UnknownToken(pub String);
