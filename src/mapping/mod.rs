//! Request dialects and the field mappers they are built from.
//!
//! | Dialect | Mapper | Reads |
//! |---|---|---|
//! | **semantic** | [`SemanticMapper`] | `w`, `h`, `fit`, `fm`, `q` query parameters |
//! | **custom** | [`CustomMapper`] | `w=`/`h=` tokens in a rewritten legacy path |
//! | **thumbor** | [`ThumborMapper`] | `WxH` and `fit-in` path segments |
//!
//! Each dialect runs independent field mappers ([`map_resize`], [`map_fit`],
//! [`map_format`]) and folds their fragments with
//! [`merge_edits`](crate::edits::merge_edits). Field mappers never see each
//! other's output, so the merge order alone decides which value wins.

mod custom;
mod fit;
mod format;
mod params;
mod resize;
mod semantic;
mod thumbor;

pub use custom::{CustomMapper, RewriteRule};
pub use fit::map_fit;
pub use format::{DEFAULT_JPEG_QUALITY, map_format};
pub use params::parse_leading_int;
pub use resize::map_resize;
pub use semantic::SemanticMapper;
pub use thumbor::ThumborMapper;

use crate::config::MapperConfig;
use crate::edits::ImageEdits;
use crate::request::RequestDescriptor;
use crate::types::UnknownToken;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MapperError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(MissingItem),
    #[error("Multiple values for the same parameter are not allowed: {}", .0.join(", "))]
    MultipleValuesNotAllowed(Vec<String>),
    #[error("Invalid rewrite pattern: {0}")]
    InvalidRewritePattern(#[from] regex::Error),
}

/// What was absent when a rewrite was attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingItem {
    Path,
    RewriteMatchPattern,
    RewriteSubstitution,
}

impl fmt::Display for MissingItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MissingItem::Path => "request path is undefined",
            MissingItem::RewriteMatchPattern => "rewrite match pattern is undefined",
            MissingItem::RewriteSubstitution => "rewrite substitution is undefined",
        })
    }
}

/// Which request dialect a deployment serves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStyle {
    Custom,
    #[default]
    Semantic,
    Thumbor,
}

impl RequestStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            RequestStyle::Custom => "custom",
            RequestStyle::Semantic => "semantic",
            RequestStyle::Thumbor => "thumbor",
        }
    }
}

impl fmt::Display for RequestStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStyle {
    type Err = UnknownToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            RequestStyle::Custom,
            RequestStyle::Semantic,
            RequestStyle::Thumbor,
        ]
        .into_iter()
        .find(|style| style.as_str().eq_ignore_ascii_case(s))
        .ok_or_else(|| UnknownToken(s.to_string()))
    }
}

/// A request dialect: turns one request into one edit instruction.
///
/// Implementations hold only immutable configuration, so a single mapper can
/// serve concurrent requests.
pub trait EditMapper: Send + Sync {
    /// The dialect this mapper implements.
    fn style(&self) -> RequestStyle;

    /// Map a request to edits. Mapping is all-or-nothing.
    fn map_to_edits(&self, request: &RequestDescriptor) -> Result<ImageEdits, MapperError>;
}

/// Construct the mapper for the configured request style.
///
/// Fails only if a configured rewrite pattern does not compile.
pub fn build_mapper(config: &MapperConfig) -> Result<Box<dyn EditMapper>, MapperError> {
    let mapper: Box<dyn EditMapper> = match config.request_style {
        RequestStyle::Custom => Box::new(CustomMapper::new(&config.rewrite)?),
        RequestStyle::Semantic => Box::new(SemanticMapper::new()),
        RequestStyle::Thumbor => Box::new(ThumborMapper::new()),
    };
    Ok(mapper)
}
