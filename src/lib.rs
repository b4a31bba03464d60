//! # Edit Mapper
//!
//! Turns image requests into declarative edit instructions for an image
//! engine. A request arrives as a URL path plus query parameters; the mapper
//! reads dimensions, fit, format and quality from it and returns a nested
//! edit object such as:
//!
//! ```json
//! { "resize": { "width": 300, "height": null, "fit": "inside" },
//!   "toFormat": "webp", "webp": { "quality": 80 } }
//! ```
//!
//! The mapper never touches pixels. Whatever executes the edits lives
//! downstream.
//!
//! # Request Dialects
//!
//! A deployment serves exactly one dialect, chosen by configuration:
//!
//! ```text
//! semantic   /photos/dawn.jpg?w=300&fit=cover&fm=webp&q=80
//! custom     /300x200/photos/dawn.jpg   (rewritten by a configured regex first)
//! thumbor    /fit-in/300x200/photos/dawn.jpg
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`request`] | `RequestDescriptor`: path + single/multi-value query parameters |
//! | [`edits`] | `ImageEdits` value tree and the deep-merge routine |
//! | [`mapping`] | The three dialects and their field mappers (resize, fit, format) |
//! | [`types`] | Fit modes and image formats understood by the engine |
//! | [`config`] | Layered `edit-mapper.toml` + environment configuration |
//!
//! # Design Decisions
//!
//! ## Fragments, Then Merge
//!
//! Each field mapper looks at one concern and returns a sparse fragment. The
//! fragments are deep-merged left to right with last-writer-wins on scalar
//! conflicts. This keeps every mapper independently testable and makes
//! precedence explicit: in the semantic dialect an explicit `fit=cover` wins
//! over the `inside` implied by a single dimension because the fit mapper
//! runs after the resize mapper.
//!
//! ## Permissive Numbers
//!
//! Width, height and quality are read with leading-integer semantics
//! (`"300px"` is 300). Anything without leading digits is treated as absent,
//! never as an error. The only request-level error is a repeated reserved
//! parameter in the semantic dialect.
//!
//! ## Explicit Configuration
//!
//! The custom dialect's rewrite rule is handed to the mapper at construction.
//! Environment variables are read once, by the caller, through
//! [`config::load_config`].

pub mod config;
pub mod edits;
pub mod mapping;
pub mod request;
pub mod types;

pub use edits::{EditValue, ImageEdits, merge_edits};
pub use mapping::{EditMapper, MapperError, RequestStyle, build_mapper};
pub use request::RequestDescriptor;

#[cfg(test)]
pub(crate) mod test_helpers;
