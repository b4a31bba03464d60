//! Shared test utilities for the edit-mapper test suite.
//!
//! Provides request builders and an edits constructor that reads expected
//! shapes from `serde_json::json!` literals, so assertions show the wire
//! format the engine receives.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let req = request("/dawn.jpg", &[("w", "300")], &[("h", &["10", "20"][..])]);
//! let expected = edits_from_json(json!({"resize": {"fit": "cover"}}));
//! ```

use crate::config::RewriteConfig;
use crate::edits::ImageEdits;
use crate::request::RequestDescriptor;

// =========================================================================
// Builders
// =========================================================================

/// Build edits from a JSON literal. Panics if the value is not an object.
pub fn edits_from_json(value: serde_json::Value) -> ImageEdits {
    serde_json::from_value(value.clone())
        .unwrap_or_else(|e| panic!("not an edits object: {value} ({e})"))
}

/// Build a request with explicit single- and multi-value channels.
///
/// The channels are independent, mirroring how API Gateway fills them.
pub fn request(
    path: &str,
    query: &[(&str, &str)],
    multi: &[(&str, &[&str])],
) -> RequestDescriptor {
    RequestDescriptor {
        path: path.to_string(),
        query_parameters: query
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        multi_value_query_parameters: multi
            .iter()
            .map(|(k, vs)| (k.to_string(), vs.iter().map(|v| v.to_string()).collect()))
            .collect(),
    }
}

/// Rewrite config with both options set.
pub fn rewrite_config(pattern: &str, substitution: &str) -> RewriteConfig {
    RewriteConfig {
        match_pattern: Some(pattern.to_string()),
        substitution: Some(substitution.to_string()),
    }
}
