//! Normalized request descriptor shared by every mapper.
//!
//! A [`RequestDescriptor`] is built either from an API Gateway / Lambda proxy
//! event (`path`, `queryStringParameters`, `multiValueQueryStringParameters`)
//! or from a raw request URI such as `/photos/dawn.jpg?w=300&fm=webp`.
//! Both maps may be absent in the event (`null`); they deserialize as empty.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use url::form_urlencoded;

/// URL path plus parsed query parameters for a single image request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDescriptor {
    pub path: String,
    /// Last value seen for each query key.
    #[serde(
        default,
        alias = "queryStringParameters",
        deserialize_with = "null_as_default"
    )]
    pub query_parameters: BTreeMap<String, String>,
    /// Every value seen for each query key, in request order.
    #[serde(
        default,
        alias = "multiValueQueryStringParameters",
        deserialize_with = "null_as_default"
    )]
    pub multi_value_query_parameters: BTreeMap<String, Vec<String>>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl RequestDescriptor {
    /// Build a descriptor from a path and an already-decoded query string.
    ///
    /// Single-valued parameters keep the last occurrence of a key, matching
    /// what API Gateway does for `queryStringParameters`.
    pub fn new(path: impl Into<String>, query: &str) -> Self {
        let mut query_parameters = BTreeMap::new();
        let mut multi_value_query_parameters: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            query_parameters.insert(key.to_string(), value.to_string());
            multi_value_query_parameters
                .entry(key.into_owned())
                .or_default()
                .push(value.into_owned());
        }

        Self {
            path: path.into(),
            query_parameters,
            multi_value_query_parameters,
        }
    }

    /// Split a request URI into path and query and parse the query.
    ///
    /// A fragment, if present, is dropped.
    pub fn from_uri(uri: &str) -> Self {
        let uri = uri.split_once('#').map_or(uri, |(before, _)| before);
        match uri.split_once('?') {
            Some((path, query)) => Self::new(path, query),
            None => Self::new(uri, ""),
        }
    }

    /// Single-valued lookup; empty strings count as present.
    pub fn query(&self, key: &str) -> Option<&str> {
        self.query_parameters.get(key).map(String::as_str)
    }

    /// All values supplied for `key` in the multi-value channel.
    pub fn values(&self, key: &str) -> &[String] {
        self.multi_value_query_parameters
            .get(key)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Text after the last `.` in the path, or `None` when there is no dot.
    pub fn extension(&self) -> Option<&str> {
        self.path.rsplit_once('.').map(|(_, ext)| ext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_uri_splits_path_and_query() {
        let req = RequestDescriptor::from_uri("/images/dawn.jpg?w=300&h=200");
        assert_eq!(req.path, "/images/dawn.jpg");
        assert_eq!(req.query("w"), Some("300"));
        assert_eq!(req.query("h"), Some("200"));
        assert_eq!(req.query("fit"), None);
    }

    #[test]
    fn from_uri_without_query() {
        let req = RequestDescriptor::from_uri("/dawn.png");
        assert_eq!(req.path, "/dawn.png");
        assert!(req.query_parameters.is_empty());
        assert!(req.multi_value_query_parameters.is_empty());
    }

    #[test]
    fn from_uri_drops_fragment() {
        let req = RequestDescriptor::from_uri("/dawn.png?w=10#top");
        assert_eq!(req.query("w"), Some("10"));
    }

    #[test]
    fn repeated_keys_collect_in_multi_value_channel() {
        let req = RequestDescriptor::from_uri("/a.jpg?h=10&h=20");
        assert_eq!(req.values("h"), ["10", "20"]);
        assert_eq!(req.query("h"), Some("20"));
    }

    #[test]
    fn query_values_are_percent_decoded() {
        let req = RequestDescriptor::from_uri("/a.jpg?fm=we%62p&x=a+b");
        assert_eq!(req.query("fm"), Some("webp"));
        assert_eq!(req.query("x"), Some("a b"));
    }

    #[test]
    fn values_of_missing_key_is_empty() {
        let req = RequestDescriptor::from_uri("/a.jpg");
        assert!(req.values("w").is_empty());
    }

    #[test]
    fn extension_is_text_after_last_dot() {
        assert_eq!(RequestDescriptor::from_uri("/a.b/c.SVG").extension(), Some("SVG"));
        assert_eq!(RequestDescriptor::from_uri("/plain").extension(), None);
    }

    #[test]
    fn deserializes_lambda_event_with_null_maps() {
        let event = r#"{
            "path": "/dawn.jpg",
            "queryStringParameters": null,
            "multiValueQueryStringParameters": null
        }"#;
        let req: RequestDescriptor = serde_json::from_str(event).unwrap();
        assert_eq!(req.path, "/dawn.jpg");
        assert!(req.query_parameters.is_empty());
    }

    #[test]
    fn deserializes_lambda_event_with_parameters() {
        let event = r#"{
            "path": "/dawn.jpg",
            "queryStringParameters": {"w": "300"},
            "multiValueQueryStringParameters": {"h": ["10", "20"]}
        }"#;
        let req: RequestDescriptor = serde_json::from_str(event).unwrap();
        assert_eq!(req.query("w"), Some("300"));
        assert_eq!(req.values("h"), ["10", "20"]);
    }
}
