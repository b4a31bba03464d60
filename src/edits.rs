//! Edit instructions and the deep-merge routine that combines them.
//!
//! Every field mapper produces a sparse [`ImageEdits`] fragment: the resize
//! mapper only knows about `resize.width` / `resize.height`, the fit mapper
//! only about `resize.fit`, the format mapper only about `toFormat` and the
//! per-format option bags. The fragments are folded together with
//! [`merge_edits`] into the single instruction set handed to the image engine.
//!
//! ## Merge Rules
//!
//! | base value | overlay value | result |
//! |---|---|---|
//! | list | list | union, first occurrence order kept |
//! | map | map | recursive merge |
//! | anything | anything else | overlay wins |
//!
//! Keys present in only one operand are carried through untouched, so a merge
//! never loses information. Scalar conflicts resolve last-writer-wins, which
//! keeps the fold associative.
//!
//! ## Wire Shape
//!
//! `ImageEdits` serializes to plain JSON objects, the shape the downstream
//! engine consumes:
//!
//! ```json
//! { "toFormat": "webp", "webp": { "quality": 80 },
//!   "resize": { "width": 300, "height": null, "fit": "inside" } }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single value inside an edit instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EditValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<EditValue>),
    Map(ImageEdits),
}

impl EditValue {
    pub fn as_map(&self) -> Option<&ImageEdits> {
        match self {
            EditValue::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            EditValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            EditValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<i64> for EditValue {
    fn from(value: i64) -> Self {
        EditValue::Int(value)
    }
}

impl From<u32> for EditValue {
    fn from(value: u32) -> Self {
        EditValue::Int(value.into())
    }
}

impl From<bool> for EditValue {
    fn from(value: bool) -> Self {
        EditValue::Bool(value)
    }
}

impl From<f64> for EditValue {
    fn from(value: f64) -> Self {
        EditValue::Float(value)
    }
}

impl From<&str> for EditValue {
    fn from(value: &str) -> Self {
        EditValue::Text(value.to_string())
    }
}

impl From<String> for EditValue {
    fn from(value: String) -> Self {
        EditValue::Text(value)
    }
}

impl From<ImageEdits> for EditValue {
    fn from(value: ImageEdits) -> Self {
        EditValue::Map(value)
    }
}

impl<T: Into<EditValue>> From<Option<T>> for EditValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(EditValue::Null)
    }
}

impl<T: Into<EditValue>> From<Vec<T>> for EditValue {
    fn from(value: Vec<T>) -> Self {
        EditValue::List(value.into_iter().map(Into::into).collect())
    }
}

/// A (possibly partial) set of image edits keyed by edit name.
///
/// Keys are kept sorted so serialized output is stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageEdits(BTreeMap<String, EditValue>);

impl ImageEdits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, used by the field mappers to assemble fragments.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<EditValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<EditValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&EditValue> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Look up a nested value by path, e.g. `["resize", "fit"]`.
    pub fn pointer(&self, path: &[&str]) -> Option<&EditValue> {
        let (first, rest) = path.split_first()?;
        let value = self.get(first)?;
        if rest.is_empty() {
            Some(value)
        } else {
            value.as_map()?.pointer(rest)
        }
    }
}

impl FromIterator<(String, EditValue)> for ImageEdits {
    fn from_iter<I: IntoIterator<Item = (String, EditValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for ImageEdits {
    type Item = (String, EditValue);
    type IntoIter = std::collections::btree_map::IntoIter<String, EditValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Merge `overlay` on top of `base`.
///
/// - Lists are unioned (base elements first, duplicates from overlay dropped).
/// - Maps are merged key-by-key, recursively.
/// - Any other combination: the overlay value replaces the base value.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_pair(base: ImageEdits, overlay: ImageEdits) -> ImageEdits {
    let mut merged = base.0;
    for (key, overlay_val) in overlay.0 {
        let value = match merged.remove(&key) {
            Some(base_val) => merge_values(base_val, overlay_val),
            None => overlay_val,
        };
        merged.insert(key, value);
    }
    ImageEdits(merged)
}

fn merge_values(base: EditValue, overlay: EditValue) -> EditValue {
    match (base, overlay) {
        (EditValue::List(mut items), EditValue::List(extra)) => {
            for item in extra {
                if !items.contains(&item) {
                    items.push(item);
                }
            }
            dedup_in_place(&mut items);
            EditValue::List(items)
        }
        (EditValue::Map(base_map), EditValue::Map(overlay_map)) => {
            EditValue::Map(merge_pair(base_map, overlay_map))
        }
        (_, overlay) => overlay,
    }
}

/// The base list may itself carry duplicates; a union never does.
fn dedup_in_place(items: &mut Vec<EditValue>) {
    let mut seen: Vec<EditValue> = Vec::with_capacity(items.len());
    items.retain(|item| {
        if seen.contains(item) {
            false
        } else {
            seen.push(item.clone());
            true
        }
    });
}

/// Fold an ordered sequence of edit fragments left to right.
pub fn merge_edits<I>(edits: I) -> ImageEdits
where
    I: IntoIterator<Item = ImageEdits>,
{
    edits.into_iter().fold(ImageEdits::new(), merge_pair)
}
