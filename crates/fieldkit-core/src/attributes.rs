//! Attribute lists carried by areas, sub-areas and labels.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Key used for the presentation category of a feature.
pub const CATEGORY: &str = "category";

/// Key used for the automatic text of an attributed label.
pub const AUTO_LABEL: &str = "auto_label";

/// An ordered set of named attribute values.
///
/// Keys are stable and iteration order is deterministic, so attribute sets
/// compare and serialize reproducibly.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AttributeSet {
    values: BTreeMap<String, String>,
}

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set holding only the presentation category.
    pub fn with_category(category: impl Into<String>) -> Self {
        let mut set = Self::new();
        set.set(CATEGORY, category);
        set
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Presentation category, if set.
    pub fn category(&self) -> Option<&str> {
        self.get(CATEGORY)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Overlays `other` on top of this set, keeping unmentioned keys.
    pub fn merge(&mut self, other: &AttributeSet) {
        for (k, v) in other.iter() {
            self.set(k, v);
        }
    }
}
