//! City name entity
//!
//! Produced by geocoding and consumed as an opaque key by the weather lookup.

use serde::Serialize;

/// Non-empty city label as returned by the geocoding provider
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CityName(String);

impl CityName {
    /// Returns `None` for an empty label; no other normalization is applied.
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        if name.is_empty() {
            None
        } else {
            Some(Self(name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CityName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
