use serde::Deserialize;

/// Tunables of the collection query engine.
///
/// Deserializable so hosts can embed it in their own settings file; every
/// field falls back to its default when missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Page size used when a request names none (or zero).
    pub default_per_page: u32,
    /// Upper bound for a requested page size.
    pub max_per_page: u32,
    /// Filters longer than this many bytes are rejected (empty result).
    pub max_filter_length: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_per_page: 25,
            max_per_page: 1000,
            max_filter_length: 10_000,
        }
    }
}
