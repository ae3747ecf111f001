use serde_json::{Map, Value};

/// A single heterogeneous record, one per fetched status.
///
/// Values may be scalars or nested objects/arrays; no two records are
/// required to share the same keys.
pub type Record = Map<String, Value>;

/// Configuration for per-hashtag extraction
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// String-typed field holding the record's base-10 i64 identifier
    pub id_field: String,

    /// Field added to every record naming the hashtag it was fetched under.
    /// Overwrites a source field of the same name.
    pub provenance_field: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        ExtractConfig {
            id_field: String::from("id_str"),
            provenance_field: String::from("hashtag"),
        }
    }
}

/// Configuration for flattening nested records into single-level rows
#[derive(Debug, Clone)]
pub struct FlattenConfig {
    /// Separator placed between the segments of a nested path
    pub separator: String,

    /// Maximum nesting depth to expand; deeper sub-trees become a JSON cell
    pub max_depth: usize,
}

impl Default for FlattenConfig {
    fn default() -> Self {
        FlattenConfig {
            separator: String::from("."),
            max_depth: 32,
        }
    }
}

impl FlattenConfig {
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
