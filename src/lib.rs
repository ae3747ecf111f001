//! # Meshify - Hashtag to CSV export
//!
//! Extracts a bounded number of unique tweets per hashtag from the Twitter
//! search API and writes them as one flattened CSV table.
//!
//! ## Modules
//!
//! - **extract**: quota-bounded, cursor-paginated fetching, one thread per hashtag
//! - **load**: flattening of heterogeneous records into a single sorted CSV schema
//! - **etl**: the extract → load driver
//! - **twitter**: the search API client used as the default fetcher
//!
//! ## Quick Start
//!
//! ```rust
//! use meshify::etl::hashtags_to_csv;
//! use meshify::Record;
//! use serde_json::json;
//!
//! # fn main() -> anyhow::Result<()> {
//! // Any `Fn(&str, usize, Option<i64>)` can stand in for the search API
//! let fetcher = |_hashtag: &str, _count: usize, max_id: Option<i64>| -> anyhow::Result<Vec<Record>> {
//!     if max_id.is_some() {
//!         return Ok(Vec::new());
//!     }
//!     let status = json!({"id_str": "10", "user": {"name": "Alice"}});
//!     Ok(vec![status.as_object().cloned().unwrap()])
//! };
//!
//! let mut out: Vec<u8> = Vec::new();
//! hashtags_to_csv(&mut out, fetcher, 5, ["#IoT"]).run()?;
//!
//! assert_eq!(String::from_utf8(out)?, "hashtag,id_str,user.name\n#IoT,10,Alice\n");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod etl;
pub mod extract;
pub mod load;
pub mod twitter;
pub mod types;

// Re-export commonly used types for convenience
pub use error::EtlError;
pub use etl::{hashtags_to_csv, Etl, Extractor, Loader, NoopExtractor, NoopLoader};
pub use extract::{extract_hashtag, HashtagExtractor, HashtagFetcher};
pub use load::{CsvLoader, CsvSink, DotFlattener, Flattener, RowSink};
pub use twitter::TwitterApi;
pub use types::{ExtractConfig, FlattenConfig, Record};
