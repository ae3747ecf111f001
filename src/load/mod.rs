//! Tabular loading - flatten heterogeneous records into one CSV schema
//!
//! Records fetched for different hashtags rarely share the same shape. The
//! loader flattens each record into dotted paths, takes the union of every
//! path as the column set, sorts it alphabetically and writes one row per
//! record with empty cells for missing columns.

pub mod flatten;
pub mod sink;
pub mod csv_loader;

pub use flatten::{DotFlattener, Flattener};
pub use sink::{CsvSink, RowSink};
pub use csv_loader::CsvLoader;
