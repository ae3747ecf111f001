use crate::error::{EtlError, Result};
use crate::etl::Loader;
use crate::load::flatten::{DotFlattener, Flattener};
use crate::load::sink::{CsvSink, RowSink};
use crate::types::Record;
use anyhow::Context;
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Loads records as CSV rows with alphabetically sorted columns.
///
/// Columns are the union of every flattened field name across all records.
/// A record missing a column gets an empty cell there.
pub struct CsvLoader<S> {
    flattener: Box<dyn Flattener>,
    sink: S,
}

impl<W: Write> CsvLoader<CsvSink<W>> {
    /// Create a loader writing CSV to `out`
    pub fn new(out: W) -> Self {
        CsvLoader::with_sink(CsvSink::new(out))
    }
}

impl CsvLoader<CsvSink<File>> {
    /// Create (or truncate) a CSV file at `path` and load into it
    pub fn create<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("could not open file: {}", path.display()))?;
        Ok(CsvLoader::new(file))
    }
}

impl<S: RowSink> CsvLoader<S> {
    pub fn with_sink(sink: S) -> Self {
        CsvLoader {
            flattener: Box::new(DotFlattener::default()),
            sink,
        }
    }

    /// Replace the default dotted-path flattener
    pub fn with_flattener(mut self, flattener: impl Flattener + 'static) -> Self {
        self.flattener = Box::new(flattener);
        self
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Flatten every record, write a header and one row per record, then flush.
    ///
    /// Flattening happens up front, so a flattening failure writes nothing.
    pub fn load_records(&mut self, records: &[Record]) -> Result<()> {
        let flattened = records
            .iter()
            .map(|record| self.flattener.flatten(record))
            .collect::<anyhow::Result<Vec<Record>>>()
            .map_err(EtlError::Flatten)?;

        let columns = columns_for_records(&flattened);
        let index: HashMap<&str, usize> = columns
            .iter()
            .enumerate()
            .map(|(i, column)| (column.as_str(), i))
            .collect();

        self.sink.write_row(&columns).map_err(EtlError::Sink)?;

        for record in &flattened {
            let mut row = vec![String::new(); columns.len()];
            for (key, value) in record {
                row[index[key.as_str()]] = render_cell(value);
            }
            self.sink.write_row(&row).map_err(EtlError::Sink)?;
        }

        self.sink.flush().map_err(EtlError::Sink)?;

        info!(
            rows = flattened.len(),
            columns = columns.len(),
            "wrote CSV export"
        );

        Ok(())
    }
}

impl<S: RowSink> Loader for CsvLoader<S> {
    fn load(&mut self, records: &[Record]) -> Result<()> {
        self.load_records(records)
    }
}

/// Sorted union of field names; records may not share the same keys
fn columns_for_records(records: &[Record]) -> Vec<String> {
    let unique: BTreeSet<&str> = records
        .iter()
        .flat_map(|record| record.keys().map(String::as_str))
        .collect();

    unique.into_iter().map(str::to_string).collect()
}

/// Render a flattened value as a CSV cell; null becomes an empty cell
fn render_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    fn memory_loader() -> CsvLoader<Vec<Vec<String>>> {
        CsvLoader::with_sink(Vec::new())
    }

    fn rows(loader: CsvLoader<Vec<Vec<String>>>) -> Vec<Vec<String>> {
        loader.into_sink()
    }

    #[test]
    fn test_flattener_error_is_returned_and_nothing_written() {
        let mut loader = memory_loader().with_flattener(|_: &Record| -> anyhow::Result<Record> {
            Err(anyhow::anyhow!("flattener error"))
        });

        let err = loader.load(&[record(json!({"key": "value"}))]).unwrap_err();

        assert!(matches!(err, EtlError::Flatten(_)));
        assert_eq!(err.to_string(), "flattener error");
        assert!(loader.sink().is_empty());
    }

    /// Records rows until `fail_at`, then refuses every write
    struct BrokenSink {
        rows: Vec<Vec<String>>,
        fail_at: usize,
        flushed: bool,
    }

    impl RowSink for BrokenSink {
        fn write_row(&mut self, row: &[String]) -> anyhow::Result<()> {
            if self.rows.len() >= self.fail_at {
                return Err(anyhow::anyhow!("sink closed"));
            }
            self.rows.push(row.to_vec());
            Ok(())
        }

        fn flush(&mut self) -> anyhow::Result<()> {
            self.flushed = true;
            Ok(())
        }
    }

    #[test]
    fn test_sink_error_stops_rows_and_flush() {
        let sink = BrokenSink {
            rows: Vec::new(),
            fail_at: 1,
            flushed: false,
        };
        let mut loader = CsvLoader::with_sink(sink);

        let err = loader
            .load(&[record(json!({"id_str": "1"})), record(json!({"id_str": "2"}))])
            .unwrap_err();

        assert!(matches!(err, EtlError::Sink(_)));
        assert_eq!(err.to_string(), "failed to write output: sink closed");
        let sink = loader.into_sink();
        assert_eq!(sink.rows, vec![vec!["id_str".to_string()]]);
        assert!(!sink.flushed);
    }

    #[test]
    fn test_empty_input_csv_is_bare_newline() {
        let mut out: Vec<u8> = Vec::new();
        {
            let mut loader = CsvLoader::new(&mut out);
            loader.load(&[]).unwrap();
        }

        assert_eq!(out, b"\n");
    }

    #[test]
    fn test_always_writes_records_plus_header() {
        let mut loader = memory_loader();

        loader.load(&[record(json!({"key": "value1"}))]).unwrap();

        assert_eq!(rows(loader).len(), 2);
    }

    #[test]
    fn test_empty_input_writes_header_only() {
        let mut loader = memory_loader();

        loader.load(&[]).unwrap();

        let rows = rows(loader);
        assert_eq!(rows.len(), 1);
        assert!(rows[0].is_empty());
    }

    #[test]
    fn test_columns_sorted_alphabetically() {
        let mut loader = memory_loader();

        loader
            .load(&[record(json!({
                "z": "z value",
                "x": "x value",
                "y": "y value",
                "a": "a value",
                "b": "b value",
                "c": "c value"
            }))])
            .unwrap();

        let rows = rows(loader);
        assert_eq!(rows[0], vec!["a", "b", "c", "x", "y", "z"]);
        assert_eq!(
            rows[1],
            vec!["a value", "b value", "c value", "x value", "y value", "z value"]
        );
    }

    #[test]
    fn test_heterogeneous_records_leave_empty_cells() {
        let mut loader = memory_loader();

        loader
            .load(&[record(json!({"z": 1, "a": 2})), record(json!({"m": 3}))])
            .unwrap();

        let rows = rows(loader);
        assert_eq!(rows[0], vec!["a", "m", "z"]);
        assert_eq!(rows[1], vec!["2", "", "1"]);
        assert_eq!(rows[2], vec!["", "3", ""]);
    }

    #[test]
    fn test_column_order_independent_of_record_order() {
        let first = record(json!({"b": 1, "user": {"name": "x"}}));
        let second = record(json!({"a": 2}));

        let mut forward = memory_loader();
        forward.load(&[first.clone(), second.clone()]).unwrap();
        let mut backward = memory_loader();
        backward.load(&[second, first]).unwrap();

        assert_eq!(rows(forward)[0], rows(backward)[0]);
    }

    #[test]
    fn test_cell_rendering() {
        let mut loader = memory_loader();

        loader
            .load(&[record(json!({
                "count": 42,
                "ratio": 0.5,
                "flag": true,
                "missing": null,
                "text": "plain",
                "user": {"id": 7}
            }))])
            .unwrap();

        let rows = rows(loader);
        assert_eq!(rows[0], vec!["count", "flag", "missing", "ratio", "text", "user.id"]);
        assert_eq!(rows[1], vec!["42", "true", "", "0.5", "plain", "7"]);
    }

    #[test]
    fn test_csv_output_round_trips() {
        let mut out: Vec<u8> = Vec::new();
        {
            let mut loader = CsvLoader::new(&mut out);
            loader
                .load(&[
                    record(json!({"id_str": "1", "text": "hello, world"})),
                    record(json!({"id_str": "2", "user": {"name": "Bob"}})),
                ])
                .unwrap();
        }

        let mut reader = csv::Reader::from_reader(out.as_slice());
        let header = reader.headers().unwrap().clone();
        assert_eq!(header, vec!["id_str", "text", "user.name"]);

        let body: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(body.len(), 2);
        assert_eq!(body[0], vec!["1", "hello, world", ""]);
        assert_eq!(body[1], vec!["2", "", "Bob"]);
    }

    #[test]
    fn test_create_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tweets.csv");

        let mut loader = CsvLoader::create(&path).unwrap();
        loader.load(&[record(json!({"id_str": "1"}))]).unwrap();
        drop(loader);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "id_str\n1\n");
    }

    #[test]
    fn test_create_fails_for_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("tweets.csv");

        assert!(CsvLoader::create(&path).is_err());
    }
}
