use anyhow::{anyhow, Context, Result};
use std::io::Write;

/// Destination for tabular rows, written one at a time and flushed once
pub trait RowSink {
    fn write_row(&mut self, row: &[String]) -> Result<()>;

    fn flush(&mut self) -> Result<()>;
}

/// CSV sink over any writer.
///
/// A row with zero columns is written as a bare line terminator. `csv::Writer`
/// on its own writes `""` for such a row, which reads back as one empty column.
pub struct CsvSink<W: Write> {
    writer: Option<csv::Writer<W>>,
}

impl<W: Write> CsvSink<W> {
    pub fn new(out: W) -> Self {
        CsvSink {
            writer: Some(csv::Writer::from_writer(out)),
        }
    }

    /// Flush buffered rows and return the underlying writer
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .context("CSV writer lost after a failed write")?
            .into_inner()
            .map_err(|e| anyhow!("Failed to flush CSV writer: {}", e.error()))
    }

    fn writer(&mut self) -> Result<&mut csv::Writer<W>> {
        self.writer
            .as_mut()
            .context("CSV writer lost after a failed write")
    }

    fn write_bare_terminator(&mut self) -> Result<()> {
        let writer = self
            .writer
            .take()
            .context("CSV writer lost after a failed write")?;

        let mut out = match writer.into_inner() {
            Ok(out) => out,
            Err(e) => {
                let err = anyhow!("Failed to flush CSV writer: {}", e.error());
                self.writer = Some(e.into_inner());
                return Err(err);
            }
        };

        let result = out.write_all(b"\n").context("Failed to write CSV row");
        self.writer = Some(csv::Writer::from_writer(out));
        result
    }
}

impl<W: Write> RowSink for CsvSink<W> {
    fn write_row(&mut self, row: &[String]) -> Result<()> {
        if row.is_empty() {
            return self.write_bare_terminator();
        }
        self.writer()?
            .write_record(row)
            .context("Failed to write CSV row")
    }

    fn flush(&mut self) -> Result<()> {
        self.writer()?
            .flush()
            .context("Failed to flush CSV writer")
    }
}

/// In-memory sink, mostly useful for tests
impl RowSink for Vec<Vec<String>> {
    fn write_row(&mut self, row: &[String]) -> Result<()> {
        self.push(row.to_vec());
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}
