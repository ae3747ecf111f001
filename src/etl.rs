//! Two-stage extract → load driver
//!
//! There is no transform stage and no streaming between the stages: the load
//! stage only starts once extraction has fully completed.

use crate::error::Result;
use crate::extract::{HashtagExtractor, HashtagFetcher};
use crate::load::{CsvLoader, CsvSink};
use crate::types::Record;
use std::io::Write;

/// First stage: produce every record for the run
pub trait Extractor {
    fn extract(&self) -> Result<Vec<Record>>;
}

impl<F> Extractor for F
where
    F: Fn() -> Result<Vec<Record>>,
{
    fn extract(&self) -> Result<Vec<Record>> {
        self()
    }
}

/// Second stage: write every record somewhere
pub trait Loader {
    fn load(&mut self, records: &[Record]) -> Result<()>;
}

impl<F> Loader for F
where
    F: FnMut(&[Record]) -> Result<()>,
{
    fn load(&mut self, records: &[Record]) -> Result<()> {
        self(records)
    }
}

/// Extractor that always yields zero records
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopExtractor;

impl Extractor for NoopExtractor {
    fn extract(&self) -> Result<Vec<Record>> {
        Ok(Vec::new())
    }
}

/// Loader that accepts and discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLoader;

impl Loader for NoopLoader {
    fn load(&mut self, _records: &[Record]) -> Result<()> {
        Ok(())
    }
}

/// An extractor paired with a loader
pub struct Etl<E, L> {
    pub extractor: E,
    pub loader: L,
}

impl<E: Extractor, L: Loader> Etl<E, L> {
    pub fn new(extractor: E, loader: L) -> Self {
        Etl { extractor, loader }
    }

    /// Extract everything, then load it. Errors from either stage are
    /// returned unchanged and nothing is loaded if extraction fails.
    pub fn run(&mut self) -> Result<()> {
        let records = self.extractor.extract()?;
        self.loader.load(&records)
    }
}

/// Build an ETL that fetches `per_tag` statuses for each hashtag and writes
/// them as CSV to `out`
pub fn hashtags_to_csv<F, W, I, S>(
    out: W,
    fetcher: F,
    per_tag: usize,
    hashtags: I,
) -> Etl<HashtagExtractor<F>, CsvLoader<CsvSink<W>>>
where
    F: HashtagFetcher,
    W: Write,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Etl::new(
        HashtagExtractor::new(fetcher, per_tag, hashtags),
        CsvLoader::new(out),
    )
}
