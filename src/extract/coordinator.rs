use crate::error::{EtlError, Result};
use crate::etl::Extractor;
use crate::extract::fetcher::HashtagFetcher;
use crate::extract::paginator::extract_hashtag;
use crate::types::{ExtractConfig, Record};
use std::thread;
use tracing::{info, warn};

/// Extracts `per_tag` records for each of several hashtags concurrently.
///
/// Every hashtag gets its own scoped thread with its own cursor and
/// accumulator; the only shared state is the read-only fetcher. All threads
/// run to completion even when a sibling fails. Results are then reduced in
/// hashtag order: the first failure in that order is returned and all records
/// are discarded, otherwise the per-hashtag records are concatenated.
pub struct HashtagExtractor<F> {
    fetcher: F,
    hashtags: Vec<String>,
    per_tag: usize,
    config: ExtractConfig,
}

impl<F: HashtagFetcher> HashtagExtractor<F> {
    pub fn new<I, S>(fetcher: F, per_tag: usize, hashtags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        HashtagExtractor {
            fetcher,
            hashtags: hashtags.into_iter().map(Into::into).collect(),
            per_tag,
            config: ExtractConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ExtractConfig) -> Self {
        self.config = config;
        self
    }

    pub fn hashtags(&self) -> &[String] {
        &self.hashtags
    }

    /// Run one extraction per hashtag in parallel and merge the results
    pub fn extract_all(&self) -> Result<Vec<Record>> {
        let outcomes: Vec<Result<Vec<Record>>> = thread::scope(|scope| {
            let handles: Vec<_> = self
                .hashtags
                .iter()
                .map(|hashtag| {
                    let fetcher = &self.fetcher;
                    let config = &self.config;
                    let quota = self.per_tag;
                    scope.spawn(move || extract_hashtag(fetcher, hashtag, quota, config))
                })
                .collect();

            // Join in launch order, not completion order
            handles
                .into_iter()
                .zip(&self.hashtags)
                .map(|(handle, hashtag)| {
                    handle.join().unwrap_or_else(|_| {
                        Err(EtlError::Worker {
                            key: hashtag.clone(),
                        })
                    })
                })
                .collect()
        });

        let mut first_error: Option<EtlError> = None;
        let mut records = Vec::new();

        for (hashtag, outcome) in self.hashtags.iter().zip(outcomes) {
            match outcome {
                Ok(tagged) => {
                    info!(hashtag = %hashtag, records = tagged.len(), "extracted hashtag");
                    if first_error.is_none() {
                        records.extend(tagged);
                    }
                }
                Err(e) => {
                    warn!(hashtag = %hashtag, error = %e, "hashtag extraction failed");
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(records),
        }
    }
}

impl<F: HashtagFetcher> Extractor for HashtagExtractor<F> {
    fn extract(&self) -> Result<Vec<Record>> {
        self.extract_all()
    }
}
