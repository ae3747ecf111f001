use crate::types::Record;
use anyhow::Result;

/// Source of paged search results for a hashtag.
///
/// Implementations return at most `count` statuses, newest first. A `max_id`
/// of `None` means the first page; `Some(id)` restricts the page to statuses
/// with identifier <= `id`. An empty page means the hashtag is exhausted.
///
/// Capping `count` at a provider-side page limit is the implementation's job.
pub trait HashtagFetcher: Sync {
    fn fetch(&self, hashtag: &str, count: usize, max_id: Option<i64>) -> Result<Vec<Record>>;
}

impl<F> HashtagFetcher for F
where
    F: Fn(&str, usize, Option<i64>) -> Result<Vec<Record>> + Sync,
{
    fn fetch(&self, hashtag: &str, count: usize, max_id: Option<i64>) -> Result<Vec<Record>> {
        self(hashtag, count, max_id)
    }
}
