//! Synthetic timelines for extraction tests

use crate::extract::fetcher::HashtagFetcher;
use crate::types::Record;
use anyhow::Result;
use serde_json::json;
use std::sync::Mutex;

/// Pin a closure to the fetcher signature so its argument types are inferred
pub(crate) fn fetcher<F>(f: F) -> F
where
    F: Fn(&str, usize, Option<i64>) -> Result<Vec<Record>> + Sync,
{
    f
}

pub(crate) fn status(id: i64, text: &str) -> Record {
    json!({
        "id_str": id.to_string(),
        "text": text,
    })
    .as_object()
    .cloned()
    .unwrap()
}

/// An in-memory timeline that honours `count`, `max_id` and a page limit
pub(crate) struct Timeline {
    statuses: Vec<(i64, Record)>,
    page_limit: usize,
    calls: Mutex<Vec<Option<i64>>>,
}

impl Timeline {
    pub(crate) fn new(ids: impl IntoIterator<Item = i64>, page_limit: usize) -> Self {
        let mut statuses: Vec<(i64, Record)> = ids
            .into_iter()
            .map(|id| (id, status(id, &format!("status {}", id))))
            .collect();
        statuses.sort_by(|a, b| b.0.cmp(&a.0));

        Timeline {
            statuses,
            page_limit,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Cursors passed to each fetch, in call order
    pub(crate) fn calls(&self) -> Vec<Option<i64>> {
        self.calls.lock().unwrap().clone()
    }
}

impl HashtagFetcher for Timeline {
    fn fetch(&self, _hashtag: &str, count: usize, max_id: Option<i64>) -> Result<Vec<Record>> {
        self.calls.lock().unwrap().push(max_id);

        Ok(self
            .statuses
            .iter()
            .filter(|(id, _)| max_id.map_or(true, |max| *id <= max))
            .take(count.min(self.page_limit))
            .map(|(_, record)| record.clone())
            .collect())
    }
}
