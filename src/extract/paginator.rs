use crate::error::{EtlError, Result};
use crate::extract::fetcher::HashtagFetcher;
use crate::types::{ExtractConfig, Record};
use serde_json::Value;
use tracing::debug;

/// Extract up to `quota` records for a single hashtag.
///
/// Pages are requested newest first with a page size equal to `quota`. After
/// each page the cursor moves to one below the smallest identifier seen, so
/// later pages never repeat a status. Extraction stops as soon as `quota`
/// records are collected or the fetcher returns an empty page; the result is
/// truncated to `quota` because a fetcher may over-deliver.
///
/// # Errors
/// * [`EtlError::Fetch`] if any fetch fails (no retry)
/// * [`EtlError::IdInvalid`] if any fetched status lacks a parsable identifier
pub fn extract_hashtag<F: HashtagFetcher + ?Sized>(
    fetcher: &F,
    hashtag: &str,
    quota: usize,
    config: &ExtractConfig,
) -> Result<Vec<Record>> {
    if quota == 0 {
        return Ok(Vec::new());
    }

    let mut collected: Vec<Record> = Vec::with_capacity(quota);
    let mut max_id: Option<i64> = None;

    while collected.len() < quota {
        let statuses = fetcher
            .fetch(hashtag, quota, max_id)
            .map_err(EtlError::Fetch)?;

        let (records, min_id) = tag_page(statuses, hashtag, config)?;

        debug!(
            hashtag,
            page_size = records.len(),
            max_id = ?max_id,
            "fetched page"
        );

        // An empty page means the timeline is exhausted
        let Some(min_id) = min_id else {
            break;
        };

        max_id = Some(min_id.saturating_sub(1));
        collected.extend(records);
    }

    collected.truncate(quota);
    Ok(collected)
}

/// Tag every status with its hashtag and find the page's minimum identifier.
///
/// Returns `None` as the minimum for an empty page.
fn tag_page(
    statuses: Vec<Record>,
    hashtag: &str,
    config: &ExtractConfig,
) -> Result<(Vec<Record>, Option<i64>)> {
    let mut records = Vec::with_capacity(statuses.len());
    let mut min_id: Option<i64> = None;

    for mut record in statuses {
        // Provenance wins over any source field of the same name
        record.insert(
            config.provenance_field.clone(),
            Value::String(hashtag.to_string()),
        );

        let id = record_id(&record, &config.id_field)?;
        min_id = Some(min_id.map_or(id, |current| current.min(id)));

        records.push(record);
    }

    Ok((records, min_id))
}

/// Read the record's identifier from a string field holding a base-10 i64
pub(crate) fn record_id(record: &Record, field: &str) -> Result<i64> {
    match record.get(field) {
        Some(Value::String(s)) => s.parse::<i64>().map_err(|_| EtlError::IdInvalid {
            field: field.to_string(),
        }),
        _ => Err(EtlError::IdInvalid {
            field: field.to_string(),
        }),
    }
}
