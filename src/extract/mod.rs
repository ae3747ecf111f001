//! Hashtag extraction - paginated, quota-bounded fetching
//!
//! Each hashtag is paged through independently using a descending `max_id`
//! cursor, and all hashtags are fetched concurrently on scoped threads.
//!
//! ## Pagination
//!
//! The first page of a hashtag is requested without a cursor. Every later page
//! is requested with `max_id = min(id of previous page) - 1`, so no status is
//! ever delivered twice for the same hashtag.

pub mod fetcher;
pub mod paginator;
pub mod coordinator;

pub use fetcher::HashtagFetcher;
pub use paginator::extract_hashtag;
pub use coordinator::HashtagExtractor;

#[cfg(test)]
pub(crate) mod test_support;
