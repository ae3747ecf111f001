//! Twitter standard search API client
//!
//! Authenticates with an application-only bearer token and pages through
//! `search/tweets.json` using the `max_id` cursor.

pub mod transport;
pub mod api;

pub use api::{SearchResponse, TwitterApi};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};

/// Maximum number of statuses returned per search request
pub const MAX_PER_REQUEST: usize = 100;

/// Bearer token endpoint
pub const TOKEN_URL: &str = "https://api.twitter.com/oauth2/token";

/// Standard search endpoint
pub const SEARCH_URL: &str = "https://api.twitter.com/1.1/search/tweets.json";
