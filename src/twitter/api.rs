use crate::extract::HashtagFetcher;
use crate::twitter::transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
use crate::twitter::{MAX_PER_REQUEST, SEARCH_URL, TOKEN_URL};
use crate::types::Record;
use anyhow::{anyhow, bail, Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde::Deserialize;
use std::sync::Mutex;
use tracing::debug;
use url::Url;

/// Body of a search response; only the statuses are kept
#[derive(Debug, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub statuses: Vec<Record>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Client for the Twitter standard search API.
///
/// The bearer token is requested lazily on the first search and cached for
/// the lifetime of the client. Concurrent first searches share one token
/// request.
pub struct TwitterApi<T = ReqwestTransport> {
    key: String,
    secret: String,
    bearer_token: Mutex<Option<String>>,
    transport: T,
}

impl TwitterApi<ReqwestTransport> {
    /// Create a client from the consumer API key and secret
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Result<Self> {
        Ok(TwitterApi::with_transport(key, secret, ReqwestTransport::new()?))
    }
}

impl<T: Transport> TwitterApi<T> {
    pub fn with_transport(key: impl Into<String>, secret: impl Into<String>, transport: T) -> Self {
        TwitterApi {
            key: key.into(),
            secret: secret.into(),
            bearer_token: Mutex::new(None),
            transport,
        }
    }

    /// Use an already issued bearer token instead of requesting one
    pub fn with_bearer_token(self, token: impl Into<String>) -> Self {
        TwitterApi {
            bearer_token: Mutex::new(Some(token.into())),
            ..self
        }
    }

    /// Search for up to `count` statuses tagged `hashtag`, newest first.
    ///
    /// `count` is capped at [`MAX_PER_REQUEST`]. `max_id` is only sent when it
    /// is present and positive.
    pub fn fetch_hashtag(&self, hashtag: &str, count: usize, max_id: Option<i64>) -> Result<Vec<Record>> {
        let token = self.bearer_token()?;
        let request = search_request(&token, hashtag, count, max_id)?;

        let response = self.transport.send(request)?;
        let body = check_status(response)?;

        let page: SearchResponse =
            serde_json::from_str(&body).context("Failed to decode search response")?;

        debug!(hashtag, statuses = page.statuses.len(), "search response");
        Ok(page.statuses)
    }

    fn bearer_token(&self) -> Result<String> {
        let mut cached = self
            .bearer_token
            .lock()
            .map_err(|_| anyhow!("bearer token lock poisoned"))?;

        if let Some(token) = cached.as_ref() {
            return Ok(token.clone());
        }

        let token = self.new_bearer_token()?;
        *cached = Some(token.clone());
        Ok(token)
    }

    fn new_bearer_token(&self) -> Result<String> {
        let request = token_request(&self.key, &self.secret)?;

        let response = self.transport.send(request)?;
        let body = check_status(response)?;

        let token: TokenResponse =
            serde_json::from_str(&body).context("Failed to decode token response")?;

        debug!("acquired bearer token");
        Ok(token.access_token)
    }
}

impl<T: Transport> HashtagFetcher for TwitterApi<T> {
    fn fetch(&self, hashtag: &str, count: usize, max_id: Option<i64>) -> Result<Vec<Record>> {
        self.fetch_hashtag(hashtag, count, max_id)
    }
}

/// Error statuses carry the response body as the error message
fn check_status(response: HttpResponse) -> Result<String> {
    if response.status >= 400 {
        bail!("HTTP {}: {}", response.status, response.body);
    }
    Ok(response.body)
}

fn search_request(token: &str, hashtag: &str, count: usize, max_id: Option<i64>) -> Result<HttpRequest> {
    let count = count.min(MAX_PER_REQUEST).to_string();
    let mut url = Url::parse_with_params(
        SEARCH_URL,
        &[
            ("q", hashtag),
            ("lang", "en"),
            ("count", count.as_str()),
            ("include_entities", "false"),
        ],
    )?;

    if let Some(max_id) = max_id.filter(|id| *id > 0) {
        url.query_pairs_mut()
            .append_pair("max_id", &max_id.to_string());
    }

    let mut request = HttpRequest::new(Method::GET, url);
    request.headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", token)).context("Invalid bearer token")?,
    );

    Ok(request)
}

fn token_request(key: &str, secret: &str) -> Result<HttpRequest> {
    let body = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("grant_type", "client_credentials")
        .finish();

    let mut request = HttpRequest::new(Method::POST, Url::parse(TOKEN_URL)?);
    request.headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("application/x-www-form-urlencoded"),
    );
    request.headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&token_authorization(key, secret)).context("Invalid API credentials")?,
    );
    request.body = Some(body);

    Ok(request)
}

fn token_authorization(key: &str, secret: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:{}", key, secret)))
}
