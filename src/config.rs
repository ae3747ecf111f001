use std::path::PathBuf;
use thiserror::Error;

/// Default number of statuses fetched per hashtag
pub const DEFAULT_PER_TAG: usize = 2000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("flag [-k, --api-key string] or environment variable MESHIFY_API_KEY is required")]
    MissingApiKey,

    #[error("flag [-s, --api-secret string] or environment variable MESHIFY_API_SECRET is required")]
    MissingApiSecret,

    #[error("at least one hashtag is required")]
    NoHashtags,
}

/// Run settings gathered from flags and environment
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: String,
    pub api_secret: String,
    /// CSV destination; stdout when unset
    pub out: Option<PathBuf>,
    /// Tag names, with or without a leading '#'
    pub tags: Vec<String>,
    pub per_tag: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            api_key: String::new(),
            api_secret: String::new(),
            out: None,
            tags: vec![String::from("IoT")],
            per_tag: DEFAULT_PER_TAG,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        if self.api_secret.trim().is_empty() {
            return Err(ConfigError::MissingApiSecret);
        }
        if self.hashtags().is_empty() {
            return Err(ConfigError::NoHashtags);
        }
        Ok(())
    }

    /// Tags as search queries: trimmed, blanks dropped, '#' prefixed once
    pub fn hashtags(&self) -> Vec<String> {
        self.tags
            .iter()
            .map(|tag| tag.trim())
            .filter(|tag| !tag.is_empty() && *tag != "#")
            .map(|tag| {
                if tag.starts_with('#') {
                    tag.to_string()
                } else {
                    format!("#{}", tag)
                }
            })
            .collect()
    }
}
