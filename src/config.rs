use crate::types::FetchConfig;
use std::path::PathBuf;

pub const CACHE_FILE_NAME: &str = "rss2dayone.json";
pub const DEFAULT_DAYONE_BIN: &str = "dayone2";

/// Settings for a single run.
#[derive(Debug, Clone)]
pub struct Config {
    pub feed_url: String,
    pub journal: String,
    pub tags: Vec<String>,
    pub cache_path: PathBuf,
    pub dayone_bin: String,
    pub fetch: FetchConfig,
}

impl Config {
    pub fn new(feed_url: impl Into<String>, journal: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            feed_url: feed_url.into(),
            journal: journal.into(),
            tags,
            cache_path: default_cache_path(),
            dayone_bin: DEFAULT_DAYONE_BIN.to_string(),
            fetch: FetchConfig::default(),
        }
    }

    pub fn with_cache_path(mut self, path: Option<PathBuf>) -> Self {
        if let Some(path) = path {
            self.cache_path = path;
        }
        self
    }

    pub fn with_dayone_bin(mut self, bin: Option<String>) -> Self {
        if let Some(bin) = bin {
            self.dayone_bin = bin;
        }
        self
    }

    pub fn with_timeout(mut self, timeout_seconds: Option<u64>) -> Self {
        self.fetch.timeout_seconds = timeout_seconds;
        self
    }
}

/// `<user cache dir>/rss2dayone.json`, or the working directory if there is no cache dir.
pub fn default_cache_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CACHE_FILE_NAME)
}
