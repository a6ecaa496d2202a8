use std::collections::BTreeMap;
use std::path::PathBuf;

/// One entry from a syndication feed, as handed to the post builder.
#[derive(Debug, Clone, Default)]
pub struct FeedItem {
    pub guid: String,
    pub title: String,
    /// Raw HTML description.
    pub description: String,
    /// Publish date exactly as it appeared in the feed.
    pub published: String,
    pub enclosures: Vec<String>,
    pub extensions: Extensions,
}

/// A single namespaced extension element, e.g. `<media:content url="..."/>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extension {
    pub value: String,
    pub attrs: BTreeMap<String, String>,
}

impl Extension {
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            attrs: BTreeMap::new(),
        }
    }

    pub fn with_attr(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut attrs = BTreeMap::new();
        attrs.insert(key.into(), value.into());
        Self {
            value: String::new(),
            attrs,
        }
    }
}

/// Extension elements keyed by namespace prefix, then field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extensions(BTreeMap<String, BTreeMap<String, Vec<Extension>>>);

impl Extensions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, namespace: &str, field: &str, extension: Extension) {
        self.0
            .entry(namespace.to_string())
            .or_default()
            .entry(field.to_string())
            .or_default()
            .push(extension);
    }

    /// Builder form of [`Extensions::insert`].
    pub fn with(mut self, namespace: &str, field: &str, extension: Extension) -> Self {
        self.insert(namespace, field, extension);
        self
    }

    pub fn has_namespace(&self, namespace: &str) -> bool {
        self.0.contains_key(namespace)
    }

    /// All elements recorded for `namespace:field`, empty if there are none.
    pub fn entries(&self, namespace: &str, field: &str) -> &[Extension] {
        self.0
            .get(namespace)
            .and_then(|fields| fields.get(field))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Text value of the first `namespace:field` element. Empty values count as absent.
    pub fn get_first(&self, namespace: &str, field: &str) -> Option<&str> {
        self.entries(namespace, field)
            .first()
            .map(|ext| ext.value.as_str())
            .filter(|value| !value.is_empty())
    }
}

impl From<BTreeMap<String, BTreeMap<String, Vec<Extension>>>> for Extensions {
    fn from(map: BTreeMap<String, BTreeMap<String, Vec<Extension>>>) -> Self {
        Self(map)
    }
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    /// `None` waits on the remote end indefinitely.
    pub timeout_seconds: Option<u64>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("rss2dayone/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_seconds: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Rss2DayOneError {
    #[error("Error decoding seen-item cache: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Error writing seen-item cache: {0}")]
    Persist(String),

    #[error("Could not parse date {value:?} of {item}")]
    DateParse { item: String, value: String },

    #[error("Error downloading attachment {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("Error saving attachment file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Markdown conversion failed: {0}")]
    Conversion(String),

    #[error("Failed invocation of journaling command: {0}")]
    Invocation(String),

    #[error("Feed error: {0}")]
    Feed(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Rss2DayOneError>;
