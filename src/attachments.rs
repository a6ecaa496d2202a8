use crate::types::{FeedItem, FetchConfig, Result, Rss2DayOneError};
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// `![](<url>)`: an inline markdown image with empty alt text.
static MARKDOWN_IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[\]\(([^)]+)\)").expect("valid image pattern"));

/// The markdown snippet that references `url` as an inline image.
pub fn image_marker(url: &str) -> String {
    format!("![]({})", url)
}

/// Collect every URL worth downloading for an item: enclosures, `media:content`
/// urls, and inline images in the converted body. Duplicates collapse.
pub fn find_attachments(item: &FeedItem, body: &str) -> BTreeSet<String> {
    let mut urls = BTreeSet::new();

    urls.extend(item.enclosures.iter().cloned());

    urls.extend(
        item.extensions
            .entries("media", "content")
            .iter()
            .filter_map(|ext| ext.attrs.get("url").cloned()),
    );

    urls.extend(
        MARKDOWN_IMAGE
            .captures_iter(body)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().to_string()),
    );

    urls.retain(|url| !url.is_empty());
    urls
}

/// Local filename for a downloaded attachment.
///
/// The journaling tool treats unknown types as images, so anything that is not
/// already a jpeg or png gets a `.jpg` suffix.
pub fn attachment_file_name(url: &str) -> String {
    let name = url.replace(['/', ':'], "-");
    let mut name = match name.split_once('?') {
        Some((stem, _query)) => stem.to_string(),
        None => name,
    };

    if !(name.ends_with(".jpg") || name.ends_with(".jpeg") || name.ends_with(".png")) {
        name.push_str(".jpg");
    }
    name
}

/// Downloads an attachment into a directory and reports where it landed.
#[async_trait]
pub trait AttachmentFetcher: Send + Sync {
    async fn fetch(&self, url: &str, dir: &Path) -> Result<PathBuf>;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(&config.user_agent);
        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AttachmentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str, dir: &Path) -> Result<PathBuf> {
        let fetch_error = |e: reqwest::Error| Rss2DayOneError::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        };

        debug!("Downloading attachment: {}", url);
        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(fetch_error)?;

        let path = dir.join(attachment_file_name(url));
        let write_error = |source: std::io::Error| Rss2DayOneError::Write {
            path: path.clone(),
            source,
        };

        let mut file = tokio::fs::File::create(&path).await.map_err(write_error)?;
        let mut written = 0usize;
        while let Some(chunk) = response.chunk().await.map_err(fetch_error)? {
            file.write_all(&chunk).await.map_err(write_error)?;
            written += chunk.len();
        }
        file.flush().await.map_err(write_error)?;

        debug!("Saved attachment {} ({} bytes)", path.display(), written);
        Ok(path)
    }
}

/// A downloaded attachment, removed from disk when dropped.
#[derive(Debug)]
pub struct AttachmentFile {
    path: PathBuf,
}

impl AttachmentFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for AttachmentFile {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!("Removed attachment {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Could not remove attachment {}: {}", self.path.display(), e),
        }
    }
}
