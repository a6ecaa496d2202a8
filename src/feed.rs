use crate::types::{Extension, Extensions, FeedItem, FetchConfig, Result, Rss2DayOneError};
use reqwest::Client;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

pub struct FeedReader {
    client: Client,
}

impl FeedReader {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .user_agent(&config.user_agent)
            .gzip(true)
            .deflate(true)
            .brotli(true);
        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Download and parse the feed at `url`.
    pub async fn fetch(&self, url: &str) -> Result<Vec<FeedItem>> {
        debug!("Fetching feed: {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Rss2DayOneError::Feed(format!(
                "HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let content = response.bytes().await?;
        info!("Fetched feed: {} ({} bytes)", url, content.len());

        parse_feed(&content)
    }
}

/// Only http(s) feeds are supported.
pub fn is_valid_feed_url(url: &str) -> bool {
    Url::parse(url)
        .map(|u| u.scheme() == "http" || u.scheme() == "https")
        .unwrap_or(false)
}

/// Parse feed content. RSS 2.0 is tried first because it keeps the raw
/// `pubDate` and every namespaced extension; anything else goes through `feed-rs`.
pub fn parse_feed(content: &[u8]) -> Result<Vec<FeedItem>> {
    let rss_error = match rss::Channel::read_from(content) {
        Ok(channel) => {
            let items = channel.items().iter().filter_map(from_rss_item).collect::<Vec<_>>();
            debug!("Parsed RSS feed with {} items", items.len());
            return Ok(items);
        }
        Err(e) => e,
    };

    debug!("Not an RSS 2.0 feed ({}), trying other formats", rss_error);

    let feed = feed_rs::parser::parse(content).map_err(|e| {
        Rss2DayOneError::Feed(format!("Failed to parse feed: {} / {}", rss_error, e))
    })?;

    let items = feed.entries.into_iter().filter_map(from_feed_rs_entry).collect::<Vec<_>>();
    debug!("Parsed feed with {} entries", items.len());
    Ok(items)
}

fn from_rss_item(item: &rss::Item) -> Option<FeedItem> {
    let guid = item
        .guid()
        .map(|g| g.value())
        .filter(|g| !g.is_empty())
        .or(item.link())
        .map(str::to_string);

    let Some(guid) = guid else {
        warn!(
            "Skipping item without guid or link: {}",
            item.title().unwrap_or("Untitled")
        );
        return None;
    };

    let extensions: BTreeMap<String, BTreeMap<String, Vec<Extension>>> = item
        .extensions()
        .iter()
        .map(|(namespace, fields)| {
            let fields = fields
                .iter()
                .map(|(name, values)| {
                    let values = values
                        .iter()
                        .map(|ext| Extension {
                            value: ext.value().unwrap_or_default().to_string(),
                            attrs: ext.attrs().clone(),
                        })
                        .collect();
                    (name.clone(), values)
                })
                .collect();
            (namespace.clone(), fields)
        })
        .collect();

    Some(FeedItem {
        guid,
        title: item.title().unwrap_or_default().to_string(),
        description: item.description().unwrap_or_default().to_string(),
        published: item.pub_date().unwrap_or_default().to_string(),
        enclosures: item.enclosure().map(|e| e.url().to_string()).into_iter().collect(),
        extensions: extensions.into(),
    })
}

fn from_feed_rs_entry(entry: feed_rs::model::Entry) -> Option<FeedItem> {
    let link = entry.links.first().map(|l| l.href.clone());
    let guid = if !entry.id.is_empty() { Some(entry.id.clone()) } else { link };

    let Some(guid) = guid else {
        warn!("Skipping entry without id or link");
        return None;
    };

    let description = entry
        .content
        .and_then(|c| c.body)
        .or_else(|| entry.summary.map(|s| s.content))
        .unwrap_or_default();

    let published = entry
        .published
        .or(entry.updated)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_default();

    let enclosures = entry
        .links
        .iter()
        .filter(|l| l.rel.as_deref() == Some("enclosure"))
        .map(|l| l.href.clone())
        .collect();

    let mut extensions = Extensions::new();
    for media in &entry.media {
        for content in &media.content {
            if let Some(url) = &content.url {
                extensions.insert("media", "content", Extension::with_attr("url", url.as_str()));
            }
        }
    }

    Some(FeedItem {
        guid,
        title: entry.title.map(|t| t.content).unwrap_or_default(),
        description,
        published,
        enclosures,
        extensions,
    })
}
