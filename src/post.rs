use crate::attachments::{find_attachments, image_marker, AttachmentFetcher, AttachmentFile};
use crate::markdown::to_markdown;
use crate::types::{FeedItem, Result, Rss2DayOneError};
use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, warn};

/// `2 Jan 2006 15:04:05 -0700`, the usual RSS `pubDate` shape after the weekday.
const FEED_DATE_FORMAT: &str = "%e %b %Y %H:%M:%S %z";

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Format the journaling command expects: wall-clock time, no offset.
const ISO_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const LETTERBOXD: &str = "letterboxd";

/// A feed item turned into a journal entry, ready to render.
#[derive(Debug)]
pub struct Post {
    pub title: String,
    pub body: String,
    pub date: DateTime<FixedOffset>,
    pub attachment_urls: BTreeSet<String>,
    pub attachments: Vec<AttachmentFile>,
}

impl Post {
    pub fn new(title: impl Into<String>, body: impl Into<String>, date: DateTime<FixedOffset>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            date,
            attachment_urls: BTreeSet::new(),
            attachments: Vec::new(),
        }
    }

    pub fn attachment_paths(&self) -> Vec<&Path> {
        self.attachments.iter().map(AttachmentFile::path).collect()
    }

    /// Date as passed to the journaling command.
    pub fn iso_date(&self) -> String {
        self.date.format(ISO_DATE_FORMAT).to_string()
    }

    /// Fill in title and date from `letterboxd:*` fields, where present.
    ///
    /// `filmTitle` and `filmYear` must both be there to replace the title.
    /// `watchedDate` replaces the date independently.
    pub fn apply_letterboxd(&mut self, item: &FeedItem) -> Result<()> {
        let ext = &item.extensions;
        if !ext.has_namespace(LETTERBOXD) {
            return Ok(());
        }

        if let (Some(film), Some(year)) = (
            ext.get_first(LETTERBOXD, "filmTitle"),
            ext.get_first(LETTERBOXD, "filmYear"),
        ) {
            self.title = format!("{} ({})", film, year);
        }

        if let Some(watched) = ext.get_first(LETTERBOXD, "watchedDate") {
            self.date = parse_calendar_date(watched).ok_or_else(|| Rss2DayOneError::DateParse {
                item: item.guid.clone(),
                value: watched.to_string(),
            })?;
        }

        Ok(())
    }
}

/// Parse a feed publish date: RFC 822 style first, then RFC 3339.
pub fn parse_published_date(value: &str) -> Option<DateTime<FixedOffset>> {
    let value = value.trim();
    parse_feed_date(value).or_else(|| DateTime::parse_from_rfc3339(value).ok())
}

/// The weekday name must be a known abbreviation but need not match the date.
fn parse_feed_date(value: &str) -> Option<DateTime<FixedOffset>> {
    let (weekday, rest) = value.split_once(", ")?;
    if !WEEKDAYS.contains(&weekday) {
        return None;
    }
    DateTime::parse_from_str(rest, FEED_DATE_FORMAT).ok()
}

/// Parse `YYYY-MM-DD` as midnight UTC.
pub fn parse_calendar_date(value: &str) -> Option<DateTime<FixedOffset>> {
    let day = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()?;
    let midnight = day.and_hms_opt(0, 0, 0)?;
    Some(Utc.from_utc_datetime(&midnight).with_timezone(&FixedOffset::east_opt(0)?))
}

/// Turns feed items into posts, downloading attachments along the way.
pub struct PostBuilder {
    fetcher: Box<dyn AttachmentFetcher>,
}

impl PostBuilder {
    pub fn new(fetcher: Box<dyn AttachmentFetcher>) -> Self {
        Self { fetcher }
    }

    pub async fn build(&self, item: &FeedItem, scratch_dir: &Path) -> Result<Post> {
        let body = to_markdown(&item.description)?;

        let date = parse_published_date(&item.published).ok_or_else(|| Rss2DayOneError::DateParse {
            item: item.guid.clone(),
            value: item.published.clone(),
        })?;

        let mut post = Post::new(item.title.clone(), body, date);
        post.attachment_urls = find_attachments(item, &post.body);

        self.fetch_attachments(&mut post, scratch_dir).await;

        post.apply_letterboxd(item)?;

        Ok(post)
    }

    async fn fetch_attachments(&self, post: &mut Post, scratch_dir: &Path) {
        for url in &post.attachment_urls {
            let path = match self.fetcher.fetch(url, scratch_dir).await {
                Ok(path) => path,
                Err(e) => {
                    warn!("{}", e);
                    continue;
                }
            };

            // Different URLs can map onto the same local name; keep one entry per file.
            if post.attachments.iter().all(|a| a.path() != path) {
                post.attachments.push(AttachmentFile::new(path));
            }
            post.body = post.body.replace(&image_marker(url), "");
        }

        debug!(
            "Fetched {}/{} attachments",
            post.attachments.len(),
            post.attachment_urls.len()
        );
    }
}
