#![allow(dead_code)]

use async_trait::async_trait;
use rss2dayone::attachments::attachment_file_name;
use rss2dayone::{AttachmentFetcher, FeedItem, Journal, JournalEntry, Result, Rss2DayOneError};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, Once};

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Writes a small file for every URL except those containing "broken".
#[derive(Default, Clone)]
pub struct FakeFetcher {
    pub requested: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl AttachmentFetcher for FakeFetcher {
    async fn fetch(&self, url: &str, dir: &Path) -> Result<PathBuf> {
        self.requested.lock().unwrap().push(url.to_string());

        if url.contains("broken") {
            return Err(Rss2DayOneError::Fetch {
                url: url.to_string(),
                reason: "connection refused".to_string(),
            });
        }

        let path = dir.join(attachment_file_name(url));
        std::fs::write(&path, url.as_bytes()).map_err(|source| Rss2DayOneError::Write {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

/// Records entries. Fails any entry whose text contains "FAIL".
#[derive(Default, Clone)]
pub struct FakeJournal {
    pub entries: Arc<Mutex<Vec<JournalEntry>>>,
    /// Whether each attachment existed on disk at invocation time.
    pub attachments_present: Arc<Mutex<Vec<bool>>>,
}

impl FakeJournal {
    pub fn entries(&self) -> Vec<JournalEntry> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait]
impl Journal for FakeJournal {
    async fn create_entry(&self, entry: &JournalEntry) -> Result<()> {
        {
            let mut present = self.attachments_present.lock().unwrap();
            present.extend(entry.attachments.iter().map(|p| p.exists()));
        }

        if entry.text.contains("FAIL") {
            return Err(Rss2DayOneError::Invocation("exit status: 1".to_string()));
        }

        self.entries.lock().unwrap().push(entry.clone());
        Ok(())
    }
}

pub fn item(guid: &str, title: &str, description: &str) -> FeedItem {
    FeedItem {
        guid: guid.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        published: "Sun, 30 Apr 2023 21:15:00 +0100".to_string(),
        ..Default::default()
    }
}
