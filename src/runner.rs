use crate::cache::{CacheStorage, SeenSet};
use crate::journal::{Journal, JournalEntry};
use crate::post::PostBuilder;
use crate::render::render;
use crate::types::{FeedItem, Result};
use std::path::Path;
use tracing::{debug, error, info, warn};

/// Outcome counts for one pass over a feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub journaled: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Drives feed items through post building and the journal, one at a time.
pub struct Runner {
    builder: PostBuilder,
    journal: Box<dyn Journal>,
    journal_name: String,
    tags: Vec<String>,
}

impl Runner {
    pub fn new(
        builder: PostBuilder,
        journal: Box<dyn Journal>,
        journal_name: impl Into<String>,
        tags: Vec<String>,
    ) -> Self {
        Self {
            builder,
            journal,
            journal_name: journal_name.into(),
            tags,
        }
    }

    /// Journal every unseen item, then persist the seen set once.
    ///
    /// Per-item failures are logged and leave the item unseen so the next run
    /// retries it. Only scratch-directory and cache errors abort the run.
    pub async fn run(
        &self,
        items: &[FeedItem],
        seen: &mut SeenSet,
        storage: &dyn CacheStorage,
    ) -> Result<RunSummary> {
        let scratch = tempfile::Builder::new().prefix("rss2dayone-").tempdir()?;
        debug!("Downloading attachments to {}", scratch.path().display());

        let mut summary = RunSummary::default();

        for item in items {
            if seen.contains(&item.guid) {
                summary.skipped += 1;
                continue;
            }

            match self.process_item(item, scratch.path()).await {
                Ok(()) => {
                    seen.add(&item.guid);
                    summary.journaled += 1;
                }
                Err(e) => {
                    warn!("Skipping {}: {}", item.guid, e);
                    summary.failed += 1;
                }
            }
        }

        if let Err(e) = seen.save(storage) {
            error!("{}", e);
            return Err(e);
        }

        if let Err(e) = scratch.close() {
            warn!("Could not remove scratch directory: {}", e);
        }

        info!(
            "Journaled {} items, skipped {} already seen, {} failed",
            summary.journaled, summary.skipped, summary.failed
        );
        Ok(summary)
    }

    async fn process_item(&self, item: &FeedItem, scratch_dir: &Path) -> Result<()> {
        // Attachment files live as long as `post` and are removed whatever the outcome.
        let post = self.builder.build(item, scratch_dir).await?;

        let entry = JournalEntry {
            journal: self.journal_name.clone(),
            date: post.iso_date(),
            tags: self.tags.clone(),
            attachments: post.attachment_paths().into_iter().map(Path::to_path_buf).collect(),
            text: render(&post),
        };

        self.journal.create_entry(&entry).await?;
        info!("Journaled {}: {}", item.guid, post.title);
        Ok(())
    }
}
