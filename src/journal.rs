use crate::types::{Result, Rss2DayOneError};
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

/// Everything the journaling command needs for one entry.
#[derive(Debug, Clone)]
pub struct JournalEntry {
    pub journal: String,
    /// `YYYY-MM-DDTHH:MM:SS`, no offset.
    pub date: String,
    pub tags: Vec<String>,
    pub attachments: Vec<PathBuf>,
    pub text: String,
}

/// Destination for rendered posts.
#[async_trait]
pub trait Journal: Send + Sync {
    async fn create_entry(&self, entry: &JournalEntry) -> Result<()>;
}

/// Creates entries through the Day One command line tool.
pub struct DayOne {
    program: String,
}

impl DayOne {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn args(entry: &JournalEntry) -> Vec<String> {
        let mut args = vec![
            "new".to_string(),
            "--journal".to_string(),
            entry.journal.clone(),
            "--isoDate".to_string(),
            entry.date.clone(),
        ];

        if !entry.tags.is_empty() {
            args.push("--tags".to_string());
            args.extend(entry.tags.iter().cloned());
        }

        for path in &entry.attachments {
            args.push("-a".to_string());
            args.push(path.to_string_lossy().into_owned());
        }

        args
    }
}

impl Default for DayOne {
    fn default() -> Self {
        Self::new("dayone2")
    }
}

#[async_trait]
impl Journal for DayOne {
    async fn create_entry(&self, entry: &JournalEntry) -> Result<()> {
        let args = Self::args(entry);
        debug!("Running {} {}", self.program, args.join(" "));

        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Rss2DayOneError::Invocation(format!("failed to execute {}: {}", self.program, e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(entry.text.as_bytes())
                .await
                .map_err(|e| Rss2DayOneError::Invocation(format!("writing entry text: {}", e)))?;
            // Closing stdin tells the command the entry text is complete.
            drop(stdin);
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| Rss2DayOneError::Invocation(e.to_string()))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        if !output.status.success() {
            return Err(Rss2DayOneError::Invocation(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        if !stdout.trim().is_empty() {
            info!("{}", stdout.trim());
        }
        if !stderr.trim().is_empty() {
            debug!("{}", stderr.trim());
        }

        Ok(())
    }
}
