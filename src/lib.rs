pub mod types;
pub mod config;
pub mod cache;
pub mod feed;
pub mod markdown;
pub mod attachments;
pub mod post;
pub mod render;
pub mod journal;
pub mod runner;

pub use types::*;
pub use config::Config;
pub use cache::{CacheStorage, FileStorage, MemoryStorage, SeenSet};
pub use feed::FeedReader;
pub use attachments::{AttachmentFetcher, HttpFetcher};
pub use post::{Post, PostBuilder};
pub use render::render;
pub use journal::{DayOne, Journal, JournalEntry};
pub use runner::{RunSummary, Runner};
