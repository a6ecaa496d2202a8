use anyhow::{bail, Context};
use clap::Parser;
use rss2dayone::feed::is_valid_feed_url;
use rss2dayone::{
    Config, DayOne, FeedReader, FileStorage, HttpFetcher, PostBuilder, Runner, SeenSet,
};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Copy new feed items into a Day One journal.
#[derive(Debug, Parser)]
#[command(name = "rss2dayone", version)]
struct Cli {
    /// Feed to read
    feed_url: String,

    /// Day One journal to write entries into
    journal: String,

    /// Tags applied to every new entry
    tags: Vec<String>,

    /// File recording which items have already been journaled
    #[arg(long, env = "RSS2DAYONE_CACHE")]
    cache_file: Option<PathBuf>,

    /// Day One command line tool
    #[arg(long, env = "RSS2DAYONE_DAYONE_BIN")]
    dayone_bin: Option<String>,

    /// Give up on network requests after this many seconds
    #[arg(long)]
    timeout: Option<u64>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = Config::new(cli.feed_url, cli.journal, cli.tags)
        .with_cache_path(cli.cache_file)
        .with_dayone_bin(cli.dayone_bin)
        .with_timeout(cli.timeout);

    if let Err(e) = run(config).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> anyhow::Result<()> {
    if !is_valid_feed_url(&config.feed_url) {
        bail!("not an http(s) feed url: {}", config.feed_url);
    }

    let storage = FileStorage::new(&config.cache_path);
    let mut seen = SeenSet::load(&storage)
        .with_context(|| format!("loading {}", storage.path().display()))?;
    info!("{} items already journaled", seen.len());

    let reader = FeedReader::new(&config.fetch)?;
    let items = reader
        .fetch(&config.feed_url)
        .await
        .with_context(|| format!("reading feed {}", config.feed_url))?;

    let builder = PostBuilder::new(Box::new(HttpFetcher::new(&config.fetch)?));
    let runner = Runner::new(
        builder,
        Box::new(DayOne::new(&config.dayone_bin)),
        &config.journal,
        config.tags.clone(),
    );

    runner
        .run(&items, &mut seen, &storage)
        .await
        .with_context(|| format!("journaling items from {}", config.feed_url))?;

    Ok(())
}
