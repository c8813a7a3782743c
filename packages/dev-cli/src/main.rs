//! Development CLI for the capture engine.
//!
//! Runs captures against saved page snapshots (JSON) or raw HTML files
//! without a browser host, and exports a saved-posts file as a dataset.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use capture::dom::{snapshot_from_html, PageSnapshot, Point, Viewport};
use capture::{
    text_summary, CaptureConfig, CaptureService, Dataset, DedupPolicy, MemoryStore, NoopExpander,
    PostRecord, PostStore,
};

#[derive(Parser)]
#[command(name = "capture-dev", about = "Post capture engine dev tool")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Capture a post from a snapshot (.json) or page (.html) file.
    Capture {
        /// Path to the snapshot JSON or HTML file.
        page: PathBuf,

        /// Page URL, required for HTML input (JSON snapshots carry one).
        #[arg(long)]
        url: Option<String>,

        /// Interaction X coordinate.
        #[arg(long)]
        x: Option<f64>,

        /// Interaction Y coordinate.
        #[arg(long)]
        y: Option<f64>,

        /// Saved-posts JSON file to append to.
        #[arg(long)]
        posts: Option<PathBuf>,

        /// Store duplicates instead of suppressing them.
        #[arg(long)]
        allow_duplicates: bool,
    },

    /// Export a saved-posts JSON file.
    Export {
        /// Saved-posts JSON file.
        posts: PathBuf,

        /// Emit a plain-text summary instead of the dataset JSON.
        #[arg(long)]
        text: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Capture {
            page,
            url,
            x,
            y,
            posts,
            allow_duplicates,
        } => run_capture(&page, url.as_deref(), x, y, posts.as_deref(), allow_duplicates).await,
        Command::Export { posts, text } => run_export(&posts, text),
    }
}

async fn run_capture(
    page_path: &Path,
    url: Option<&str>,
    x: Option<f64>,
    y: Option<f64>,
    posts_path: Option<&Path>,
    allow_duplicates: bool,
) -> Result<()> {
    let mut page = load_page(page_path, url)?;
    info!(url = %page.url, nodes = page.len(), "snapshot loaded");

    let mut config = CaptureConfig::new();
    if allow_duplicates {
        config = config.with_dedup(DedupPolicy::Off);
    }
    let store = MemoryStore::new();
    if let Some(path) = posts_path {
        store.save_posts(&load_posts(path)?).await?;
    }
    let service = CaptureService::new(store, config);

    let hint = match (x, y) {
        (Some(x), Some(y)) => Some(Point::new(x, y)),
        _ => None,
    };
    let record = service.capture(&mut page, hint, &NoopExpander).await?;
    println!("{}", serde_json::to_string_pretty(&record)?);

    if let Some(path) = posts_path {
        let posts = service.store().load_posts().await?;
        std::fs::write(path, serde_json::to_string_pretty(&posts)?)
            .with_context(|| format!("writing {}", path.display()))?;
        info!(count = posts.len(), path = %path.display(), "posts saved");
    }
    Ok(())
}

fn run_export(posts_path: &Path, text: bool) -> Result<()> {
    let posts = load_posts(posts_path)?;
    if text {
        print!("{}", text_summary(&posts));
    } else {
        println!("{}", Dataset::from_records(&posts).to_json()?);
    }
    Ok(())
}

fn load_page(path: &Path, url: Option<&str>) -> Result<PageSnapshot> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let is_html = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm"));
    if is_html {
        let Some(url) = url else {
            bail!("--url is required for HTML input");
        };
        Ok(snapshot_from_html(&content, url, Viewport::default()))
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("parsing snapshot {}", path.display()))
    }
}

fn load_posts(path: &Path) -> Result<Vec<PostRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing posts {}", path.display()))
}
