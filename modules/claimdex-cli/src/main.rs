//! Dev driver: run the scan pipeline against a scripted gallery.
//!
//! The production host is a live page; this binary exists to exercise the
//! full pipeline end to end against `simgallery` scenarios and to produce
//! CSV exports from them.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use claimdex_common::ScanConfig;
use claimdex_engine::{Scanner, TracingSink};
use simgallery::{AlbumScript, ScriptedComment, ScriptedItem, SimGallery};

#[derive(Parser, Debug)]
#[command(name = "claimdex", version, about = "Scan a scripted gallery for booking claims")]
struct Cli {
    /// JSON album script; a built-in demo album is used when omitted.
    #[arg(long)]
    script: Option<PathBuf>,
    /// Booking keyword to search for.
    #[arg(long)]
    keyword: Option<String>,
    /// Origin used to absolutize references.
    #[arg(long)]
    origin: Option<String>,
    /// Write the CSV export to this path after the run.
    #[arg(long)]
    csv: Option<PathBuf>,
    /// Print rows as JSON instead of plain text.
    #[arg(long, default_value_t = false)]
    rows_json: bool,
    /// Keep the page-calibrated delays instead of the compact ones the
    /// simulated host is happy with.
    #[arg(long, default_value_t = false)]
    real_timings: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = ScanConfig::from_env();
    if let Some(keyword) = cli.keyword {
        config.keyword = keyword;
    }
    if let Some(origin) = cli.origin {
        config.origin = origin;
    }
    if !cli.real_timings {
        compact_timings(&mut config);
    }

    let script = match &cli.script {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading album script {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing album script {}", path.display()))?
        }
        None => demo_script(),
    };

    let host = Arc::new(SimGallery::new(script));
    let scanner = Scanner::new(host, config, Arc::new(TracingSink));

    let stats = scanner.run().await?;
    println!("{stats}");

    let rows = scanner.rows();
    if cli.rows_json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        for row in &rows {
            println!("{} ({} items)", row.claimant, row.items.len());
            for item in &row.items {
                println!("  {item}");
            }
        }
    }

    if let Some(path) = cli.csv {
        match scanner.export_csv() {
            Some(csv) => {
                fs::write(&path, csv)
                    .with_context(|| format!("writing CSV export {}", path.display()))?;
                info!(path = %path.display(), "CSV export written");
            }
            None => info!("Nothing to export"),
        }
    }

    Ok(())
}

/// The sim host reacts per call, so sub-millisecond waits only slow the
/// demo down.
fn compact_timings(config: &mut ScanConfig) {
    config.gallery_step_delay = Duration::from_millis(20);
    config.comments_ready_poll = Duration::from_millis(5);
    config.comments_settle = Duration::from_millis(5);
    config.comment_load_pause = Duration::from_millis(10);
    config.advance_poll = Duration::from_millis(5);
    config.open_settle = Duration::from_millis(5);
    config.comments_ready_timeout = Duration::from_millis(500);
    config.advance_timeout = Duration::from_millis(500);
}

/// Small album with a booking hiding in the chatter.
fn demo_script() -> AlbumScript {
    AlbumScript::new("https://vk.com")
        .item(
            ScriptedItem::new("/photo-100_1")
                .comment(ScriptedComment::by_href("Какая красота!", "/id11"))
                .comment(ScriptedComment::by_href("Бронь", "/id7")),
        )
        .item(
            ScriptedItem::new("/photo-100_2")
                .comment(ScriptedComment::by_href("бронь, пожалуйста", "/id7"))
                .comment(ScriptedComment::by_id("и мне бронь", "/id12")),
        )
        .item(
            ScriptedItem::new("/photo-100_3")
                // Contains the keyword only as a fragment — must not match.
                .comment(ScriptedComment::by_href("Бронька какая!", "/id11")),
        )
}
