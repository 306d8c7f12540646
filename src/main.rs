// src/main.rs
mod utils;
mod wake;
mod extractors;
mod storage;

use std::time::Duration;

use clap::Parser;
use utils::AppError;
use utils::html_debug::DebugSource;
use wake::client::{DocumentSource, WakeClient, DEFAULT_BASE_URL};
use wake::models::{EntityId, MAX_ENTITY_ID};
use extractors::entity::EntityExtractor;
use storage::StorageManager;

/// Command Line Interface for the Wake County real estate extractor
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// First property id to extract
    #[arg(long, default_value_t = 1)]
    start: u32,

    /// Last property id to extract (inclusive)
    #[arg(long, default_value_t = MAX_ENTITY_ID)]
    end: u32,

    /// Stop after this many consecutive ids without an account page
    #[arg(long, env = "WAKE_MAX_FAIL", default_value_t = 50)]
    max_fail: u32,

    /// Output directory for entity files and the merged corpus
    #[arg(short, long, default_value = "./houses")]
    output_dir: String,

    /// Report site root
    #[arg(long, env = "WAKE_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Delay before every request, in milliseconds
    #[arg(long, env = "WAKE_REQUEST_DELAY_MS", default_value_t = 150)]
    delay_ms: u64,

    /// Debug mode - save raw and row-annotated copies of every page
    #[arg(short, long)]
    debug: bool,

    /// Only merge already saved entity files into the corpus
    #[arg(long)]
    merge_only: bool,
}

impl Args {
    fn id_range(&self) -> Result<(EntityId, EntityId), AppError> {
        let start = EntityId::new(self.start)
            .ok_or_else(|| AppError::Config(format!("start id {} has more than 7 digits", self.start)))?;
        let end = EntityId::new(self.end)
            .ok_or_else(|| AppError::Config(format!("end id {} has more than 7 digits", self.end)))?;
        if start > end {
            return Err(AppError::Config(format!("start id {} is after end id {}", start, end)));
        }
        Ok((start, end))
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Parse CLI Arguments
    let args = Args::parse();

    // 2. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging(if args.debug { "debug" } else { "info" });
    tracing::info!("Starting processing for args: {:?}", args);

    // 3. Initialize storage
    let storage = StorageManager::new(&args.output_dir)?;

    if args.merge_only {
        storage.merge_corpus()?;
        return Ok(());
    }

    let (start, end) = args.id_range()?;
    let client = WakeClient::new(&args.base_url, Duration::from_millis(args.delay_ms))?;

    // 4. Walk the id range
    let saved = if args.debug {
        let debug_dir = storage.base_dir().join("debug");
        tracing::info!("Saving fetched pages under {}", debug_dir.display());
        run(EntityExtractor::new(DebugSource::new(client, debug_dir)), &storage, start, end, args.max_fail).await
    } else {
        run(EntityExtractor::new(client), &storage, start, end, args.max_fail).await
    };

    // 5. Assemble the corpus
    if saved > 0 {
        storage.merge_corpus()?;
    }

    Ok(())
}

/// Extracts ids `start..=end`, stopping early after `max_fail` consecutive
/// ids without an account page. Returns how many entities were saved.
async fn run<S: DocumentSource>(
    extractor: EntityExtractor<S>,
    storage: &StorageManager,
    start: EntityId,
    end: EntityId,
    max_fail: u32,
) -> usize {
    let mut fail_count = 0;
    let mut saved = 0;

    for n in start.value()..=end.value() {
        if fail_count >= max_fail {
            tracing::info!("{} consecutive ids without data, finished collecting", fail_count);
            break;
        }
        let Some(id) = EntityId::new(n) else { break };

        let report = extractor.extract(id).await;
        if !report.exists() {
            fail_count += 1;
            tracing::info!("#{} has no account page ({} in a row)", id, fail_count);
            continue;
        }
        fail_count = 0;

        match storage.save_entity(&report) {
            Ok(path) => {
                saved += 1;
                tracing::info!("Saved #{} to: {}", id, path.display());
            }
            Err(e) => tracing::error!("Failed to save #{}: {}", id, e),
        }
        if let Err(e) = storage.save_entity_metadata(&report) {
            tracing::error!("Failed to save metadata for #{}: {}", id, e);
        }
    }

    tracing::info!("Processing finished. Saved {} entities", saved);
    saved
}
