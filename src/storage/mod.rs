// src/storage/mod.rs
use std::fs;
use std::path::{Path, PathBuf};

use crate::extractors::entity::EntityReport;
use crate::utils::error::StorageError;

/// File the merged corpus is written to, inside the base directory.
pub const CORPUS_FILE: &str = "corpus.json";

const META_SUFFIX: &str = "_meta";

pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        // Create the base directory if it doesn't exist
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Saves the entity record as `<id>.json`
    pub fn save_entity(&self, report: &EntityReport) -> Result<PathBuf, StorageError> {
        let file_path = self.base_dir.join(format!("{}.json", report.id));

        let json = serde_json::to_string_pretty(&report.record)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        fs::write(&file_path, json).map_err(StorageError::IoError)?;

        tracing::debug!("Saved entity to {}", file_path.display());
        Ok(file_path)
    }

    /// Saves what went wrong while extracting the entity as `<id>_meta.json`
    pub fn save_entity_metadata(&self, report: &EntityReport) -> Result<PathBuf, StorageError> {
        let file_path = self.base_dir.join(format!("{}{}.json", report.id, META_SUFFIX));

        let metadata = serde_json::json!({
            "id": report.id.to_string(),
            "tabs": report.record.keys().collect::<Vec<_>>(),
            "failures": report.failures,
            "diagnostics": report.diagnostics,
            "extraction_timestamp": chrono::Utc::now().to_rfc3339(),
        });

        let metadata_str = serde_json::to_string_pretty(&metadata)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        fs::write(&file_path, metadata_str).map_err(StorageError::IoError)?;

        tracing::debug!("Saved metadata to {}", file_path.display());
        Ok(file_path)
    }

    /// Merges every saved entity file, ordered by id, into one JSON array.
    pub fn merge_corpus(&self) -> Result<PathBuf, StorageError> {
        let mut entity_files: Vec<PathBuf> = fs::read_dir(&self.base_dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| is_entity_file(path))
            .collect();
        entity_files.sort();

        let mut corpus = Vec::with_capacity(entity_files.len());
        for path in &entity_files {
            let content = fs::read_to_string(path)?;
            match serde_json::from_str::<serde_json::Value>(&content) {
                Ok(entity) => corpus.push(entity),
                Err(e) => tracing::warn!("Skipping unreadable entity file {}: {}", path.display(), e),
            }
        }

        let file_path = self.base_dir.join(CORPUS_FILE);
        let corpus_str = serde_json::to_string(&corpus)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        fs::write(&file_path, corpus_str)?;

        tracing::info!("Merged {} entities into {}", corpus.len(), file_path.display());
        Ok(file_path)
    }
}

/// Entity files are named by the seven-digit id alone.
fn is_entity_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
        && path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .is_some_and(|stem| stem.len() == 7 && stem.bytes().all(|b| b.is_ascii_digit()))
}
