// src/utils/error.rs
use thiserror::Error;

use crate::wake::models::Tab;

// Errors raised while fetching a tab document
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error), // Automatically convert reqwest errors

    #[error("HTTP error: {0}")]
    Http(reqwest::StatusCode),

    #[error("Document not found: {0}")]
    NotFound(String),
}

/// A single field or strategy step that could not be derived.
/// These never abort a section; they end up as diagnostics on the entity report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("row {0} is not present")]
    MissingRow(usize),

    #[error("row {row} has no emphasized cell at index {index}")]
    MissingEmphasis { row: usize, index: usize },

    #[error("row {0} has no cells")]
    MissingCell(usize),

    #[error("no nodes to extract from")]
    NoNodes,

    #[error("label '{0}' has no value sibling")]
    MissingSibling(String),

    #[error("table {table} has {cells} cells, schema needs {needed}")]
    TableTooShort { table: usize, cells: usize, needed: usize },

    #[error("table {table} has a record with an empty key")]
    EmptyKey { table: usize },

    #[error("title row has no titles")]
    MissingTitles,

    #[error("column {0} could not be split")]
    UnsplittableColumn(usize),
}

/// Failures that abort a whole tab.
#[derive(Error, Debug)]
pub enum SectionError {
    #[error("{0} page reports 'Object Moved'")]
    Moved(Tab),

    #[error("{tab} page is missing anchor row {row} ({rows} rows present)")]
    MissingAnchor { tab: Tab, row: usize, rows: usize },

    #[error("Fetching {tab} failed: {source}")]
    Fetch {
        tab: Tab,
        #[source]
        source: FetchError,
    },
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
