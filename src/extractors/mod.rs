// src/extractors/mod.rs
pub mod entity;
pub mod layout;
pub mod record;
pub mod section;
pub mod strategy;
pub mod text;

#[cfg(test)]
pub(crate) mod fixtures;

// Re-export key extraction types for convenience
#[allow(unused_imports)]
pub use entity::{EntityExtractor, EntityReport, SectionFailure};
#[allow(unused_imports)]
pub use record::{Diagnostic, Record, Value};
#[allow(unused_imports)]
pub use section::{SectionExtractor, SectionOutput};
#[allow(unused_imports)]
pub use strategy::{
    AlternatingLabels,
    ExtractionStrategy,
    HeaderedTable,
    KeyedTable,
    PairedEmphasis,
};
