// src/extractors/entity.rs
use serde::Serialize;

use crate::extractors::layout::{layout_for, TabLayout};
use crate::extractors::record::{Diagnostic, Record, Value};
use crate::extractors::section::{SectionExtractor, SectionOutput};
use crate::utils::error::SectionError;
use crate::wake::client::DocumentSource;
use crate::wake::models::{EntityId, Tab, TabRequest};

/// A tab that could not be extracted at all.
#[derive(Debug, Clone, Serialize)]
pub struct SectionFailure {
    pub tab: &'static str,
    pub error: String,
}

/// Everything extracted for one property.
#[derive(Debug, Clone)]
pub struct EntityReport {
    pub id: EntityId,
    /// Tab name -> tab record (or list for the list tabs).
    pub record: Record,
    pub failures: Vec<SectionFailure>,
    pub diagnostics: Vec<Diagnostic>,
}

impl EntityReport {
    pub fn failed(&self, tab: Tab) -> bool {
        self.failures.iter().any(|failure| failure.tab == tab.name())
    }

    /// The account tab is served for every real property; without it the
    /// id is treated as unused.
    pub fn exists(&self) -> bool {
        !self.failed(Tab::Account)
    }
}

/// Fetches and extracts all six tabs for an entity.
pub struct EntityExtractor<S> {
    source: S,
    sections: SectionExtractor,
}

impl<S: DocumentSource> EntityExtractor<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            sections: SectionExtractor::new(),
        }
    }

    /// Never fails: a tab that cannot be read is left out (or left as an
    /// empty list) and noted in `failures`. When the account tab fails the
    /// id is unused and the remaining tabs are not requested.
    pub async fn extract(&self, id: EntityId) -> EntityReport {
        let mut record = Record::new();
        let mut failures = Vec::new();
        let mut diagnostics = Vec::new();
        let mut extracted = 0;

        for tab in Tab::ALL {
            let layout = layout_for(tab);
            match self.extract_tab(layout, id).await {
                Ok(output) => {
                    extracted += 1;
                    record.set(tab.name(), output.value);
                    diagnostics.extend(output.diagnostics);
                }
                Err(e) => {
                    tracing::warn!("#{} {} skipped: {}", id, tab, e);
                    if layout.list_key.is_some() {
                        record.set(tab.name(), Value::List(Vec::new()));
                    }
                    failures.push(SectionFailure {
                        tab: tab.name(),
                        error: e.to_string(),
                    });
                    if tab == Tab::Account {
                        break;
                    }
                }
            }
        }

        tracing::info!(
            "#{}: {} tabs extracted, {} failed, {} diagnostics",
            id,
            extracted,
            failures.len(),
            diagnostics.len()
        );

        EntityReport {
            id,
            record,
            failures,
            diagnostics,
        }
    }

    async fn extract_tab(&self, layout: &TabLayout, id: EntityId) -> Result<SectionOutput, SectionError> {
        let request = TabRequest::new(layout.tab, id);
        let html = self
            .source
            .fetch(&request)
            .await
            .map_err(|source| SectionError::Fetch { tab: layout.tab, source })?;

        self.sections.extract(layout, &html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::fixtures;
    use crate::utils::error::FetchError;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Serves canned pages and remembers what was asked for.
    struct MemorySource {
        pages: HashMap<Tab, String>,
        requests: RefCell<Vec<TabRequest>>,
    }

    impl MemorySource {
        fn complete() -> Self {
            let pages = HashMap::from([
                (Tab::Account, fixtures::account_page()),
                (Tab::Building, fixtures::building_page()),
                (Tab::Land, fixtures::land_page()),
                (Tab::Deeds, fixtures::deeds_page()),
                (Tab::Notes, fixtures::notes_page()),
                (Tab::Sales, fixtures::sales_page()),
            ]);
            Self {
                pages,
                requests: RefCell::new(Vec::new()),
            }
        }

        fn with(mut self, tab: Tab, page: String) -> Self {
            self.pages.insert(tab, page);
            self
        }

        fn without(mut self, tab: Tab) -> Self {
            self.pages.remove(&tab);
            self
        }
    }

    impl DocumentSource for MemorySource {
        async fn fetch(&self, request: &TabRequest) -> Result<String, FetchError> {
            self.requests.borrow_mut().push(request.clone());
            self.pages
                .get(&request.tab)
                .cloned()
                .ok_or_else(|| FetchError::NotFound(request.tab.page().to_string()))
        }
    }

    fn id() -> EntityId {
        EntityId::new(42).unwrap()
    }

    #[test]
    fn test_extracts_all_six_tabs_in_order() {
        let extractor = EntityExtractor::new(MemorySource::complete());
        let report = tokio_test::block_on(extractor.extract(id()));

        assert!(report.exists());
        assert!(report.failures.is_empty());
        assert_eq!(
            report.record.keys().collect::<Vec<_>>(),
            vec!["Account", "Building", "Land", "Deeds", "Notes", "Sales"]
        );
        assert_eq!(
            report.record.record("Account").unwrap().text("Property Owner"),
            Some("DOE, JANE")
        );
        assert_eq!(report.record.list("Deeds").unwrap().len(), 2);
        // Orphan label and the short additions table on the building page.
        assert_eq!(report.diagnostics.len(), 2);

        let requests = extractor.source.requests.borrow();
        assert_eq!(requests.len(), 6);
        assert_eq!(requests[1].params(), vec![("id", "0000042".to_string()), ("cd", "01".to_string())]);
    }

    #[test]
    fn test_moved_building_page_only_loses_building() {
        let source = MemorySource::complete().with(Tab::Building, fixtures::moved_page());
        let extractor = EntityExtractor::new(source);
        let report = tokio_test::block_on(extractor.extract(id()));

        assert!(report.exists());
        assert!(report.failed(Tab::Building));
        assert_eq!(report.failures.len(), 1);
        assert!(report.record.get("Building").is_none());
        for tab in [Tab::Account, Tab::Land] {
            assert!(!report.record.record(tab.name()).unwrap().is_empty(), "{} missing", tab);
        }
        for tab in [Tab::Deeds, Tab::Notes, Tab::Sales] {
            assert!(!report.record.list(tab.name()).unwrap().is_empty(), "{} missing", tab);
        }
    }

    #[test]
    fn test_failed_list_tab_becomes_empty_list() {
        let source = MemorySource::complete()
            .with(Tab::Sales, fixtures::moved_page())
            .without(Tab::Notes);
        let extractor = EntityExtractor::new(source);
        let report = tokio_test::block_on(extractor.extract(id()));

        assert_eq!(report.record.list("Sales"), Some(&[][..]));
        assert_eq!(report.record.list("Notes"), Some(&[][..]));
        assert_eq!(report.failures.len(), 2);
        assert!(report.failures.iter().any(|f| f.tab == "Notes" && f.error.contains("not found")));
    }

    #[test]
    fn test_missing_account_means_entity_does_not_exist() {
        let source = MemorySource::complete().with(Tab::Account, fixtures::moved_page());
        let extractor = EntityExtractor::new(source);
        let report = tokio_test::block_on(extractor.extract(id()));

        assert!(!report.exists());
        assert!(report.record.is_empty());
        assert_eq!(report.failures.len(), 1);

        // Unused ids cost a single request.
        let requests = extractor.source.requests.borrow();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].tab, Tab::Account);
    }

    #[test]
    fn test_entity_record_serializes_by_tab() {
        let extractor = EntityExtractor::new(MemorySource::complete());
        let report = tokio_test::block_on(extractor.extract(id()));
        let json = serde_json::to_value(&report.record).unwrap();

        assert_eq!(json["Account"]["PIN #"], "1703 12 3456");
        assert_eq!(json["Building"]["Additions"]["A"]["Area"], "1200");
        assert_eq!(json["Sales"][1], serde_json::json!({"Amount": "200"}));
    }
}
