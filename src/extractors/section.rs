// src/extractors/section.rs

// --- Imports ---
use crate::extractors::layout::{DirectField, Nodes, Step, TabLayout};
use crate::extractors::record::{Diagnostic, Diagnostics, Record, Value};
use crate::extractors::text::{assign_or_report, cells, clean_text, emphasized};
use crate::utils::error::{FieldError, SectionError};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

// --- Constants ---
/// Heading text of the placeholder page served for ids with no data.
pub const MOVED_SENTINEL: &str = "Object Moved";

// --- CSS Selectors (Lazy Static) ---
static ROW_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("tr").expect("Failed to compile ROW_SELECTOR"));

static TABLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table").expect("Failed to compile TABLE_SELECTOR"));

static HEADING_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h1").expect("Failed to compile HEADING_SELECTOR"));

// --- Data Structures ---
/// What one tab contributes to an entity: a record for the flat tabs, a list
/// for the list tabs, plus everything that went wrong along the way.
#[derive(Debug, Clone)]
pub struct SectionOutput {
    pub value: Value,
    pub diagnostics: Vec<Diagnostic>,
}

/// Applies a [`TabLayout`] to one fetched page.
#[derive(Debug, Default)]
pub struct SectionExtractor;

impl SectionExtractor {
    pub fn new() -> Self {
        Self {}
    }

    /// Extracts one tab. Fails only on the placeholder page or when the
    /// layout's anchor row is missing; anything smaller becomes a diagnostic.
    pub fn extract(&self, layout: &TabLayout, html_content: &str) -> Result<SectionOutput, SectionError> {
        let document = Html::parse_document(html_content);

        if is_moved(&document) {
            tracing::debug!("{} page is the '{}' placeholder", layout.tab, MOVED_SENTINEL);
            return Err(SectionError::Moved(layout.tab));
        }

        let rows: Vec<ElementRef> = document.select(&ROW_SELECTOR).collect();
        if rows.len() <= layout.anchor_row {
            return Err(SectionError::MissingAnchor {
                tab: layout.tab,
                row: layout.anchor_row,
                rows: rows.len(),
            });
        }

        let scope = layout.tab.name().to_lowercase();
        let mut record = Record::new();
        let mut diagnostics = Diagnostics::new();

        for field in layout.fields {
            let field_scope = format!("{}.{}", scope, field.field);
            assign_or_report(&mut record, &mut diagnostics, &field_scope, || read_direct(&rows, field));
        }

        for (index, step) in layout.steps.iter().enumerate() {
            let step_scope = format!("{}.{}[{}]", scope, step.strategy.name(), index);
            run_step(&rows, step, &step_scope, &mut record, &mut diagnostics);
        }

        tracing::debug!(
            "{}: {} fields, {} diagnostics",
            layout.tab,
            record.len(),
            diagnostics.entries().len()
        );

        let value = match layout.list_key {
            Some(key) => match record.remove(key) {
                Some(Value::List(list)) => Value::List(list),
                _ => Value::List(Vec::new()),
            },
            None => Value::Record(record),
        };

        Ok(SectionOutput {
            value,
            diagnostics: diagnostics.into_vec(),
        })
    }
}

/// True when the page's first heading is exactly the placeholder text.
/// Only surrounding whitespace is ignored.
pub fn is_moved(document: &Html) -> bool {
    document
        .select(&HEADING_SELECTOR)
        .next()
        .is_some_and(|heading| heading.text().collect::<String>().trim() == MOVED_SENTINEL)
}

fn read_direct(rows: &[ElementRef<'_>], field: &DirectField) -> Result<(String, String), FieldError> {
    let row = rows.get(field.row).ok_or(FieldError::MissingRow(field.row))?;
    let bold = emphasized(*row);

    let parts = field
        .emphasis
        .iter()
        .map(|&index| {
            bold.get(index)
                .map(|b| clean_text(&b.text().collect::<String>(), true))
                .ok_or(FieldError::MissingEmphasis { row: field.row, index })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok((field.field.to_string(), parts.join(" ")))
}

fn run_step(rows: &[ElementRef<'_>], step: &Step, scope: &str, record: &mut Record, diagnostics: &mut Diagnostics) {
    // Holds the re-parsed title row; must outlive `nodes`.
    let split_fragment: Html;

    let mut nodes = match resolve(rows, step.nodes) {
        Ok(nodes) => nodes,
        Err(error) => {
            diagnostics.report(scope, error);
            return;
        }
    };

    if let (Some(split), Some(first)) = (step.title_split, nodes.first().copied()) {
        match split.rewrite(first) {
            Ok(fragment) => {
                split_fragment = fragment;
                if let Some(row) = split_fragment.select(&ROW_SELECTOR).next() {
                    nodes[0] = row;
                }
            }
            Err(error) => diagnostics.report(scope, error),
        }
    }

    step.strategy.apply(scope, &nodes, record, diagnostics);
}

fn row_at<'a>(rows: &[ElementRef<'a>], index: usize) -> Result<ElementRef<'a>, FieldError> {
    rows.get(index).copied().ok_or(FieldError::MissingRow(index))
}

fn row_range<'r, 'a>(rows: &'r [ElementRef<'a>], start: usize, end: usize) -> Result<&'r [ElementRef<'a>], FieldError> {
    if start >= rows.len() {
        return Err(FieldError::MissingRow(start));
    }
    Ok(&rows[start..end.clamp(start, rows.len())])
}

fn resolve<'a>(rows: &[ElementRef<'a>], nodes: Nodes) -> Result<Vec<ElementRef<'a>>, FieldError> {
    match nodes {
        Nodes::Rows { start, end } => Ok(row_range(rows, start, end)?.to_vec()),
        Nodes::CellsOfRows { start, end } => Ok(row_range(rows, start, end)?
            .iter()
            .flat_map(|row| cells(*row))
            .collect()),
        Nodes::NestedRows(index) => {
            let row = row_at(rows, index)?;
            Ok(row
                .select(&ROW_SELECTOR)
                .filter(|nested| nested.id() != row.id())
                .collect())
        }
        Nodes::NestedTables(index) => {
            let row = row_at(rows, index)?;
            let first = cells(row).into_iter().next().ok_or(FieldError::MissingCell(index))?;
            Ok(first.select(&TABLE_SELECTOR).collect())
        }
        Nodes::TableFrom(index) => {
            let row = row_at(rows, index)?;
            let mut table = vec![row];
            table.extend(
                row.next_siblings()
                    .filter_map(ElementRef::wrap)
                    .filter(|sibling| sibling.value().name() == "tr"),
            );
            Ok(table)
        }
    }
}
