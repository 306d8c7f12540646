// src/extractors/strategy.rs
//! The reusable extraction algorithms. Each one reads a node sequence picked
//! out by a tab layout and writes what it finds into the tab's record.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Node, Selector};

use crate::extractors::record::{Diagnostics, Record, Value};
use crate::extractors::text::{assign, cells, clean_text, has_emphasis, next_element, node_text};
use crate::utils::error::FieldError;

static CELL_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td").expect("Failed to compile CELL_SELECTOR"));

/// Marker that turns the whitespace between two words into a cell boundary.
pub const CELL_BREAK: &str = "</td><td>";

/// Column schema for the keyed tabular strategy; `None` skips a column.
pub type ColumnSchema = [Option<&'static str>];

/// A strategy consumes a node sequence and adds fields (or a nested value)
/// to `target`. Problems go to `diagnostics`; a strategy never fails outright.
pub trait ExtractionStrategy: Sync {
    fn name(&self) -> &'static str;

    fn apply(&self, scope: &str, nodes: &[ElementRef<'_>], target: &mut Record, diagnostics: &mut Diagnostics);
}

/// Rows whose value sits in an emphasized cell next to a plain label cell.
pub struct PairedEmphasis;

impl ExtractionStrategy for PairedEmphasis {
    fn name(&self) -> &'static str {
        "paired_emphasis"
    }

    fn apply(&self, scope: &str, nodes: &[ElementRef<'_>], target: &mut Record, diagnostics: &mut Diagnostics) {
        if nodes.is_empty() {
            diagnostics.report(scope, FieldError::NoNodes);
            return;
        }

        for row in nodes {
            let mut field: Option<String> = None;
            let mut value: Option<String> = None;

            for cell in cells(*row) {
                if has_emphasis(cell) {
                    // first emphasized cell wins
                    if value.is_none() {
                        value = Some(node_text(cell));
                    }
                } else if field.is_none() {
                    let text = node_text(cell);
                    if !text.is_empty() {
                        field = Some(text);
                    }
                }
            }

            if let (Some(field), Some(value)) = (field, value) {
                assign(target, &field, &value);
            }
        }
    }
}

/// Cells laid out label, value, label, value... The value is looked up as
/// the label's sibling in the tree, so a pre-filtered sequence still pairs up.
pub struct AlternatingLabels;

impl ExtractionStrategy for AlternatingLabels {
    fn name(&self) -> &'static str {
        "alternating_labels"
    }

    fn apply(&self, scope: &str, nodes: &[ElementRef<'_>], target: &mut Record, diagnostics: &mut Diagnostics) {
        if nodes.is_empty() {
            diagnostics.report(scope, FieldError::NoNodes);
            return;
        }

        for (index, label_cell) in nodes.iter().enumerate().step_by(2) {
            let label = node_text(*label_cell);
            match next_element(*label_cell) {
                Some(value_cell) => {
                    assign(target, &label, &node_text(value_cell));
                }
                None => diagnostics.report(&format!("{}[{}]", scope, index), FieldError::MissingSibling(label)),
            }
        }
    }
}

/// Tables of key cell followed by schema columns, cycling every
/// `schema.len() + 1` cells. Produces `field -> {key -> {column: value}}`.
pub struct KeyedTable {
    pub field: &'static str,
    pub schema: &'static ColumnSchema,
}

impl KeyedTable {
    fn close(&self, open: Option<(String, Record)>, table: usize, result: &mut Record, scope: &str, diagnostics: &mut Diagnostics) {
        let Some((key, record)) = open else { return };
        if key.is_empty() {
            diagnostics.report(scope, FieldError::EmptyKey { table });
        } else if !record.is_empty() {
            result.set(key, Value::Record(record));
        }
    }
}

impl ExtractionStrategy for KeyedTable {
    fn name(&self) -> &'static str {
        "keyed_table"
    }

    fn apply(&self, scope: &str, nodes: &[ElementRef<'_>], target: &mut Record, diagnostics: &mut Diagnostics) {
        if nodes.is_empty() {
            diagnostics.report(scope, FieldError::NoNodes);
            return;
        }

        let cycle = self.schema.len() + 1;
        let mut result = Record::new();

        for (table, node) in nodes.iter().enumerate() {
            let table_cells: Vec<ElementRef> = node.select(&CELL_SELECTOR).collect();
            if table_cells.len() < self.schema.len() {
                diagnostics.report(
                    scope,
                    FieldError::TableTooShort { table, cells: table_cells.len(), needed: self.schema.len() },
                );
                continue;
            }

            let mut open: Option<(String, Record)> = None;
            for (i, cell) in table_cells.iter().enumerate() {
                match i % cycle {
                    0 => {
                        self.close(open.take(), table, &mut result, scope, diagnostics);
                        open = Some((node_text(*cell), Record::new()));
                    }
                    slot => {
                        if let (Some(column), Some((_, record))) = (self.schema[slot - 1], open.as_mut()) {
                            assign(record, column, &node_text(*cell));
                        }
                    }
                }
            }
            self.close(open, table, &mut result, scope, diagnostics);
        }

        if !result.is_empty() {
            target.set(self.field, Value::Record(result));
        }
    }
}

/// What to do with data rows that produce no fields at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyRowPolicy {
    Keep,
    Drop,
}

/// First row holds column titles, every later row becomes a record.
/// Cells past the last title are dropped; short rows just lack the
/// trailing fields.
pub struct HeaderedTable {
    pub field: &'static str,
    pub empty_rows: EmptyRowPolicy,
}

impl ExtractionStrategy for HeaderedTable {
    fn name(&self) -> &'static str {
        "headered_table"
    }

    fn apply(&self, scope: &str, nodes: &[ElementRef<'_>], target: &mut Record, diagnostics: &mut Diagnostics) {
        let Some((title_row, data_rows)) = nodes.split_first() else {
            diagnostics.report(scope, FieldError::NoNodes);
            return;
        };

        let titles: Vec<String> = cells(*title_row).into_iter().map(node_text).collect();
        if titles.iter().all(String::is_empty) {
            diagnostics.report(scope, FieldError::MissingTitles);
            return;
        }

        let mut records = Vec::with_capacity(data_rows.len());
        for row in data_rows {
            let mut record = Record::new();
            for (title, cell) in titles.iter().zip(cells(*row)) {
                assign(&mut record, title, &node_text(cell));
            }

            if record.is_empty() && self.empty_rows == EmptyRowPolicy::Drop {
                continue;
            }
            records.push(record);
        }

        tracing::trace!("{}: {} records under {} titles", scope, records.len(), titles.len());
        target.set(self.field, Value::List(records));
    }
}

/// Splits one cell of a row at the whitespace in its text, yielding a cell
/// per word. Works on a serialized copy re-parsed as its own fragment.
#[derive(Debug, Clone, Copy)]
pub struct TitleSplit {
    pub column: usize,
}

impl TitleSplit {
    pub fn rewrite(&self, row: ElementRef<'_>) -> Result<Html, FieldError> {
        let row_cells = cells(row);
        let cell = row_cells
            .get(self.column)
            .ok_or(FieldError::UnsplittableColumn(self.column))?;

        let text = clean_text(&separated_text(*cell), true);
        let words: Vec<String> = text.split(' ').filter(|word| !word.is_empty()).map(escape_text).collect();
        if words.len() < 2 {
            return Err(FieldError::UnsplittableColumn(self.column));
        }

        let split_cell = format!("<td>{}</td>", words.join(CELL_BREAK));
        let row_html = row.html().replacen(&cell.html(), &split_cell, 1);
        Ok(Html::parse_fragment(&format!("<table>{}</table>", row_html)))
    }
}

/// Text of an element with every `<br>` read as a space.
fn separated_text(element: ElementRef<'_>) -> String {
    let mut text = String::new();
    for node in element.descendants() {
        match node.value() {
            Node::Text(chunk) => text.push_str(chunk),
            Node::Element(inner) if inner.name() == "br" => text.push(' '),
            _ => {}
        }
    }
    text
}

fn escape_text(word: &str) -> String {
    word.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
