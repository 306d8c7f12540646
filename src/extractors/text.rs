// src/extractors/text.rs
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Selector};

use crate::extractors::record::{Diagnostics, Record, Value};
use crate::utils::error::FieldError;

// Rust's \s does not cover the zero-width space the report pages are littered with.
static WHITESPACE_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s\u{200B}]+").expect("Failed to compile WHITESPACE_RUN_RE"));

static EMPHASIS_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("b").expect("Failed to compile EMPHASIS_SELECTOR"));

/// Collapses every run of whitespace (zero-width space included) into one space.
/// With `strip`, no leading or trailing space is left.
pub fn clean_text(raw: &str, strip: bool) -> String {
    let collapsed = WHITESPACE_RUN_RE.replace_all(raw, " ");
    if strip {
        collapsed.trim().to_string()
    } else {
        collapsed.into_owned()
    }
}

/// Concatenated text of a node, cleaned.
pub fn node_text(element: ElementRef<'_>) -> String {
    clean_text(&element.text().collect::<String>(), true)
}

/// `<b>` descendants in document order.
pub fn emphasized(element: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    element.select(&EMPHASIS_SELECTOR).collect()
}

pub fn has_emphasis(element: ElementRef<'_>) -> bool {
    element.select(&EMPHASIS_SELECTOR).next().is_some()
}

/// Direct `td`/`th` children of a row.
pub fn cells(row: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|child| matches!(child.value().name(), "td" | "th"))
        .collect()
}

/// Next sibling that is an element, skipping text and comments.
pub fn next_element(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element.next_siblings().find_map(ElementRef::wrap)
}

/// Sets `record[field] = value` when both are non-empty after cleaning.
/// Returns whether the record was written.
pub fn assign(record: &mut Record, field: &str, raw: &str) -> bool {
    let field = clean_text(field, true);
    let value = clean_text(raw, true);
    if field.is_empty() || value.is_empty() {
        return false;
    }
    record.set(field, Value::Text(value));
    true
}

/// Runs a fallible (field, value) derivation and assigns the result.
/// A failed derivation is reported and leaves the record untouched.
pub fn assign_or_report<F>(record: &mut Record, diagnostics: &mut Diagnostics, scope: &str, derive: F) -> bool
where
    F: FnOnce() -> Result<(String, String), FieldError>,
{
    match derive() {
        Ok((field, value)) => assign(record, &field, &value),
        Err(error) => {
            diagnostics.report(scope, error);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn test_collapses_mixed_whitespace() {
        assert_eq!(clean_text(" A\u{200B}  B\n C ", true), "A B C");
        assert_eq!(clean_text("\tA\u{00A0}\u{00A0}B", false), " A B");
    }

    #[test]
    fn test_cleaning_is_idempotent() {
        for raw in ["A B C", " x\t\ty ", "\u{200B}lead", "", "   "] {
            let once = clean_text(raw, true);
            assert_eq!(clean_text(&once, true), once);
            let once = clean_text(raw, false);
            assert_eq!(clean_text(&once, false), once);
        }
    }

    #[test]
    fn test_assign_skips_empty_fields_and_values() {
        let mut record = Record::new();
        let cases = [("", "value"), ("field", ""), ("  \u{200B} ", "value"), ("field", " \n\t ")];
        for (field, value) in cases {
            assert!(!assign(&mut record, field, value));
        }
        assert!(record.is_empty());

        assert!(assign(&mut record, " PIN # ", "  0001\n 234 "));
        assert_eq!(record.text("PIN #"), Some("0001 234"));
    }

    #[test]
    fn test_failed_derivation_becomes_diagnostic() {
        let mut record = Record::new();
        let mut diagnostics = Diagnostics::new();

        let wrote = assign_or_report(&mut record, &mut diagnostics, "account.row[3]", || {
            Err(FieldError::MissingRow(3))
        });

        assert!(!wrote);
        assert!(record.is_empty());
        assert_eq!(diagnostics.entries()[0].scope, "account.row[3]");
        assert_eq!(diagnostics.entries()[0].error, FieldError::MissingRow(3));
    }

    #[test]
    fn test_cells_are_direct_children_only() {
        let doc = Html::parse_document(
            "<table><tr><td>a</td><th>b</th><td><table><tr><td>nested</td></tr></table></td></tr></table>",
        );
        let row = doc.select(&Selector::parse("tr").unwrap()).next().unwrap();
        let found = cells(row);
        assert_eq!(found.len(), 3);
        assert_eq!(node_text(found[1]), "b");
        assert_eq!(node_text(next_element(found[0]).unwrap()), "b");
    }
}
