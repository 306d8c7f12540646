// src/utils/html_debug.rs
use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::utils::error::FetchError;
use crate::wake::client::DocumentSource;
use crate::wake::models::TabRequest;

static ROW_OPEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<tr\b").expect("Failed to compile ROW_OPEN_RE"));

/// Tags every `<tr>` with its document-order index, the same index the tab
/// layouts use, so offsets can be checked against a live page.
pub fn annotate_rows(html: &str) -> String {
    let mut index = 0usize;
    let annotated = ROW_OPEN_RE.replace_all(html, |_: &regex::Captures| {
        let tag = format!("<tr data-row=\"{0}\" title=\"row {0}\"", index);
        index += 1;
        tag
    });

    let mut debug_html = String::from("<style>\n");
    debug_html.push_str("tr[data-row]:hover { outline: 2px solid #FFA500; }\n");
    debug_html.push_str("b { background-color: #90EE90; }\n");
    debug_html.push_str("</style>\n");
    debug_html.push_str(&annotated);
    debug_html
}

/// Saves the raw page and a row-annotated copy next to it.
pub fn save_debug_html(html: &str, dir: &Path, stem: &str) -> std::io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    fs::write(dir.join(format!("{}.html", stem)), html)?;

    let annotated_path = dir.join(format!("{}_rows.html", stem));
    fs::write(&annotated_path, annotate_rows(html))?;

    tracing::debug!("Saved debug HTML to {}", annotated_path.display());
    Ok(annotated_path)
}

/// Wraps a source and keeps a copy of every page it serves under
/// `<dir>/<id>/<page>.html`.
pub struct DebugSource<S> {
    inner: S,
    dir: PathBuf,
}

impl<S> DebugSource<S> {
    pub fn new(inner: S, dir: impl Into<PathBuf>) -> Self {
        Self { inner, dir: dir.into() }
    }
}

impl<S: DocumentSource> DocumentSource for DebugSource<S> {
    async fn fetch(&self, request: &TabRequest) -> Result<String, FetchError> {
        let html = self.inner.fetch(request).await?;

        let dir = self.dir.join(request.id.to_string());
        if let Err(e) = save_debug_html(&html, &dir, request.tab.page()) {
            tracing::warn!("Failed to save debug HTML for #{} {}: {}", request.id, request.tab, e);
        }

        Ok(html)
    }
}
