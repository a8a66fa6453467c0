//! Page content extraction.
//!
//! Reduces a fetched page to a [`PageExtract`]: the full document text with
//! collapsed whitespace, one [`Table`] per `<table>` element, and diagnostic
//! counts of frames and script blocks. A page that yields no content is a
//! valid (empty) extract, not an error; only a non-2xx response fails.

use chrono::Utc;
use ego_tree::NodeRef;
use reqwest::Method;
use scraper::{Html, Node, Selector};

use crate::app::{ClaimlensError, Result};
use crate::client::SessionClient;
use crate::domain::{PageExtract, Table};

#[derive(Debug, Clone, Copy, Default)]
pub struct PageExtractor;

impl PageExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Fetch `url` through the session client and extract its content.
    /// The caller is responsible for having authenticated first.
    pub async fn extract(&self, client: &dyn SessionClient, url: &str) -> Result<PageExtract> {
        let response = client.fetch(url, Method::GET, &[]).await?;

        if !response.is_success() {
            return Err(ClaimlensError::Fetch {
                url: url.to_string(),
                status: response.status,
            });
        }

        let extract = self.extract_from_html(url, &response.body);
        tracing::debug!(
            chars = extract.raw_text.len(),
            tables = extract.tables.len(),
            frames = extract.frame_count,
            scripts = extract.script_count,
            "page extracted"
        );
        Ok(extract)
    }

    /// Parse markup into a snapshot. Separated from the fetch so fixtures
    /// can be extracted directly.
    pub fn extract_from_html(&self, url: &str, html: &str) -> PageExtract {
        let document = Html::parse_document(html);

        PageExtract {
            url: url.to_string(),
            raw_text: document_text(&document),
            tables: extract_tables(&document),
            fetched_at: Utc::now(),
            frame_count: count_elements(&document, "iframe, frame"),
            script_count: count_elements(&document, "script"),
        }
    }
}

/// Full-document text with whitespace-collapsing separators. Script, style,
/// and noscript subtrees carry no visible content and are skipped.
fn document_text(document: &Html) -> String {
    let mut parts = Vec::new();
    collect_text(document.tree.root(), &mut parts);
    parts.join(" ")
}

fn collect_text(node: NodeRef<'_, Node>, parts: &mut Vec<String>) {
    if let Some(element) = node.value().as_element() {
        if matches!(element.name(), "script" | "style" | "noscript") {
            return;
        }
    }

    if let Some(text) = node.value().as_text() {
        let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if !collapsed.is_empty() {
            parts.push(collapsed);
        }
    }

    for child in node.children() {
        collect_text(child, parts);
    }
}

/// One Table per `<table>` element, rows from `<td>`/`<th>` cells in
/// document order. Rows without cells are dropped, and tables that end up
/// with no rows are dropped with them.
fn extract_tables(document: &Html) -> Vec<Table> {
    let table_selector = Selector::parse("table").expect("valid selector");
    let row_selector = Selector::parse("tr").expect("valid selector");
    let cell_selector = Selector::parse("td, th").expect("valid selector");

    let mut tables = Vec::new();
    for table in document.select(&table_selector) {
        let mut rows: Table = Vec::new();
        for row in table.select(&row_selector) {
            let cells: Vec<String> = row
                .select(&cell_selector)
                .map(|cell| {
                    cell.text()
                        .flat_map(str::split_whitespace)
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .collect();
            if !cells.is_empty() {
                rows.push(cells);
            }
        }
        if !rows.is_empty() {
            tables.push(rows);
        }
    }
    tables
}

fn count_elements(document: &Html, selector: &str) -> usize {
    let selector = Selector::parse(selector).expect("valid selector");
    document.select(&selector).count()
}
