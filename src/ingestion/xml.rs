//! XML ingestion implementation.
//!
//! Rows are the element children of the document root. A row's columns are:
//!
//! - its attributes (`<row id="1">` gives column `id`)
//! - its child elements, by tag name, holding their trimmed text
//! - its own non-whitespace text, under the row's tag name
//!
//! Columns appear in first-seen order across rows; anything a row lacks is null. Cell values go
//! through the same text inference as CSV.

use roxmltree::{Document, Node, ParsingOptions};

use crate::error::{PreviewError, PreviewResult};
use crate::types::DataSet;

use super::infer::text_table;

/// Ingest XML bytes into an in-memory [`DataSet`].
pub fn ingest_xml_from_bytes(bytes: &[u8]) -> PreviewResult<DataSet> {
    let text = std::str::from_utf8(bytes)?;
    ingest_xml_from_str(text)
}

/// Ingest XML from an in-memory string into a [`DataSet`].
pub fn ingest_xml_from_str(input: &str) -> PreviewResult<DataSet> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(input.trim_start_matches('\u{feff}'), options)?;
    let root = doc.root_element();

    let row_nodes: Vec<Node> = root.children().filter(Node::is_element).collect();
    if row_nodes.is_empty() {
        return Err(PreviewError::UnsupportedShape {
            message: format!(
                "root element <{}> has no child elements to use as rows",
                root.tag_name().name()
            ),
        });
    }

    let mut headers: Vec<String> = Vec::new();
    let mut rows: Vec<Vec<(usize, Option<String>)>> = Vec::with_capacity(row_nodes.len());
    for node in &row_nodes {
        let mut cells = Vec::new();
        for (name, value) in row_cells(*node) {
            let idx = match headers.iter().position(|h| *h == name) {
                Some(idx) => idx,
                None => {
                    headers.push(name);
                    headers.len() - 1
                }
            };
            cells.push((idx, value));
        }
        rows.push(cells);
    }

    let width = headers.len();
    let rows = rows
        .into_iter()
        .map(|cells| {
            let mut row: Vec<Option<String>> = vec![None; width];
            for (idx, value) in cells {
                // A repeated child tag keeps its first occurrence.
                if row[idx].is_none() {
                    row[idx] = value;
                }
            }
            row
        })
        .collect();

    let ds = text_table(headers, rows);
    tracing::debug!(
        rows = ds.row_count(),
        columns = ds.column_count(),
        "parsed xml"
    );
    Ok(ds)
}

fn row_cells(node: Node<'_, '_>) -> Vec<(String, Option<String>)> {
    let mut cells: Vec<(String, Option<String>)> = node
        .attributes()
        .map(|a| (a.name().to_string(), Some(a.value().to_string())))
        .collect();

    if let Some(text) = own_text(node) {
        cells.push((node.tag_name().name().to_string(), Some(text)));
    }

    for child in node.children().filter(Node::is_element) {
        cells.push((child.tag_name().name().to_string(), own_text(child)));
    }
    cells
}

/// Direct text children of `node`, trimmed; `None` when only whitespace.
fn own_text(node: Node<'_, '_>) -> Option<String> {
    let text: String = node
        .children()
        .filter(Node::is_text)
        .filter_map(|n| n.text())
        .collect();
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
