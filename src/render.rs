//! Plain-text rendering of a [`RenderModel`] for terminals.

use std::fmt::Write as _;

use crate::preview::{Outcome, RenderModel, TablePreview};
use crate::processing::Summary;
use crate::types::DataSet;

/// Render `model` as the sequence of panels a browser host would draw.
pub fn render_text(model: &RenderModel) -> String {
    let mut out = String::new();

    if let Some(details) = &model.details {
        section(&mut out, "File Details");
        let _ = writeln!(out, "Filename: {}", details.name);
        let _ = writeln!(out, "File size: {:.2} KB", details.size_kb);
        let _ = writeln!(
            out,
            "File type: {}",
            details.declared_type.as_deref().unwrap_or("unknown")
        );
    }

    match &model.outcome {
        Outcome::Idle { prompt, formats } => {
            let _ = writeln!(out, "{prompt}");
            section(&mut out, "Supported File Formats");
            for f in formats {
                let _ = writeln!(out, "- {} ({}): {}", f.format, f.extensions.join(", "), f.description);
            }
        }
        Outcome::Table(table) => render_table_preview(&mut out, table),
        Outcome::RawText { content, warning } => {
            let _ = writeln!(out, "\nWarning: {warning}");
            section(&mut out, "Raw content");
            out.push_str(content);
            if !content.ends_with('\n') {
                out.push('\n');
            }
        }
        Outcome::NoTables { notice } => {
            let _ = writeln!(out, "\nWarning: {notice}");
        }
        Outcome::Failed(report) => {
            let _ = writeln!(out, "\n{}", report.message);
            let _ = writeln!(out, "{}", report.hint);
        }
    }

    out
}

fn render_table_preview(out: &mut String, table: &TablePreview) {
    let _ = writeln!(out, "\n{}", table.success);
    if !table.tables.is_empty() {
        let _ = writeln!(out, "Tables: {}", table.tables.join(", "));
    }
    if let Some(selected) = &table.selected_table {
        let _ = writeln!(out, "Showing table: {selected}");
    }

    section(out, "Data Preview");
    if table.preview.row_count() < table.summary.rows {
        let _ = writeln!(
            out,
            "(first {} of {} rows)",
            table.preview.row_count(),
            table.summary.rows
        );
    }
    out.push_str(&grid(&dataset_rows(&table.preview)));

    render_summary(out, &table.summary);

    section(out, "Download");
    let _ = writeln!(
        out,
        "{} ({}, {} bytes)",
        table.export.file_name,
        table.export.mime,
        table.export.bytes.len()
    );
}

fn render_summary(out: &mut String, summary: &Summary) {
    section(out, "Data Summary");
    let _ = writeln!(out, "Rows: {}", summary.rows);
    let _ = writeln!(out, "Columns: {}", summary.columns);
    let _ = writeln!(out, "Memory Usage: {:.2} KB", summary.memory_kb);

    section(out, "Column Information");
    let mut rows = vec![vec![
        "Column".to_string(),
        "Type".to_string(),
        "Non-Null Count".to_string(),
        "Null Count".to_string(),
    ]];
    rows.extend(summary.column_info.iter().map(|c| {
        vec![
            c.name.clone(),
            c.data_type.to_string(),
            c.non_null.to_string(),
            c.null.to_string(),
        ]
    }));
    out.push_str(&grid(&rows));

    if let Some(stats) = &summary.stats {
        section(out, "Statistical Summary");
        let mut header = vec![String::new()];
        header.extend(stats.columns.iter().map(|c| c.column.clone()));
        let mut rows = vec![header];
        for (i, label) in crate::processing::DescriptiveStats::STATISTICS.iter().enumerate() {
            let mut row = vec![label.to_string()];
            row.extend(stats.columns.iter().map(|c| format_stat(c.values()[i])));
            rows.push(row);
        }
        out.push_str(&grid(&rows));
    }
}

fn format_stat(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else {
        format!("{v:.6}")
    }
}

fn dataset_rows(ds: &DataSet) -> Vec<Vec<String>> {
    let mut rows = vec![ds.schema.field_names().map(str::to_string).collect::<Vec<_>>()];
    rows.extend(
        ds.rows
            .iter()
            .map(|row| row.iter().map(|v| v.to_string()).collect::<Vec<_>>()),
    );
    rows
}

/// Left-aligned columns separated by two spaces. The first row is the header.
fn grid(rows: &[Vec<String>]) -> String {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|c| {
            rows.iter()
                .filter_map(|r| r.get(c))
                .map(|s| s.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    for (i, row) in rows.iter().enumerate() {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{cell:<w$}"))
            .collect();
        let _ = writeln!(out, "{}", line.join("  ").trim_end());
        if i == 0 {
            let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
            let _ = writeln!(out, "{}", rule.join("  "));
        }
    }
    out
}

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n## {title}");
}
