//! Observer hook for ingestion outcomes.
//!
//! [`super::ingest_upload`] reports every cycle to the observer configured in
//! [`super::PreviewOptions`]: a table, a non-tabular result, or a failure with its severity.

use std::fmt;
use std::sync::Arc;

use crate::error::PreviewError;

use super::unified::FileFormat;

/// How bad a failed cycle is. Ordered, so it can be compared with an alert threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IngestionSeverity {
    Info,
    Warning,
    /// The upload could not be previewed.
    Error,
    /// The host itself is in trouble (temp dir unusable, I/O failure).
    Critical,
}

/// The upload a callback refers to.
#[derive(Debug, Clone)]
pub struct IngestionContext {
    pub file_name: String,
    pub size_bytes: u64,
    pub format: FileFormat,
}

/// Shape of the table a handler produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestionStats {
    pub rows: usize,
    pub columns: usize,
}

/// Successful cycles that produced no table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonTabular {
    /// A `.txt` upload shown as raw text.
    RawText,
    /// A database upload with no tables.
    NoTables,
}

/// Receives ingestion outcomes. Every method defaults to doing nothing.
pub trait IngestionObserver: Send + Sync {
    fn on_success(&self, _ctx: &IngestionContext, _stats: IngestionStats) {}

    fn on_non_tabular(&self, _ctx: &IngestionContext, _kind: NonTabular) {}

    fn on_failure(&self, _ctx: &IngestionContext, _severity: IngestionSeverity, _error: &PreviewError) {}

    /// Fired after `on_failure` when the severity reaches
    /// [`super::PreviewOptions::alert_at_or_above`]. Defaults to `on_failure`.
    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &PreviewError) {
        self.on_failure(ctx, severity, error)
    }
}

/// Forwards each callback to every inner observer, in order.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn IngestionObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Arc<dyn IngestionObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl IngestionObserver for CompositeObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        self.observers.iter().for_each(|o| o.on_success(ctx, stats));
    }

    fn on_non_tabular(&self, ctx: &IngestionContext, kind: NonTabular) {
        self.observers.iter().for_each(|o| o.on_non_tabular(ctx, kind));
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &PreviewError) {
        self.observers
            .iter()
            .for_each(|o| o.on_failure(ctx, severity, error));
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &PreviewError) {
        self.observers
            .iter()
            .for_each(|o| o.on_alert(ctx, severity, error));
    }
}

/// Emits one `tracing` event per callback: `info` for results, `warn` for failures, `error` for
/// alerts.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl IngestionObserver for TracingObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        tracing::info!(
            file = %ctx.file_name,
            format = %ctx.format,
            size_bytes = ctx.size_bytes,
            rows = stats.rows,
            columns = stats.columns,
            "upload ingested"
        );
    }

    fn on_non_tabular(&self, ctx: &IngestionContext, kind: NonTabular) {
        tracing::info!(file = %ctx.file_name, format = %ctx.format, ?kind, "upload has no table");
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &PreviewError) {
        tracing::warn!(
            file = %ctx.file_name,
            format = %ctx.format,
            ?severity,
            error = %error,
            "upload ingestion failed"
        );
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &PreviewError) {
        tracing::error!(
            file = %ctx.file_name,
            format = %ctx.format,
            ?severity,
            error = %error,
            "upload ingestion alert"
        );
    }
}
