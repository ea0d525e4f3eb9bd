//! Progress events delivered to the presentation layer.

use serde::Serialize;
use tracing::{error, info, warn};

use claimdex_common::RunState;

/// Discrete progress event emitted during a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// Gallery loading pass: items discovered so far.
    GalleryLoading { count: usize },
    /// One item finished or was skipped. `index` is 1-based;
    /// `new_matches` counts the new associations the item contributed.
    ItemProgress {
        index: usize,
        total: usize,
        new_matches: usize,
    },
    /// The run state machine moved.
    StateChanged { state: RunState },
    /// The gallery finished loading with no items at all.
    NothingFound,
    /// Non-fatal condition worth surfacing (start while busy, skipped
    /// item, controlled early end).
    Warning { message: String },
    /// Fatal failure; the run is over, partial results are preserved.
    Error { message: String },
}

/// Consumer of progress events. Called synchronously from the run task, so
/// implementations should hand off quickly.
pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: ProgressEvent);
}

/// Drops every event.
pub struct NullSink;

impl ProgressSink for NullSink {
    fn emit(&self, _event: ProgressEvent) {}
}

/// Forwards events to `tracing`.
pub struct TracingSink;

impl ProgressSink for TracingSink {
    fn emit(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::GalleryLoading { count } => info!(count, "Gallery loading"),
            ProgressEvent::ItemProgress {
                index,
                total,
                new_matches,
            } => info!(index, total, new_matches, "Item processed"),
            ProgressEvent::StateChanged { state } => info!(%state, "State changed"),
            ProgressEvent::NothingFound => warn!("No gallery items found"),
            ProgressEvent::Warning { message } => warn!(%message, "Scan warning"),
            ProgressEvent::Error { message } => error!(%message, "Scan failed"),
        }
    }
}
