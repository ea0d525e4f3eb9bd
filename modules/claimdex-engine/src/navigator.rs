//! Driving the host's detail view: opening items, waiting for comment
//! threads, paginating them, and moving to the next item.

use std::sync::Arc;

use tokio::time::Instant;
use tracing::debug;

use claimdex_common::{AdvanceStrategy, GalleryHost, ItemId, ScanConfig, ViewCursor};

use crate::stop::StopSignal;

pub struct DetailNavigator {
    host: Arc<dyn GalleryHost>,
    config: ScanConfig,
    stop: StopSignal,
}

impl DetailNavigator {
    pub fn new(host: Arc<dyn GalleryHost>, config: ScanConfig, stop: StopSignal) -> Self {
        Self { host, config, stop }
    }

    /// Close any open view, settle, then fire the open interaction for
    /// `item`. The effect is observed by `await_comments_ready`.
    pub async fn open(&self, item: &ItemId) {
        self.host.close_detail_view().await;
        self.stop.sleep(self.config.open_settle).await;
        self.host.open_item(item).await;
    }

    /// Poll for the detail-view container, then for the comment region
    /// inside it. `true` once both appeared within the configured timeout;
    /// `false` means "skip this item", never a fatal condition.
    pub async fn await_comments_ready(&self) -> bool {
        let deadline = Instant::now() + self.config.comments_ready_timeout;
        let mut view_seen = false;
        loop {
            if self.stop.is_raised() {
                return false;
            }
            if !view_seen && self.host.detail_view_present().await {
                view_seen = true;
            }
            if view_seen && self.host.comment_list_present().await {
                // Give freshly attached records a moment to render.
                self.stop.sleep(self.config.comments_settle).await;
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            if !self.stop.sleep(self.config.comments_ready_poll).await {
                return false;
            }
        }
    }

    /// Page the comment region until the record count is unchanged for
    /// `comment_stable_rounds` consecutive rounds, up to
    /// `comment_load_rounds` requests.
    pub async fn load_all_comments(&self) {
        let mut last_count = 0usize;
        let mut stable_rounds = 0u32;

        for _ in 0..self.config.comment_load_rounds {
            if self.stop.is_raised() {
                return;
            }
            let count = match self.host.comment_records().await {
                Ok(records) => records.len(),
                // A read failure here is handled by the extraction step;
                // pagination just stops paging.
                Err(_) => return,
            };
            if count > last_count {
                last_count = count;
                stable_rounds = 0;
            } else {
                stable_rounds += 1;
            }
            if stable_rounds >= self.config.comment_stable_rounds {
                return;
            }
            self.host.request_more_comments().await;
            if !self.stop.sleep(self.config.comment_load_pause).await {
                return;
            }
        }
    }

    /// Current traversal cursor: the view's identity signal and counter
    /// position, whichever the host exposes.
    pub async fn cursor(&self) -> ViewCursor {
        ViewCursor {
            signal: self.host.current_item_signal().await,
            position: self
                .host
                .position_counter()
                .await
                .map(|(current, _total)| current),
        }
    }

    /// Whether the position counter reports the sequence exhausted. Absent
    /// counter means "unknown" and resolves to `false`.
    pub async fn at_end_of_sequence(&self) -> bool {
        matches!(
            self.host.position_counter().await,
            Some((current, total)) if current >= total
        )
    }

    /// Probe advance strategies in priority order. `true` as soon as any
    /// interaction is dispatched; `false` when the host offers none.
    pub async fn advance(&self) -> bool {
        for strategy in AdvanceStrategy::PRIORITY {
            if self.host.dispatch_advance(strategy).await {
                debug!(%strategy, "Advance dispatched");
                return true;
            }
        }
        false
    }

    /// Poll until the identity signal or the counter position moves away
    /// from `previous`. `None` on timeout: the traversal has stalled and
    /// the caller must end the run rather than silently skip ahead.
    pub async fn await_advance_confirmed(&self, previous: &ViewCursor) -> Option<ViewCursor> {
        let deadline = Instant::now() + self.config.advance_timeout;
        loop {
            if self.stop.is_raised() {
                return None;
            }
            let current = self.cursor().await;
            let signal_moved = current.signal.is_some() && current.signal != previous.signal;
            let position_moved =
                current.position.is_some() && current.position != previous.position;
            if signal_moved || position_moved {
                return Some(current);
            }
            if Instant::now() >= deadline {
                return None;
            }
            if !self.stop.sleep(self.config.advance_poll).await {
                return None;
            }
        }
    }

    /// Best-effort close of the detail view.
    pub async fn close(&self) {
        self.host.close_detail_view().await;
    }
}
