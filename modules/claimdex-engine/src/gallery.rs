//! Lazy-load traversal of the gallery grid.

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use claimdex_common::{absolutize, GalleryHost, ItemId, ScanConfig};

use crate::progress::{ProgressEvent, ProgressSink};
use crate::stop::StopSignal;

/// Scrolls the gallery until it stops yielding new items, collecting item
/// identities in first-seen order.
pub struct GalleryLoader {
    host: Arc<dyn GalleryHost>,
    config: ScanConfig,
    stop: StopSignal,
}

impl GalleryLoader {
    pub fn new(host: Arc<dyn GalleryHost>, config: ScanConfig, stop: StopSignal) -> Self {
        Self { host, config, stop }
    }

    /// Repeatedly scan, request more content and wait, until no new items
    /// appeared for `gallery_max_idle_rounds` consecutive scans or the stop
    /// signal is raised. Returns whatever was collected so far; an empty
    /// result is a legitimate terminal outcome, not an error.
    pub async fn collect(&self, sink: &dyn ProgressSink) -> Result<Vec<ItemId>> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut items: Vec<ItemId> = Vec::new();
        let mut idle_rounds = 0u32;

        while idle_rounds < self.config.gallery_max_idle_rounds && !self.stop.is_raised() {
            let mut grew = false;
            for href in self.host.visible_item_refs().await? {
                let Some(url) = absolutize(&self.config.origin, &href) else {
                    continue;
                };
                if seen.insert(url.clone()) {
                    items.push(ItemId(url));
                    grew = true;
                }
            }

            if grew {
                idle_rounds = 0;
                debug!(count = items.len(), "Gallery grew");
            } else {
                idle_rounds += 1;
                debug!(
                    idle = idle_rounds,
                    max = self.config.gallery_max_idle_rounds,
                    count = items.len(),
                    "Waiting for lazy gallery content"
                );
            }
            sink.emit(ProgressEvent::GalleryLoading { count: items.len() });

            self.host.request_more_gallery().await;
            if !self.stop.sleep(self.config.gallery_step_delay).await {
                break;
            }
        }

        Ok(items)
    }
}
