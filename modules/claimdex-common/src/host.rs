//! Host-access seam for the gallery surface.
//!
//! The engine never touches the host page directly — every read and every
//! interaction goes through `GalleryHost`, so a scripted gallery can stand
//! in for the real surface in tests.

use anyhow::Result;
use async_trait::async_trait;

use crate::types::{CommentRecord, ItemId};

/// One way of asking the host to move the detail view to the next item.
///
/// The host's navigation control is implemented inconsistently across page
/// variants, so callers probe strategies in `PRIORITY` order and take the
/// first one the host manages to dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdvanceStrategy {
    /// The detail view's own next control.
    NextControl,
    /// Simulated right-arrow key press.
    ArrowKey,
    /// Click on the forward navigation overlay zone.
    OverlayClick,
}

impl AdvanceStrategy {
    /// Probe order: most direct affordance first.
    pub const PRIORITY: [AdvanceStrategy; 3] = [
        AdvanceStrategy::NextControl,
        AdvanceStrategy::ArrowKey,
        AdvanceStrategy::OverlayClick,
    ];
}

impl std::fmt::Display for AdvanceStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AdvanceStrategy::NextControl => "next_control",
            AdvanceStrategy::ArrowKey => "arrow_key",
            AdvanceStrategy::OverlayClick => "overlay_click",
        };
        f.write_str(s)
    }
}

/// Read and interaction primitives of the gallery page.
///
/// All reads reflect the host's current state and may change between calls
/// as lazy content arrives. Interactions are fire-and-forget: they dispatch
/// a request and the effect (if any) shows up in later reads.
#[async_trait]
pub trait GalleryHost: Send + Sync {
    /// Whether the gallery region exists on the page at all.
    async fn gallery_present(&self) -> bool;

    /// Item references currently rendered, in document order. May contain
    /// duplicates; callers dedup by resolved identity. An `Err` means the
    /// page could not be read at all, not an empty gallery.
    async fn visible_item_refs(&self) -> Result<Vec<String>>;

    /// Ask the host to reveal more gallery content (scroll-to-bottom
    /// equivalent).
    async fn request_more_gallery(&self);

    /// Fire the interaction that opens an item's detail view.
    async fn open_item(&self, item: &ItemId);

    /// Whether a detail-view container is currently present.
    async fn detail_view_present(&self) -> bool;

    /// Whether the comment-list container is present inside the detail view.
    async fn comment_list_present(&self) -> bool;

    /// Ask the host to reveal more of the comment region.
    async fn request_more_comments(&self);

    /// Comment records currently present in the open detail view.
    async fn comment_records(&self) -> Result<Vec<CommentRecord>>;

    /// Item-identity signal of the open detail view, when observable.
    async fn current_item_signal(&self) -> Option<String>;

    /// `(current, total)` position counter of the detail view, when shown.
    /// `current` is 1-based.
    async fn position_counter(&self) -> Option<(u32, u32)>;

    /// Attempt one advance strategy. `true` means the interaction was
    /// dispatched, not that navigation succeeded.
    async fn dispatch_advance(&self, strategy: AdvanceStrategy) -> bool;

    /// Best-effort close of the detail view.
    async fn close_detail_view(&self);
}
