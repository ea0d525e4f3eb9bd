//! Shared scaffolding for the scan scenario tests.

use std::sync::Arc;

use anyhow::{bail, Result};
use async_trait::async_trait;

use claimdex_common::{AdvanceStrategy, CommentRecord, GalleryHost, ItemId, ScanConfig};
use claimdex_engine::testing::RecordingSink;
use claimdex_engine::Scanner;
use simgallery::{AlbumScript, ScriptedComment, ScriptedItem, SimBehavior, SimGallery};

pub const ORIGIN: &str = "https://vk.com";

/// An album where claimant `/idN` left a booking comment on selected items.
pub fn album(items: &[(&str, &[ScriptedComment])]) -> AlbumScript {
    let mut script = AlbumScript::new(ORIGIN);
    for (href, comments) in items {
        let mut item = ScriptedItem::new(href);
        for comment in comments.iter() {
            item = item.comment(comment.clone());
        }
        script = script.item(item);
    }
    script
}

pub fn booking(href: &str) -> ScriptedComment {
    ScriptedComment::by_href("Бронь!", href)
}

pub fn chatter(text: &str) -> ScriptedComment {
    ScriptedComment::by_href(text, "/id999")
}

pub fn scanner_for(sim: SimGallery) -> (Arc<Scanner>, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::new());
    let scanner = Arc::new(Scanner::new(
        Arc::new(sim),
        ScanConfig::default(),
        sink.clone(),
    ));
    (scanner, sink)
}

pub fn scanner_with_behavior(
    script: AlbumScript,
    behavior: SimBehavior,
) -> (Arc<Scanner>, Arc<RecordingSink>) {
    scanner_for(SimGallery::with_behavior(script, behavior))
}

/// Host wrapper whose `comment_records` fails while a specific item's view
/// is open, to exercise the fatal path mid-run.
pub struct FailingCommentsHost {
    inner: SimGallery,
    fail_for_item: String,
}

impl FailingCommentsHost {
    pub fn new(inner: SimGallery, fail_for_item: &str) -> Self {
        Self {
            inner,
            fail_for_item: fail_for_item.to_string(),
        }
    }
}

#[async_trait]
impl GalleryHost for FailingCommentsHost {
    async fn gallery_present(&self) -> bool {
        self.inner.gallery_present().await
    }

    async fn visible_item_refs(&self) -> Result<Vec<String>> {
        self.inner.visible_item_refs().await
    }

    async fn request_more_gallery(&self) {
        self.inner.request_more_gallery().await
    }

    async fn open_item(&self, item: &ItemId) {
        self.inner.open_item(item).await
    }

    async fn detail_view_present(&self) -> bool {
        self.inner.detail_view_present().await
    }

    async fn comment_list_present(&self) -> bool {
        self.inner.comment_list_present().await
    }

    async fn request_more_comments(&self) {
        self.inner.request_more_comments().await
    }

    async fn comment_records(&self) -> Result<Vec<CommentRecord>> {
        if self.inner.current_item_signal().await.as_deref() == Some(&self.fail_for_item) {
            bail!("comment region read failed");
        }
        self.inner.comment_records().await
    }

    async fn current_item_signal(&self) -> Option<String> {
        self.inner.current_item_signal().await
    }

    async fn position_counter(&self) -> Option<(u32, u32)> {
        self.inner.position_counter().await
    }

    async fn dispatch_advance(&self, strategy: AdvanceStrategy) -> bool {
        self.inner.dispatch_advance(strategy).await
    }

    async fn close_detail_view(&self) {
        self.inner.close_detail_view().await
    }
}
