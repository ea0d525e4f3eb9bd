//! Deterministic scripted implementation of the gallery host.

use std::collections::HashSet;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use claimdex_common::{absolutize, AdvanceStrategy, CommentRecord, GalleryHost, ItemId};

use crate::script::{AlbumScript, ScriptedItem};

/// Knobs controlling how the scripted gallery misbehaves.
#[derive(Debug, Clone)]
pub struct SimBehavior {
    /// Gallery items revealed per scroll request. 0 = everything is
    /// rendered up front.
    pub items_per_scroll: usize,
    /// Synthesize a brand-new item on every scroll — the gallery never
    /// stops growing.
    pub endless_growth: bool,
    /// Scroll requests needed before a reveal step takes effect. Values
    /// above 1 model a gallery that grows slower than the scan polls.
    pub scrolls_per_step: usize,
    /// Comment-region presence polls swallowed before the region reports
    /// itself present.
    pub comments_ready_after_polls: u32,
    /// Item indices whose comment list never appears.
    pub comment_list_missing_for: HashSet<usize>,
    /// Advance strategies the page variant supports.
    pub advance_supported: HashSet<AdvanceStrategy>,
    /// After this many successful view moves, advance still dispatches but
    /// the view stops moving.
    pub advance_stall_after: Option<usize>,
    /// Whether the view shows a position counter.
    pub position_counter_enabled: bool,
    /// Pretend the gallery region is absent entirely.
    pub gallery_missing: bool,
}

impl Default for SimBehavior {
    fn default() -> Self {
        Self {
            items_per_scroll: 0,
            endless_growth: false,
            scrolls_per_step: 1,
            comments_ready_after_polls: 0,
            comment_list_missing_for: HashSet::new(),
            advance_supported: AdvanceStrategy::PRIORITY.into_iter().collect(),
            advance_stall_after: None,
            position_counter_enabled: true,
            gallery_missing: false,
        }
    }
}

#[derive(Debug, Default)]
struct SimState {
    /// Gallery items currently rendered.
    revealed: usize,
    /// Extra items synthesized under `endless_growth`.
    synthesized: Vec<ScriptedItem>,
    /// Index of the item whose detail view is open.
    open: Option<usize>,
    /// Comment-region presence polls since the view opened.
    ready_polls: u32,
    /// Comment records currently revealed in the open view.
    comments_shown: usize,
    /// Successful view moves so far.
    advances: usize,
    /// Scroll requests seen so far.
    scrolls: usize,
}

/// Scripted gallery host. Interior mutability only; every method takes
/// `&self` like the trait requires, and behavior advances per call.
pub struct SimGallery {
    script: AlbumScript,
    behavior: SimBehavior,
    state: Mutex<SimState>,
}

impl SimGallery {
    pub fn new(script: AlbumScript) -> Self {
        Self::with_behavior(script, SimBehavior::default())
    }

    pub fn with_behavior(script: AlbumScript, behavior: SimBehavior) -> Self {
        let initial = if behavior.items_per_scroll == 0 {
            script.items.len()
        } else {
            behavior.items_per_scroll.min(script.items.len())
        };
        Self {
            script,
            behavior,
            state: Mutex::new(SimState {
                revealed: initial,
                ..SimState::default()
            }),
        }
    }

    fn item_at<'a>(&'a self, state: &'a SimState, index: usize) -> Option<&'a ScriptedItem> {
        if index < self.script.items.len() {
            self.script.items.get(index)
        } else {
            state.synthesized.get(index - self.script.items.len())
        }
    }

    fn total_items(&self, state: &SimState) -> usize {
        self.script.items.len() + state.synthesized.len()
    }

    fn item_url(&self, item: &ScriptedItem) -> Option<String> {
        absolutize(&self.script.origin, &item.href)
    }

    fn initial_comments(&self, item: &ScriptedItem) -> usize {
        if item.comment_batch == 0 {
            item.comments.len()
        } else {
            item.comment_batch.min(item.comments.len())
        }
    }

    fn present_view(&self, state: &mut SimState, index: usize) {
        state.open = Some(index);
        state.ready_polls = 0;
        let shown = self
            .item_at(state, index)
            .map(|item| self.initial_comments(item))
            .unwrap_or(0);
        state.comments_shown = shown;
    }
}

#[async_trait]
impl GalleryHost for SimGallery {
    async fn gallery_present(&self) -> bool {
        !self.behavior.gallery_missing
    }

    async fn visible_item_refs(&self) -> Result<Vec<String>> {
        let state = self.state.lock().unwrap();
        let mut refs: Vec<String> = self
            .script
            .items
            .iter()
            .chain(state.synthesized.iter())
            .take(state.revealed)
            .map(|item| item.href.clone())
            .collect();
        // The grid renders some thumbnails twice (cover + tile); the
        // traversal is expected to dedup.
        if let Some(first) = refs.first().cloned() {
            refs.push(first);
        }
        Ok(refs)
    }

    async fn request_more_gallery(&self) {
        let mut state = self.state.lock().unwrap();
        state.scrolls += 1;
        if self.behavior.scrolls_per_step > 1 && state.scrolls % self.behavior.scrolls_per_step != 0
        {
            return;
        }
        if self.behavior.endless_growth {
            let next = self.total_items(&state);
            state
                .synthesized
                .push(ScriptedItem::new(&format!("/photo-sim_{next}")));
        }
        let total = self.total_items(&state);
        state.revealed = if self.behavior.items_per_scroll == 0 {
            total
        } else {
            (state.revealed + self.behavior.items_per_scroll).min(total)
        };
    }

    async fn open_item(&self, item: &ItemId) {
        let mut state = self.state.lock().unwrap();
        let total = self.total_items(&state);
        let found = (0..total).find(|&i| {
            self.item_at(&state, i)
                .and_then(|scripted| self.item_url(scripted))
                .as_deref()
                == Some(item.as_str())
        });
        match found {
            Some(index) => self.present_view(&mut state, index),
            None => debug!(item = %item, "Open requested for unknown item, ignoring"),
        }
    }

    async fn detail_view_present(&self) -> bool {
        self.state.lock().unwrap().open.is_some()
    }

    async fn comment_list_present(&self) -> bool {
        let mut state = self.state.lock().unwrap();
        let Some(index) = state.open else {
            return false;
        };
        if self.behavior.comment_list_missing_for.contains(&index) {
            return false;
        }
        state.ready_polls += 1;
        state.ready_polls > self.behavior.comments_ready_after_polls
    }

    async fn request_more_comments(&self) {
        let mut state = self.state.lock().unwrap();
        let Some(index) = state.open else {
            return;
        };
        let Some(item) = self.item_at(&state, index) else {
            return;
        };
        let total = item.comments.len();
        let step = if item.comment_batch == 0 {
            total
        } else {
            item.comment_batch
        };
        state.comments_shown = (state.comments_shown + step).min(total);
    }

    async fn comment_records(&self) -> Result<Vec<CommentRecord>> {
        let state = self.state.lock().unwrap();
        let Some(index) = state.open else {
            return Ok(Vec::new());
        };
        let Some(item) = self.item_at(&state, index) else {
            return Ok(Vec::new());
        };
        Ok(item
            .comments
            .iter()
            .take(state.comments_shown)
            .map(|comment| CommentRecord {
                text: comment.text.clone(),
                author_id: comment.author_id.clone(),
                author_href: comment.author_href.clone(),
            })
            .collect())
    }

    async fn current_item_signal(&self) -> Option<String> {
        let state = self.state.lock().unwrap();
        let index = state.open?;
        self.item_at(&state, index)
            .and_then(|item| self.item_url(item))
    }

    async fn position_counter(&self) -> Option<(u32, u32)> {
        if !self.behavior.position_counter_enabled {
            return None;
        }
        let state = self.state.lock().unwrap();
        let index = state.open?;
        Some((index as u32 + 1, self.total_items(&state) as u32))
    }

    async fn dispatch_advance(&self, strategy: AdvanceStrategy) -> bool {
        if !self.behavior.advance_supported.contains(&strategy) {
            return false;
        }
        let mut state = self.state.lock().unwrap();
        let Some(index) = state.open else {
            return false;
        };
        let stalled = self
            .behavior
            .advance_stall_after
            .is_some_and(|limit| state.advances >= limit);
        if !stalled && index + 1 < self.total_items(&state) {
            self.present_view(&mut state, index + 1);
            state.advances += 1;
        }
        // The interaction itself dispatched either way.
        true
    }

    async fn close_detail_view(&self) {
        let mut state = self.state.lock().unwrap();
        state.open = None;
        state.ready_polls = 0;
        state.comments_shown = 0;
    }
}
