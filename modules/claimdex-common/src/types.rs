//! Shared read models for the claim-scanning pipeline.

use serde::{Deserialize, Serialize};

/// Identity of one gallery item, as a canonical absolute URL.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of a comment author, as a canonical absolute URL.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimantId(pub String);

impl ClaimantId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ClaimantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One comment as read from the open detail view.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentRecord {
    pub text: String,
    /// Direct author identity attribute, when the host exposes one.
    pub author_id: Option<String>,
    /// Author profile hyperlink, used when no direct identity is present.
    pub author_href: Option<String>,
}

/// One presentation/export row: a claimant and the items they claimed,
/// items sorted ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClaimRow {
    pub claimant: ClaimantId,
    pub items: Vec<ItemId>,
}

/// Lifecycle state of a scan run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Idle,
    Loading,
    Working,
    Stopped,
    Done,
    Error,
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RunState::Idle => "idle",
            RunState::Loading => "loading",
            RunState::Working => "working",
            RunState::Stopped => "stopped",
            RunState::Done => "done",
            RunState::Error => "error",
        };
        f.write_str(s)
    }
}

/// Transient position of the traversal inside the detail view. Only used to
/// detect that an advance actually happened; discarded at run end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewCursor {
    /// Item-identity signal of the open view, when the host exposes one.
    pub signal: Option<String>,
    /// Current position from the view's counter, when shown.
    pub position: Option<u32>,
}
