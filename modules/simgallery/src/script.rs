//! Scenario scripts: the content a simulated gallery serves.
//!
//! Plain serde data so scenarios can live in JSON files as well as in test
//! code.

use serde::{Deserialize, Serialize};

/// One scripted comment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScriptedComment {
    pub text: String,
    /// Direct author identity attribute, when the page variant exposes one.
    #[serde(default)]
    pub author_id: Option<String>,
    /// Author profile hyperlink.
    #[serde(default)]
    pub author_href: Option<String>,
}

impl ScriptedComment {
    /// Comment attributed through a profile hyperlink.
    pub fn by_href(text: &str, href: &str) -> Self {
        Self {
            text: text.to_string(),
            author_id: None,
            author_href: Some(href.to_string()),
        }
    }

    /// Comment attributed through a direct identity attribute.
    pub fn by_id(text: &str, id: &str) -> Self {
        Self {
            text: text.to_string(),
            author_id: Some(id.to_string()),
            author_href: None,
        }
    }

    /// Comment with no author attribution at all.
    pub fn anonymous(text: &str) -> Self {
        Self {
            text: text.to_string(),
            author_id: None,
            author_href: None,
        }
    }
}

/// One scripted gallery item with its comment thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptedItem {
    /// Reference as rendered in the gallery grid (usually rooted, e.g.
    /// "/photo-1_1").
    pub href: String,
    #[serde(default)]
    pub comments: Vec<ScriptedComment>,
    /// Comments revealed per pagination request. 0 = the whole thread is
    /// present as soon as the view opens.
    #[serde(default)]
    pub comment_batch: usize,
}

impl ScriptedItem {
    pub fn new(href: &str) -> Self {
        Self {
            href: href.to_string(),
            comments: Vec::new(),
            comment_batch: 0,
        }
    }

    pub fn comment(mut self, comment: ScriptedComment) -> Self {
        self.comments.push(comment);
        self
    }

    pub fn batched(mut self, batch: usize) -> Self {
        self.comment_batch = batch;
        self
    }
}

/// A whole scripted album.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumScript {
    pub origin: String,
    #[serde(default)]
    pub items: Vec<ScriptedItem>,
}

impl AlbumScript {
    pub fn new(origin: &str) -> Self {
        Self {
            origin: origin.to_string(),
            items: Vec::new(),
        }
    }

    pub fn item(mut self, item: ScriptedItem) -> Self {
        self.items.push(item);
        self
    }
}
