//! Scanning the open detail view's comments for booking claims.

use tracing::debug;

use claimdex_common::{absolutize, ClaimantId, CommentRecord, ItemId, KeywordMatcher, ScanConfig};

use crate::index::ClaimIndex;

/// What one item's comment scan produced. `new_associations` feeds progress
/// reporting only; correctness lives in the index itself.
#[derive(Debug, Default, Clone, Copy)]
pub struct MineReport {
    pub scanned: usize,
    pub matched: usize,
    pub new_associations: usize,
}

/// Filters comment records to booking claims and folds them into the claim
/// index.
pub struct CommentMiner {
    matcher: KeywordMatcher,
    origin: String,
}

impl CommentMiner {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            matcher: KeywordMatcher::new(&config.keyword),
            origin: config.origin.clone(),
        }
    }

    /// Scan `records` for the current `item`. Records with empty text,
    /// non-matching text or an unresolvable author are skipped, never
    /// fatal.
    pub fn mine(&self, item: &ItemId, records: &[CommentRecord], index: &mut ClaimIndex) -> MineReport {
        let mut report = MineReport::default();
        for record in records {
            report.scanned += 1;
            if record.text.trim().is_empty() {
                continue;
            }
            if !self.matcher.matches(&record.text) {
                continue;
            }
            report.matched += 1;
            let Some(claimant) = self.resolve_author(record) else {
                debug!(item = %item, "Matching comment has no resolvable author, skipping");
                continue;
            };
            if index.add(claimant, item.clone()) {
                report.new_associations += 1;
            }
        }
        report
    }

    /// Prefer the host's direct identity attribute; fall back to the
    /// author's profile hyperlink.
    fn resolve_author(&self, record: &CommentRecord) -> Option<ClaimantId> {
        let reference = record
            .author_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .or(record.author_href.as_deref())?;
        absolutize(&self.origin, reference).map(ClaimantId)
    }
}
