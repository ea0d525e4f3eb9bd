//! Claimant → items aggregation.

use std::collections::{BTreeSet, HashMap};

use claimdex_common::{ClaimRow, ClaimantId, ItemId};

/// Deduplicated mapping from claimant to the set of items they claimed.
///
/// The only state that survives across items during a run. Append-only
/// while a run is active; wiped on the next start or an explicit clear.
#[derive(Debug, Default)]
pub struct ClaimIndex {
    by_claimant: HashMap<ClaimantId, BTreeSet<ItemId>>,
}

impl ClaimIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one association. Returns `true` when it was not already
    /// present.
    pub fn add(&mut self, claimant: ClaimantId, item: ItemId) -> bool {
        self.by_claimant.entry(claimant).or_default().insert(item)
    }

    /// Number of distinct claimants.
    pub fn claimants(&self) -> usize {
        self.by_claimant.len()
    }

    /// Total number of (claimant, item) associations.
    pub fn associations(&self) -> usize {
        self.by_claimant.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_claimant.is_empty()
    }

    pub fn clear(&mut self) {
        self.by_claimant.clear();
    }

    /// Presentation/export rows: claimants with the most items first, ties
    /// broken by ascending claimant identity; each row's item list sorted
    /// ascending. Deterministic for a given association set regardless of
    /// insertion order.
    pub fn rows(&self) -> Vec<ClaimRow> {
        let mut rows: Vec<ClaimRow> = self
            .by_claimant
            .iter()
            .map(|(claimant, items)| ClaimRow {
                claimant: claimant.clone(),
                items: items.iter().cloned().collect(),
            })
            .collect();
        rows.sort_by(|a, b| {
            b.items
                .len()
                .cmp(&a.items.len())
                .then_with(|| a.claimant.cmp(&b.claimant))
        });
        rows
    }
}
