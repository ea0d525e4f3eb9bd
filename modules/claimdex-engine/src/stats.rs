//! End-of-run summary.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// Every discovered item was visited.
    Completed,
    /// The user raised the stop signal.
    Stopped,
    /// The traversal could not advance any further; partial results stand.
    Stalled,
    /// The gallery produced no items at all.
    NothingFound,
}

impl std::fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RunOutcome::Completed => "completed",
            RunOutcome::Stopped => "stopped",
            RunOutcome::Stalled => "stalled",
            RunOutcome::NothingFound => "nothing found",
        };
        f.write_str(s)
    }
}

/// Counters accumulated over one scan run.
#[derive(Debug, Clone, Serialize)]
pub struct ScanStats {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcome: RunOutcome,
    pub items_discovered: usize,
    pub items_visited: usize,
    pub items_skipped: usize,
    pub comments_scanned: usize,
    pub comments_matched: usize,
    pub new_associations: usize,
    pub claimants: usize,
}

impl ScanStats {
    pub fn new(run_id: String) -> Self {
        let now = Utc::now();
        Self {
            run_id,
            started_at: now,
            finished_at: now,
            outcome: RunOutcome::Completed,
            items_discovered: 0,
            items_visited: 0,
            items_skipped: 0,
            comments_scanned: 0,
            comments_matched: 0,
            new_associations: 0,
            claimants: 0,
        }
    }

    pub fn finish(&mut self, outcome: RunOutcome) {
        self.outcome = outcome;
        self.finished_at = Utc::now();
    }
}

impl std::fmt::Display for ScanStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\n=== Scan Complete ===")?;
        writeln!(f, "Outcome:            {}", self.outcome)?;
        writeln!(f, "Items discovered:   {}", self.items_discovered)?;
        writeln!(f, "Items visited:      {}", self.items_visited)?;
        writeln!(f, "Items skipped:      {}", self.items_skipped)?;
        writeln!(f, "Comments scanned:   {}", self.comments_scanned)?;
        writeln!(f, "Comments matched:   {}", self.comments_matched)?;
        writeln!(f, "New associations:   {}", self.new_associations)?;
        writeln!(f, "Claimants:          {}", self.claimants)?;
        let elapsed = self.finished_at - self.started_at;
        writeln!(f, "Elapsed:            {}s", elapsed.num_seconds())?;
        Ok(())
    }
}
