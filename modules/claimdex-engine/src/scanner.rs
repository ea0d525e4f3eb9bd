//! Run orchestration: the lifecycle state machine over gallery loader,
//! detail navigator and comment miner.
//!
//! Exactly one traversal runs at a time. The claim index is readable by
//! the presentation layer at any point, including mid-run; during a run it
//! only ever grows.

use std::sync::{Arc, Mutex, RwLock};

use tracing::{error, info, warn};
use uuid::Uuid;

use claimdex_common::{ClaimRow, ClaimdexError, GalleryHost, ItemId, RunState, ScanConfig};

use crate::export;
use crate::gallery::GalleryLoader;
use crate::index::ClaimIndex;
use crate::miner::CommentMiner;
use crate::navigator::DetailNavigator;
use crate::progress::{ProgressEvent, ProgressSink};
use crate::stats::{RunOutcome, ScanStats};
use crate::stop::StopSignal;

pub struct Scanner {
    host: Arc<dyn GalleryHost>,
    config: ScanConfig,
    sink: Arc<dyn ProgressSink>,
    state: Mutex<RunState>,
    index: RwLock<ClaimIndex>,
    stop: StopSignal,
}

impl Scanner {
    pub fn new(host: Arc<dyn GalleryHost>, config: ScanConfig, sink: Arc<dyn ProgressSink>) -> Self {
        Self {
            host,
            config,
            sink,
            state: Mutex::new(RunState::Idle),
            index: RwLock::new(ClaimIndex::new()),
            stop: StopSignal::new(),
        }
    }

    pub fn state(&self) -> RunState {
        *self.state.lock().unwrap()
    }

    /// Sorted presentation rows. Safe to call mid-run; the caller sees the
    /// results accumulated so far.
    pub fn rows(&self) -> Vec<ClaimRow> {
        self.index.read().unwrap().rows()
    }

    /// CSV export of the current rows, or `None` while there is nothing to
    /// export.
    pub fn export_csv(&self) -> Option<String> {
        let index = self.index.read().unwrap();
        if index.is_empty() {
            return None;
        }
        Some(export::to_csv(&index.rows()))
    }

    /// Raise the stop signal. The run ends at its next checkpoint;
    /// operations already dispatched are allowed to finish.
    pub fn stop(&self) {
        info!("Stop requested");
        self.stop.raise();
    }

    /// Wipe the index and return to `Idle`. Rejected while a run is in
    /// flight — stop it first.
    pub fn clear(&self) -> Result<(), ClaimdexError> {
        {
            let state = self.state.lock().unwrap();
            if matches!(*state, RunState::Loading | RunState::Working) {
                return Err(ClaimdexError::RunActive);
            }
        }
        self.index.write().unwrap().clear();
        self.set_state(RunState::Idle);
        info!("Results cleared");
        Ok(())
    }

    /// Execute one full run to its terminal state.
    ///
    /// No-op with a warning event when the scanner is not `Idle` — either a
    /// run is active, or a finished run's results have not been cleared.
    pub async fn run(&self) -> Result<ScanStats, ClaimdexError> {
        {
            let mut state = self.state.lock().unwrap();
            if *state != RunState::Idle {
                let message = format!("start ignored: scanner is {state}");
                warn!(%message);
                drop(state);
                self.sink.emit(ProgressEvent::Warning { message });
                return Err(ClaimdexError::RunActive);
            }
            *state = RunState::Loading;
        }
        info!(state = %RunState::Loading, "State changed");
        self.sink.emit(ProgressEvent::StateChanged {
            state: RunState::Loading,
        });

        self.stop.reset();
        self.index.write().unwrap().clear();

        let mut stats = ScanStats::new(Uuid::new_v4().to_string());
        info!(run_id = %stats.run_id, keyword = %self.config.keyword, "Scan starting");

        let outcome = match self.execute(&mut stats).await {
            Ok(outcome) => outcome,
            Err(e) => {
                let message = format!("{e:#}");
                error!(%message, "Scan failed");
                self.sink.emit(ProgressEvent::Error {
                    message: message.clone(),
                });
                self.set_state(RunState::Error);
                return Err(e);
            }
        };

        let final_state = match outcome {
            RunOutcome::Completed | RunOutcome::Stalled => RunState::Done,
            RunOutcome::Stopped => RunState::Stopped,
            RunOutcome::NothingFound => RunState::Idle,
        };
        self.set_state(final_state);

        stats.claimants = self.index.read().unwrap().claimants();
        stats.finish(outcome);
        info!("{stats}");
        Ok(stats)
    }

    async fn execute(&self, stats: &mut ScanStats) -> Result<RunOutcome, ClaimdexError> {
        if !self.host.gallery_present().await {
            return Err(ClaimdexError::GalleryMissing);
        }

        let loader = GalleryLoader::new(self.host.clone(), self.config.clone(), self.stop.clone());
        let items = loader.collect(self.sink.as_ref()).await?;
        stats.items_discovered = items.len();

        if self.stop.is_raised() {
            return Ok(RunOutcome::Stopped);
        }
        if items.is_empty() {
            info!("Gallery yielded no items");
            self.sink.emit(ProgressEvent::NothingFound);
            return Ok(RunOutcome::NothingFound);
        }

        self.set_state(RunState::Working);
        info!(items = items.len(), "Visiting items");

        let navigator =
            DetailNavigator::new(self.host.clone(), self.config.clone(), self.stop.clone());
        let outcome = self.visit_items(&navigator, &items, stats).await?;
        navigator.close().await;
        Ok(outcome)
    }

    /// Visit each item in order: open, wait for its comment thread, mine
    /// it, then advance the detail view and confirm the move.
    async fn visit_items(
        &self,
        navigator: &DetailNavigator,
        items: &[ItemId],
        stats: &mut ScanStats,
    ) -> Result<RunOutcome, ClaimdexError> {
        let miner = CommentMiner::new(&self.config);
        let total = items.len();

        for (position, item) in items.iter().enumerate() {
            if self.stop.is_raised() {
                return Ok(RunOutcome::Stopped);
            }
            let index = position + 1;
            info!(index, total, item = %item, "Opening item");
            navigator.open(item).await;

            let mut new_matches = 0usize;
            if navigator.await_comments_ready().await {
                navigator.load_all_comments().await;
                let records = self.host.comment_records().await?;
                let report = {
                    let mut claim_index = self.index.write().unwrap();
                    miner.mine(item, &records, &mut claim_index)
                };
                stats.items_visited += 1;
                stats.comments_scanned += report.scanned;
                stats.comments_matched += report.matched;
                stats.new_associations += report.new_associations;
                new_matches = report.new_associations;
                if new_matches > 0 {
                    info!(index, total, new_matches, "Booking claims found");
                }
            } else {
                if self.stop.is_raised() {
                    return Ok(RunOutcome::Stopped);
                }
                stats.items_skipped += 1;
                warn!(index, total, item = %item, "Comment region never became ready, skipping");
                self.sink.emit(ProgressEvent::Warning {
                    message: format!("comments not ready for item {index}/{total}, skipped"),
                });
            }
            self.sink.emit(ProgressEvent::ItemProgress {
                index,
                total,
                new_matches,
            });

            if self.stop.is_raised() {
                return Ok(RunOutcome::Stopped);
            }

            // Natural end of the sequence: last discovered item, or the
            // view's own counter says there is nothing further.
            if index == total || navigator.at_end_of_sequence().await {
                break;
            }

            let before = navigator.cursor().await;
            if !navigator.advance().await {
                warn!(index, total, "No advance control available, ending run early");
                self.sink.emit(ProgressEvent::Warning {
                    message: "no advance control available; run ended early".to_string(),
                });
                return Ok(RunOutcome::Stalled);
            }
            if navigator.await_advance_confirmed(&before).await.is_none() {
                if self.stop.is_raised() {
                    return Ok(RunOutcome::Stopped);
                }
                warn!(index, total, "Advance was not confirmed, ending run early");
                self.sink.emit(ProgressEvent::Warning {
                    message: format!(
                        "advance not confirmed after item {index}/{total}; run ended early"
                    ),
                });
                return Ok(RunOutcome::Stalled);
            }
        }

        Ok(RunOutcome::Completed)
    }

    fn set_state(&self, new_state: RunState) {
        *self.state.lock().unwrap() = new_state;
        info!(state = %new_state, "State changed");
        self.sink
            .emit(ProgressEvent::StateChanged { state: new_state });
    }
}
