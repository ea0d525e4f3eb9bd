//! claimdex-engine — the traversal-and-extraction pipeline.
//!
//! Walks a lazily-loading gallery one detail view at a time, waits out the
//! host's unpredictable content loading, mines comment threads for booking
//! claims and folds them into the claimant → items index. The host surface
//! is reached only through `claimdex_common::GalleryHost`.

pub mod export;
pub mod gallery;
pub mod index;
pub mod miner;
pub mod navigator;
pub mod progress;
pub mod scanner;
pub mod stats;
pub mod stop;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use index::ClaimIndex;
pub use progress::{NullSink, ProgressEvent, ProgressSink, TracingSink};
pub use scanner::Scanner;
pub use stats::{RunOutcome, ScanStats};
pub use stop::StopSignal;
