//! simgallery — a deterministic scripted gallery host.
//!
//! Implements the engine-facing host trait with content coming from a
//! plain-data script instead of a live page. All behavior advances on host
//! calls, never on wall-clock time, so tests are fully deterministic under
//! paused tokio time.

pub mod script;
pub mod sim;

pub use script::{AlbumScript, ScriptedComment, ScriptedItem};
pub use sim::{SimBehavior, SimGallery};
