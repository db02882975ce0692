//! Run progression: score, unlock cadence, activation slots and rewind
//!
//! `ProgressionState` is the single owner of a run's mutable state. Every
//! mutation is a synchronous call from the host's game loop; invalid calls are
//! rejected through return values rather than errors.

pub mod history;
pub mod state;

pub use history::{Snapshot, SnapshotHistory};
pub use state::{ProgressSummary, ProgressionState, RunPhase};
