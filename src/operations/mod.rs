//! Git operations module
//!
//! The individual pipeline stages over a staging repository, implemented
//! with the git2 (libgit2) library. Each operation is synchronous; the
//! async entry point in [`crate::pipeline`] wraps the whole sequence.

pub mod commit;
pub mod push;
pub mod repository;
pub mod stage;
pub mod status;

// Re-export operation functions
pub use commit::commit_all;
pub use push::{PushPolicy, PushReport, force_push};
pub use repository::ensure_repository;
pub use stage::{StageSummary, stage_all};
pub use status::{WorkingTreeStatus, working_tree_status};
