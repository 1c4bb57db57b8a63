//! `fastdeploy` - staged-commit, force-push deployment for git-backed hosts
//!
//! This library binds a persistent local git repository to a volatile build
//! output directory, records the directory's current state as a commit, and
//! force-pushes that commit to a hosting platform's SCM endpoint. Each stage
//! of the pipeline lives in its own module and is usable on its own; the
//! [`pipeline`] module chains them in deployment order.

use std::path::PathBuf;

use thiserror::Error;

// Module declarations
pub mod config;
pub mod credentials;
pub mod operations;
pub mod pipeline;
pub mod settings;

// Re-export the configuration object and pipeline entry points
pub use config::DeployConfig;
pub use pipeline::{DeployOutcome, execute, run};

// Re-export credential handling
pub use credentials::{
    Base64SecretDecryptor, Credential, CredentialResolver, PlaintextDecryptor, SecretDecryptor,
};
pub use settings::{ServerEntry, ServerSettings};

// Re-export the individual pipeline stages
pub use operations::{
    PushPolicy, PushReport, StageSummary, WorkingTreeStatus, commit_all, ensure_repository,
    force_push, stage_all, working_tree_status,
};

/// Error types for deployment operations.
///
/// Everything upstream of the push stage is fatal and keeps its original
/// cause; a push failure only becomes an error under
/// [`PushPolicy::Strict`].
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("failed to prepare staging repository: {0}")]
    RepositoryInit(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("failed to stage working tree changes: {0}")]
    Staging(#[source] git2::Error),

    #[error("failed to create deployment commit: {0}")]
    Commit(#[source] git2::Error),

    #[error("failed to decrypt credentials for server `{0}`: {1}")]
    CredentialDecryption(String, #[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("push to `{0}` failed: {1}")]
    Push(String, #[source] git2::Error),

    #[error("failed to read server settings from {}: {}", .0.display(), .1)]
    Settings(PathBuf, #[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("invalid deployment configuration: {0}")]
    InvalidConfig(String),

    #[error("deploy task failed to complete: {0}")]
    TaskFailed(String),
}

/// Convenience result alias.
pub type DeployResult<T> = Result<T, DeployError>;

/// A unique commit identifier.
pub type CommitId = git2::Oid;
