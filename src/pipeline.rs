//! The deployment pipeline.
//!
//! Runs the stages strictly in order: prepare the staging repository, stage
//! working tree changes, commit, resolve credentials, push. Each stage only
//! runs when every stage before it succeeded; a lenient push failure still
//! counts as success for the pipeline as a whole.

use crate::config::DeployConfig;
use crate::credentials::CredentialResolver;
use crate::operations::{
    StageSummary, commit_all, ensure_repository, force_push, stage_all,
};
use crate::{CommitId, DeployError, DeployResult};

/// What a completed deployment produced.
#[derive(Debug, Clone)]
pub struct DeployOutcome {
    /// The commit the push delivered (or would have delivered).
    pub commit_id: CommitId,
    /// The platform remote the push targeted.
    pub remote_url: String,
    /// What was staged for this deployment.
    pub staged: StageSummary,
    /// True when the remote confirmed the push.
    pub delivered: bool,
}

/// Run the whole pipeline, blocking the current thread.
pub fn execute(config: &DeployConfig, resolver: &CredentialResolver) -> DeployResult<DeployOutcome> {
    if config.application_name.is_empty() {
        return Err(DeployError::InvalidConfig(
            "application name must not be empty".to_string(),
        ));
    }

    let repo = ensure_repository(&config.staging_directory, &config.source_directory)?;

    let staged = stage_all(&repo)?;
    log::info!(
        "staged {} updated and {} new files from {}",
        staged.updated,
        staged.added.len(),
        config.source_directory.display()
    );

    let commit_id = commit_all(&repo, &config.commit_message)?;

    let credential = resolver.resolve(&config.server_id)?;

    let remote_url = config.remote_url();
    log::info!(
        "deploying {} as commit {commit_id} to {remote_url}",
        config.application_name
    );
    let report = force_push(&repo, &remote_url, credential.as_ref(), config.push_policy)?;

    Ok(DeployOutcome {
        commit_id,
        remote_url,
        staged,
        delivered: report.delivered,
    })
}

/// Run the whole pipeline on a blocking worker thread.
pub async fn run(config: DeployConfig, resolver: CredentialResolver) -> DeployResult<DeployOutcome> {
    tokio::task::spawn_blocking(move || execute(&config, &resolver))
        .await
        .map_err(|e| DeployError::TaskFailed(e.to_string()))?
}
