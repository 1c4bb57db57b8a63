//! Two-phase staging of working tree changes.

use std::path::Path;

use git2::Repository;

use crate::operations::status::working_tree_status;
use crate::{DeployError, DeployResult};

/// What a staging pass put into the index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageSummary {
    /// Tracked files refreshed in the index (modifications and deletions).
    pub updated: usize,
    /// Previously untracked files added to the index, in status order.
    pub added: Vec<String>,
}

/// Stage every working tree change into the index.
///
/// Runs in two phases: first an update pass that refreshes all tracked
/// entries (picking up modifications and deletions), then an add pass for
/// each untracked file. The add pass is skipped entirely when nothing is
/// untracked. Each newly added file is logged by name.
pub fn stage_all(repo: &Repository) -> DeployResult<StageSummary> {
    let status = working_tree_status(repo)?;

    let mut index = repo.index().map_err(DeployError::Staging)?;

    index
        .update_all(["*"].iter(), None)
        .map_err(DeployError::Staging)?;

    if !status.untracked.is_empty() {
        for path in &status.untracked {
            log::info!("adding file {path}");
            index
                .add_path(Path::new(path))
                .map_err(DeployError::Staging)?;
        }
    }

    index.write().map_err(DeployError::Staging)?;

    Ok(StageSummary {
        updated: status.modified.len() + status.deleted.len(),
        added: status.untracked,
    })
}
