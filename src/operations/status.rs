//! Working tree status inspection.

use git2::{Repository, Status, StatusOptions};

use crate::{DeployError, DeployResult};

/// Snapshot of working tree changes relative to the staging repository index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkingTreeStatus {
    /// Tracked files whose contents or type changed.
    pub modified: Vec<String>,
    /// Tracked files removed from the working tree.
    pub deleted: Vec<String>,
    /// Files present in the working tree but unknown to the index.
    pub untracked: Vec<String>,
}

impl WorkingTreeStatus {
    pub fn is_clean(&self) -> bool {
        self.modified.is_empty() && self.deleted.is_empty() && self.untracked.is_empty()
    }
}

/// Collect the current working tree status.
///
/// Untracked directories are recursed so every new file shows up
/// individually; ignored files are skipped.
pub fn working_tree_status(repo: &Repository) -> DeployResult<WorkingTreeStatus> {
    let mut opts = StatusOptions::new();
    opts.include_untracked(true)
        .recurse_untracked_dirs(true)
        .include_ignored(false);

    let statuses = repo
        .statuses(Some(&mut opts))
        .map_err(DeployError::Staging)?;

    let mut status = WorkingTreeStatus::default();
    for entry in statuses.iter() {
        // Paths are stored as bytes; non-UTF8 names degrade lossily rather
        // than aborting the deployment.
        let path = String::from_utf8_lossy(entry.path_bytes()).into_owned();
        let flags = entry.status();

        if flags.contains(Status::WT_NEW) {
            status.untracked.push(path);
        } else if flags.contains(Status::WT_DELETED) {
            status.deleted.push(path);
        } else if flags.intersects(Status::WT_MODIFIED | Status::WT_TYPECHANGE) {
            status.modified.push(path);
        }
    }

    Ok(status)
}
