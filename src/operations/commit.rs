//! Deployment commit creation.

use git2::{Commit, ErrorCode, Repository};

use crate::{CommitId, DeployError, DeployResult};

/// Commit the staged index to the current branch.
///
/// Tracked files are refreshed once more before the tree is written, so a
/// modification that slipped in after staging still lands in the commit.
/// Author and committer come from the repository's ambient identity
/// configuration; an unset identity fails the commit. The very first
/// deployment commits onto an unborn branch with no parent. When the staged
/// tree is identical to the current head, no new commit is created and the
/// existing head id is returned.
pub fn commit_all(repo: &Repository, message: &str) -> DeployResult<CommitId> {
    let signature = repo.signature().map_err(DeployError::Commit)?;

    let mut index = repo.index().map_err(DeployError::Commit)?;
    index
        .update_all(["*"].iter(), None)
        .map_err(DeployError::Commit)?;
    index.write().map_err(DeployError::Commit)?;
    let tree_id = index.write_tree().map_err(DeployError::Commit)?;

    let parent = head_commit(repo)?;
    if let Some(parent) = &parent {
        if parent.tree_id() == tree_id {
            log::debug!("nothing changed since {}, skipping commit", parent.id());
            return Ok(parent.id());
        }
    }

    let tree = repo.find_tree(tree_id).map_err(DeployError::Commit)?;
    let parents: Vec<&Commit> = parent.iter().collect();

    let commit_id = repo
        .commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &parents,
        )
        .map_err(DeployError::Commit)?;

    // The branch ref must now point at the commit we just made.
    let head_target = repo
        .head()
        .map_err(DeployError::Commit)?
        .target();
    if head_target != Some(commit_id) {
        return Err(DeployError::Commit(git2::Error::from_str(
            "branch ref does not resolve to the new commit",
        )));
    }

    log::info!("created deployment commit {commit_id}");
    Ok(commit_id)
}

fn head_commit(repo: &Repository) -> DeployResult<Option<Commit<'_>>> {
    match repo.head() {
        Ok(head) => {
            let commit = head.peel_to_commit().map_err(DeployError::Commit)?;
            Ok(Some(commit))
        }
        Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => Ok(None),
        Err(e) => Err(DeployError::Commit(e)),
    }
}
