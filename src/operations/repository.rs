//! Staging repository setup.
//!
//! The staging repository keeps its metadata in a persistent directory that
//! survives across deployments, while the working tree is rebound to the
//! build output directory on every run. Splitting the two means repeated
//! deployments produce incremental commits without ever writing git metadata
//! into the build output itself.

use std::path::Path;

use git2::{Repository, RepositoryInitOptions};

use crate::{DeployError, DeployResult};

/// Open the staging repository, creating it on first use.
///
/// `git_dir` is the persistent metadata directory (no `.git` subdirectory is
/// appended) and `work_tree` is the directory whose contents get deployed.
/// The same `git_dir` can be reused across runs with a different `work_tree`
/// each time; the binding only lasts for the returned handle.
pub fn ensure_repository(git_dir: &Path, work_tree: &Path) -> DeployResult<Repository> {
    if !work_tree.is_dir() {
        return Err(DeployError::InvalidConfig(format!(
            "work tree {} does not exist or is not a directory",
            work_tree.display()
        )));
    }

    let work_tree = std::path::absolute(work_tree)
        .map_err(|e| DeployError::RepositoryInit(Box::new(e)))?;
    let git_dir =
        std::path::absolute(git_dir).map_err(|e| DeployError::RepositoryInit(Box::new(e)))?;

    // A HEAD file is what distinguishes an initialized gitdir from a
    // leftover empty directory.
    let repo = if git_dir.join("HEAD").exists() {
        log::debug!("reusing staging repository at {}", git_dir.display());
        Repository::open(&git_dir).map_err(|e| DeployError::RepositoryInit(Box::new(e)))?
    } else {
        log::info!("initializing staging repository at {}", git_dir.display());
        let mut opts = RepositoryInitOptions::new();
        opts.bare(true).mkpath(true).initial_head("master");
        Repository::init_opts(&git_dir, &opts)
            .map_err(|e| DeployError::RepositoryInit(Box::new(e)))?
    };

    // Bind the build output as this run's working tree. The binding is held
    // on the handle only; nothing is written into the build output.
    repo.set_workdir(&work_tree, false)
        .map_err(|e| DeployError::RepositoryInit(Box::new(e)))?;

    Ok(repo)
}
