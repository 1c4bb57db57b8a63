//! Deployment configuration.
//!
//! One value object carries every input the pipeline needs; callers build it
//! up front and pass it wholesale into [`crate::pipeline::run`].

use std::path::PathBuf;

use crate::operations::PushPolicy;

/// Server id looked up in the settings store when none is given.
pub const DEFAULT_SERVER_ID: &str = "azurewebsites";

/// Directory holding the persistent repository metadata when none is given.
pub const DEFAULT_STAGING_DIRECTORY: &str = "tmp-git-deployment-staging";

/// Commit message applied to generated deployment commits when none is given.
pub const DEFAULT_COMMIT_MESSAGE: &str = "Update from fast-deploy";

/// SCM domain of the target platform when none is given.
pub const DEFAULT_PLATFORM_DOMAIN: &str = "azurewebsites.net";

/// Configuration for one deployment run.
///
/// # Example
///
/// ```rust
/// use fastdeploy::DeployConfig;
///
/// let config = DeployConfig::new("myapp", "target/site-bin")
///     .platform_domain("example-host.net")
///     .commit_message("Deploy build 42");
/// assert_eq!(
///     config.remote_url(),
///     "https://myapp.scm.example-host.net:443/myapp.git"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct DeployConfig {
    /// Name of the application on the hosting platform; also names the
    /// remote repository.
    pub application_name: String,
    /// Settings-store id whose credentials authenticate the push.
    pub server_id: String,
    /// Build output directory bound as the repository working tree.
    pub source_directory: PathBuf,
    /// Directory holding the persistent repository metadata. Reused across
    /// runs so the remote sees a growing history.
    pub staging_directory: PathBuf,
    /// Message recorded on the deployment commit.
    pub commit_message: String,
    /// SCM domain of the hosting platform.
    pub platform_domain: String,
    /// How push failures are treated.
    pub push_policy: PushPolicy,
}

impl DeployConfig {
    /// Create a configuration for `application_name` deploying the contents
    /// of `source_directory`, with every other field at its default.
    pub fn new(application_name: impl Into<String>, source_directory: impl Into<PathBuf>) -> Self {
        Self {
            application_name: application_name.into(),
            server_id: DEFAULT_SERVER_ID.to_string(),
            source_directory: source_directory.into(),
            staging_directory: PathBuf::from(DEFAULT_STAGING_DIRECTORY),
            commit_message: DEFAULT_COMMIT_MESSAGE.to_string(),
            platform_domain: DEFAULT_PLATFORM_DOMAIN.to_string(),
            push_policy: PushPolicy::default(),
        }
    }

    /// Set the settings-store id used for credential lookup.
    pub fn server_id(mut self, server_id: impl Into<String>) -> Self {
        self.server_id = server_id.into();
        self
    }

    /// Set the persistent repository metadata directory.
    pub fn staging_directory(mut self, staging_directory: impl Into<PathBuf>) -> Self {
        self.staging_directory = staging_directory.into();
        self
    }

    /// Set the deployment commit message.
    pub fn commit_message(mut self, commit_message: impl Into<String>) -> Self {
        self.commit_message = commit_message.into();
        self
    }

    /// Set the platform SCM domain.
    pub fn platform_domain(mut self, platform_domain: impl Into<String>) -> Self {
        self.platform_domain = platform_domain.into();
        self
    }

    /// Set the push failure policy.
    pub fn push_policy(mut self, push_policy: PushPolicy) -> Self {
        self.push_policy = push_policy;
        self
    }

    /// The derived push endpoint for this application.
    ///
    /// Recomputed on every call and never persisted; the application name
    /// appears both as the subdomain and as the repository name.
    pub fn remote_url(&self) -> String {
        format!(
            "https://{app}.scm.{domain}:443/{app}.git",
            app = self.application_name,
            domain = self.platform_domain
        )
    }
}
