//! Server settings store.
//!
//! TOML file mapping server ids to push credentials, the moral equivalent of
//! a build tool's `servers` section:
//!
//! ```toml
//! [[servers]]
//! id = "azurewebsites"
//! username = "$myapp"
//! password = "{cGxhaW50ZXh0}"   # {…} values are obfuscated, see credentials
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::{DeployError, DeployResult};

/// One named credential entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerEntry {
    /// Identifier used for lookup (`server_id` in the deploy configuration).
    pub id: String,
    pub username: String,
    /// Secret in plaintext or obfuscated (`{…}`) form.
    pub password: String,
}

/// The full settings collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ServerSettings {
    #[serde(default)]
    pub servers: Vec<ServerEntry>,
}

impl ServerSettings {
    /// Load settings from a TOML file.
    ///
    /// A missing file is an empty store: credential absence is a legal state
    /// for the pipeline, so only a present but unreadable or malformed file
    /// is an error.
    pub fn load(path: &Path) -> DeployResult<Self> {
        if !path.exists() {
            log::debug!("no settings file at {}, using empty store", path.display());
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .map_err(|e| DeployError::Settings(path.to_path_buf(), Box::new(e)))?;

        toml::from_str(&raw).map_err(|e| DeployError::Settings(path.to_path_buf(), Box::new(e)))
    }

    /// Find the entry with the given id, if any.
    pub fn find(&self, server_id: &str) -> Option<&ServerEntry> {
        self.servers.iter().find(|server| server.id == server_id)
    }
}
