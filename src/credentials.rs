//! Credential resolution and secret decryption.
//!
//! The settings store may hold secrets in an obfuscated form; turning them
//! into plaintext is the job of a [`SecretDecryptor`] supplied by the caller
//! at construction time. A missing settings entry is not an error; the push
//! simply runs without credentials.

use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::settings::ServerSettings;
use crate::{DeployError, DeployResult};

/// A username/secret pair used to authenticate the push.
///
/// Exists only for the duration of one deployment; never written to disk.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub username: String,
    secret: String,
}

impl Credential {
    pub fn new(username: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            secret: secret.into(),
        }
    }

    /// The secret in plaintext form.
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Same credential with the secret material replaced.
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = secret.into();
        self
    }
}

// Keep the secret out of log output and error messages.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Capability that turns a stored credential into a usable one.
///
/// Implementations decide what counts as obfuscated; values they do not
/// recognize should pass through unchanged.
pub trait SecretDecryptor: Send + Sync {
    fn decrypt(
        &self,
        credential: Credential,
    ) -> Result<Credential, Box<dyn std::error::Error + Send + Sync>>;
}

/// Decryptor that treats every stored secret as plaintext.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaintextDecryptor;

impl SecretDecryptor for PlaintextDecryptor {
    fn decrypt(
        &self,
        credential: Credential,
    ) -> Result<Credential, Box<dyn std::error::Error + Send + Sync>> {
        Ok(credential)
    }
}

/// Decryptor for `{…}`-wrapped base64 secrets.
///
/// A secret wrapped in curly braces is decoded as standard base64; anything
/// else passes through verbatim, so plaintext settings files keep working.
#[derive(Debug, Clone, Copy, Default)]
pub struct Base64SecretDecryptor;

impl SecretDecryptor for Base64SecretDecryptor {
    fn decrypt(
        &self,
        credential: Credential,
    ) -> Result<Credential, Box<dyn std::error::Error + Send + Sync>> {
        let secret = credential.secret();

        let Some(wrapped) = secret
            .strip_prefix('{')
            .and_then(|rest| rest.strip_suffix('}'))
        else {
            return Ok(credential);
        };

        let decoded = BASE64.decode(wrapped)?;
        let plaintext = String::from_utf8(decoded)?;
        Ok(credential.with_secret(plaintext))
    }
}

/// Resolves push credentials by server id.
pub struct CredentialResolver {
    settings: ServerSettings,
    decryptor: Box<dyn SecretDecryptor>,
}

impl CredentialResolver {
    pub fn new(settings: ServerSettings, decryptor: Box<dyn SecretDecryptor>) -> Self {
        Self {
            settings,
            decryptor,
        }
    }

    /// Look up and decrypt the credential for `server_id`.
    ///
    /// Returns `Ok(None)` when no entry matches, in which case the push
    /// runs anonymously. Only a failing decryption is an error.
    pub fn resolve(&self, server_id: &str) -> DeployResult<Option<Credential>> {
        let Some(entry) = self.settings.find(server_id) else {
            log::debug!("no settings entry for server `{server_id}`");
            return Ok(None);
        };

        let credential = Credential::new(entry.username.clone(), entry.password.clone());
        let credential = self
            .decryptor
            .decrypt(credential)
            .map_err(|e| DeployError::CredentialDecryption(server_id.to_string(), e))?;

        Ok(Some(credential))
    }
}
