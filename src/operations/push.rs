//! Force push to the platform remote.
//!
//! The remote side rebuilds from whatever lands on `master`, so local
//! history always wins and every push is forced. Some platforms answer a
//! successful deploy with a failure-shaped response; the default lenient
//! policy logs a failed push as a warning and moves on.

use std::cell::RefCell;
use std::rc::Rc;

use git2::{Cred, PushOptions, RemoteCallbacks, Repository};

use crate::credentials::Credential;
use crate::{DeployError, DeployResult};

/// How push failures affect the deployment outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PushPolicy {
    /// Log push failures as warnings and report success.
    #[default]
    Lenient,
    /// Fail the deployment when the push fails or any ref is rejected.
    Strict,
}

/// What happened to the push.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PushReport {
    /// True when the remote confirmed every ref update.
    pub delivered: bool,
    /// Per-ref rejection messages from the remote, if any.
    pub rejected: Vec<String>,
}

/// Force-push the current head to `refs/heads/master` on `url`.
///
/// Supplies `credential` to the remote when given, otherwise attempts an
/// anonymous push. Sideband progress lines and per-ref status updates from
/// the remote are logged at debug level. Failures are handled according to
/// `policy`; see [`PushPolicy`].
pub fn force_push(
    repo: &Repository,
    url: &str,
    credential: Option<&Credential>,
    policy: PushPolicy,
) -> DeployResult<PushReport> {
    match try_push(repo, url, credential) {
        Ok(rejected) if rejected.is_empty() => {
            log::info!("pushed deployment to {url}");
            Ok(PushReport {
                delivered: true,
                rejected,
            })
        }
        Ok(rejected) => match policy {
            PushPolicy::Strict => Err(DeployError::Push(
                url.to_string(),
                git2::Error::from_str(&rejected.join("; ")),
            )),
            PushPolicy::Lenient => {
                for message in &rejected {
                    log::warn!("push to {url} rejected a ref: {message}");
                }
                Ok(PushReport {
                    delivered: false,
                    rejected,
                })
            }
        },
        Err(e) => match policy {
            PushPolicy::Strict => Err(DeployError::Push(url.to_string(), e)),
            PushPolicy::Lenient => {
                log::warn!("push to {url} failed, tolerated by lenient push policy: {e}");
                Ok(PushReport::default())
            }
        },
    }
}

/// Run the push itself, returning any per-ref rejection messages.
fn try_push(
    repo: &Repository,
    url: &str,
    credential: Option<&Credential>,
) -> Result<Vec<String>, git2::Error> {
    let head = repo.head()?;
    let source = head
        .name()
        .ok_or_else(|| git2::Error::from_str("head ref name is not valid utf-8"))?;
    let refspec = format!("+{source}:refs/heads/master");

    let rejected = Rc::new(RefCell::new(Vec::new()));

    let mut callbacks = RemoteCallbacks::new();

    let auth = credential.cloned();
    callbacks.credentials(move |_url, _username_from_url, _allowed| match &auth {
        Some(credential) => Cred::userpass_plaintext(&credential.username, credential.secret()),
        None => Cred::default(),
    });

    callbacks.sideband_progress(|data| {
        let line = String::from_utf8_lossy(data);
        let line = line.trim_end();
        if !line.is_empty() {
            log::debug!("remote: {line}");
        }
        true
    });

    let rejected_sink = Rc::clone(&rejected);
    callbacks.push_update_reference(move |refname, status| {
        match status {
            Some(message) => {
                log::debug!("ref {refname} rejected: {message}");
                rejected_sink
                    .borrow_mut()
                    .push(format!("{refname}: {message}"));
            }
            None => log::debug!("ref {refname} updated"),
        }
        Ok(())
    });

    let mut options = PushOptions::new();
    options.remote_callbacks(callbacks);

    let mut remote = repo.remote_anonymous(url)?;
    log::debug!("pushing {refspec} to {url}");
    remote.push(&[refspec.as_str()], Some(&mut options))?;

    Ok(rejected.take())
}
