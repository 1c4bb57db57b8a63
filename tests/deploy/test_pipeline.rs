//! End-to-end tests for the deployment pipeline.
//!
//! The platform remote uses the reserved `test.invalid` domain, so the push
//! stage always fails to connect; under the lenient policy that still counts
//! as a completed deployment, which is exactly what these tests lean on.

use std::fs;
use std::path::{Path, PathBuf};

use fastdeploy::{
    Credential, CredentialResolver, DeployConfig, DeployError, PlaintextDecryptor, PushPolicy,
    SecretDecryptor, ServerSettings, ensure_repository, execute,
};
use git2::Repository;
use tempfile::TempDir;

struct RefusingDecryptor;

impl SecretDecryptor for RefusingDecryptor {
    fn decrypt(
        &self,
        _credential: Credential,
    ) -> Result<Credential, Box<dyn std::error::Error + Send + Sync>> {
        Err("decryption service unavailable".into())
    }
}

/// Source and staging directories with commit identity already configured.
fn pipeline_fixture(tmp: &TempDir) -> (PathBuf, PathBuf) {
    let source = tmp.path().join("site");
    fs::create_dir_all(&source).unwrap();
    fs::write(source.join("index.html"), "<html></html>").unwrap();
    fs::write(source.join("site.css"), "body {}").unwrap();

    let staging = tmp.path().join("staging");
    let repo = ensure_repository(&staging, &source).unwrap();
    let mut config = repo.config().unwrap();
    config.set_str("user.name", "Deploy Bot").unwrap();
    config.set_str("user.email", "deploy@example.com").unwrap();

    (source, staging)
}

fn unreachable_config(source: &Path, staging: &Path) -> DeployConfig {
    DeployConfig::new("myapp", source)
        .staging_directory(staging)
        .platform_domain("test.invalid")
}

fn empty_resolver() -> CredentialResolver {
    CredentialResolver::new(ServerSettings::default(), Box::new(PlaintextDecryptor))
}

#[test]
fn test_lenient_deploy_completes_without_reachable_platform() {
    let tmp = TempDir::new().unwrap();
    let (source, staging) = pipeline_fixture(&tmp);
    let config = unreachable_config(&source, &staging);

    let outcome = execute(&config, &empty_resolver()).unwrap();

    assert!(!outcome.delivered);
    assert_eq!(
        outcome.remote_url,
        "https://myapp.scm.test.invalid:443/myapp.git"
    );
    let mut added = outcome.staged.added.clone();
    added.sort();
    assert_eq!(added, vec!["index.html", "site.css"]);

    // The commit is on the staging branch even though delivery failed.
    let repo = Repository::open(&staging).unwrap();
    assert_eq!(repo.head().unwrap().target(), Some(outcome.commit_id));
}

#[test]
fn test_strict_deploy_fails_after_committing() {
    let tmp = TempDir::new().unwrap();
    let (source, staging) = pipeline_fixture(&tmp);
    let config = unreachable_config(&source, &staging).push_policy(PushPolicy::Strict);

    let result = execute(&config, &empty_resolver());

    match result {
        Err(DeployError::Push(url, _)) => assert_eq!(url, config.remote_url()),
        other => panic!("expected Push error, got {other:?}"),
    }

    // Everything before the push stage already ran.
    let repo = Repository::open(&staging).unwrap();
    assert!(repo.head().unwrap().target().is_some());
}

#[test]
fn test_decryption_failure_is_fatal_even_under_lenient_policy() {
    let tmp = TempDir::new().unwrap();
    let (source, staging) = pipeline_fixture(&tmp);
    let config = unreachable_config(&source, &staging);

    let settings: ServerSettings = toml::from_str(
        r#"
        [[servers]]
        id = "azurewebsites"
        username = "$myapp"
        password = "opaque"
        "#,
    )
    .unwrap();
    let resolver = CredentialResolver::new(settings, Box::new(RefusingDecryptor));

    match execute(&config, &resolver) {
        Err(DeployError::CredentialDecryption(server_id, _)) => {
            assert_eq!(server_id, "azurewebsites");
        }
        other => panic!("expected CredentialDecryption error, got {other:?}"),
    }

    // Credential resolution happens after the commit stage.
    let repo = Repository::open(&staging).unwrap();
    assert!(repo.head().unwrap().target().is_some());
}

#[test]
fn test_empty_application_name_rejected_before_any_work() {
    let tmp = TempDir::new().unwrap();
    let (source, _staging) = pipeline_fixture(&tmp);
    let untouched_staging = tmp.path().join("never-created");
    let config = DeployConfig::new("", &source)
        .staging_directory(&untouched_staging)
        .platform_domain("test.invalid");

    let result = execute(&config, &empty_resolver());

    assert!(matches!(result, Err(DeployError::InvalidConfig(_))));
    assert!(!untouched_staging.exists());
}

#[test]
fn test_repeated_deploys_build_incremental_history() {
    let tmp = TempDir::new().unwrap();
    let (source, staging) = pipeline_fixture(&tmp);
    let config = unreachable_config(&source, &staging);
    let resolver = empty_resolver();

    let first = execute(&config, &resolver).unwrap();

    fs::write(source.join("index.html"), "<html>v2</html>").unwrap();
    let second = execute(&config, &resolver).unwrap();

    assert_ne!(first.commit_id, second.commit_id);
    let repo = Repository::open(&staging).unwrap();
    let head = repo.find_commit(second.commit_id).unwrap();
    assert_eq!(head.parent_id(0).unwrap(), first.commit_id);

    // A third run with identical content creates no new commit.
    let third = execute(&config, &resolver).unwrap();
    assert_eq!(third.commit_id, second.commit_id);
}

#[tokio::test]
async fn test_async_run_completes_pipeline() {
    let tmp = TempDir::new().unwrap();
    let (source, staging) = pipeline_fixture(&tmp);
    let config = unreachable_config(&source, &staging);

    let outcome = fastdeploy::run(config, empty_resolver()).await.unwrap();

    assert!(!outcome.delivered);
    let repo = Repository::open(&staging).unwrap();
    assert_eq!(repo.head().unwrap().target(), Some(outcome.commit_id));
}
