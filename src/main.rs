// fastdeploy: push a build output directory to a git-backed hosting platform.
//
// Thin CLI over the library pipeline. Credentials come from a TOML settings
// file keyed by server id; everything else is flags with platform defaults.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use fastdeploy::{
    Base64SecretDecryptor, CredentialResolver, DeployConfig, PushPolicy, ServerSettings,
};
use fastdeploy::config::{
    DEFAULT_COMMIT_MESSAGE, DEFAULT_PLATFORM_DOMAIN, DEFAULT_SERVER_ID, DEFAULT_STAGING_DIRECTORY,
};

#[derive(Parser, Debug)]
#[command(name = "fastdeploy", version, about = "Deploy a build output directory by git push")]
struct Cli {
    /// Application name on the hosting platform
    application_name: String,

    /// Directory whose contents get deployed
    source_directory: PathBuf,

    /// Server id used to look up push credentials in the settings file
    #[arg(long, default_value = DEFAULT_SERVER_ID)]
    server_id: String,

    /// Persistent staging repository directory
    #[arg(long, default_value = DEFAULT_STAGING_DIRECTORY)]
    staging_directory: PathBuf,

    /// Deployment commit message
    #[arg(long, default_value = DEFAULT_COMMIT_MESSAGE)]
    message: String,

    /// Platform domain the remote URL is built from
    #[arg(long, default_value = DEFAULT_PLATFORM_DOMAIN)]
    platform_domain: String,

    /// Settings file with server credentials (defaults to the user config dir)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Fail the deployment when the push fails instead of tolerating it
    #[arg(long)]
    strict_push: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let settings_path = cli
        .settings
        .or_else(|| dirs::config_dir().map(|dir| dir.join("fastdeploy").join("servers.toml")));
    let settings = match &settings_path {
        Some(path) => ServerSettings::load(path)?,
        None => ServerSettings::default(),
    };
    let resolver = CredentialResolver::new(settings, Box::new(Base64SecretDecryptor));

    let policy = if cli.strict_push {
        PushPolicy::Strict
    } else {
        PushPolicy::Lenient
    };
    let config = DeployConfig::new(cli.application_name, cli.source_directory)
        .server_id(cli.server_id)
        .staging_directory(cli.staging_directory)
        .commit_message(cli.message)
        .platform_domain(cli.platform_domain)
        .push_policy(policy);

    let outcome = fastdeploy::run(config, resolver).await?;

    if outcome.delivered {
        println!("deployed commit {} to {}", outcome.commit_id, outcome.remote_url);
    } else {
        println!(
            "created commit {}, delivery to {} not confirmed",
            outcome.commit_id, outcome.remote_url
        );
    }

    Ok(())
}
