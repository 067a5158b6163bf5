//! # kc-user-attrs
//!
//! Prints a Keycloak user's custom attributes as JSON.

#![forbid(unsafe_code)]
#![deny(warnings)]

use std::process::ExitCode;

use kc_user_attrs::{
    commands::run_lookup, config::load_env_file, output::report, AdminConfig, Cli, CliResult,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Load .env before anything reads the environment
    let env_file = load_env_file();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Some(path) = env_file {
        tracing::debug!(path = %path.display(), "loaded environment file");
    }
    let config = AdminConfig::from_env();

    let cli = match Cli::try_parse_args(std::env::args_os()) {
        Ok(parsed) => parsed,
        Err(e) => e.exit(),
    };

    match run(cli, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e);
            e.exit_code()
        }
    }
}

async fn run(cli: CliResult<Cli>, config: &AdminConfig) -> CliResult<()> {
    let target = cli?.into_target()?;
    tracing::debug!(?config, realm = %target.realm, username = %target.username, "starting lookup");

    run_lookup(target, config).await
}
