//! `searx-instances` command implementation
//!
//! The binary only parses arguments and sets up logging; each subcommand
//! lives in its own module so it can be driven from tests.

pub mod check;
pub mod cli;
pub mod export;
pub mod update;

use anyhow::Result;
use cli::GlobalArgs;
use sxi_update::UpdateConfig;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Default log directive for a verbosity count
#[must_use]
pub fn log_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Install the stderr subscriber; `RUST_LOG` wins over `-v`
pub fn init_logging(verbose: u8) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_directive(verbose).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Configuration file, then command line overrides
///
/// # Errors
/// When the configuration file cannot be read or parsed.
pub fn load_config(globals: &GlobalArgs) -> Result<UpdateConfig> {
    let mut config = match &globals.config {
        Some(path) => UpdateConfig::from_file(path)?,
        None => UpdateConfig::new(),
    };
    if let Some(repo) = &globals.repo {
        config = config.with_repo_root(repo.as_path());
    }
    if let Some(list) = &globals.list {
        config = config.with_list_path(list.as_path());
    }
    tracing::debug!(?config, "configuration");
    Ok(config)
}
