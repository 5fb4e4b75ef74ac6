use std::path::PathBuf;

use crate::cli::{Cli, LogLevel};

/// Application configuration, resolved and validated from the CLI.
#[derive(Debug)]
pub struct Config {
    pub directory: PathBuf,
    pub token_file: PathBuf,
    pub log_file: PathBuf,
    pub concurrency: usize,
    pub page_size: u32,
    pub log_level: LogLevel,
}

/// Expand ~ to the user's home directory.
fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

impl Config {
    pub fn from_cli(cli: Cli) -> anyhow::Result<Self> {
        anyhow::ensure!(cli.concurrency >= 1, "--concurrency must be at least 1");
        anyhow::ensure!(
            (1..=100).contains(&cli.page_size),
            "--page-size must be between 1 and 100"
        );

        Ok(Self {
            directory: expand_tilde(&cli.directory),
            token_file: expand_tilde(&cli.token_file),
            log_file: expand_tilde(&cli.log_file),
            concurrency: cli.concurrency,
            page_size: cli.page_size,
            log_level: cli.log_level,
        })
    }
}
