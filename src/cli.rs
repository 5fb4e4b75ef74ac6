use clap::Parser;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Parser, Debug)]
#[command(
    name = "gphotos-dl",
    about = "Download a Google Photos library into year/month folders"
)]
pub struct Cli {
    /// Base directory for downloads
    #[arg(short = 'd', long, default_value = ".")]
    pub directory: String,

    /// Number of concurrent downloads per page
    #[arg(long, default_value_t = 4)]
    pub concurrency: usize,

    /// Items requested per listing page (API maximum is 100)
    #[arg(long, default_value_t = 100)]
    pub page_size: u32,

    /// Stored OAuth credential (token.json from a completed consent flow)
    #[arg(long, default_value = "token.json")]
    pub token_file: String,

    /// Log file, written in addition to console output
    #[arg(long, default_value = "gphotos-dl.log")]
    pub log_file: String,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}
