use std::path::PathBuf;

use clap::Parser;

/// Fetch a GitHub profile and print it as a card.
///
/// Without a username the program starts an interactive prompt.
#[derive(Parser, Debug, Default, Clone)]
#[command(name = "profile-card", version)]
pub struct Args {
    /// GitHub username to look up.
    pub username: Option<String>,

    /// API token sent as a bearer token (overrides GITHUB_TOKEN).
    #[arg(long)]
    pub token: Option<String>,

    /// Base URL of the GitHub REST API (overrides GITHUB_API_URL).
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Number of top repositories to list.
    #[arg(long, value_name = "N")]
    pub top_repos: Option<usize>,

    /// Per-request timeout in seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Path to a TOML config file (default: ./profile_card.toml if present).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Where to write the log file.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Debug logging, mirrored to stderr.
    #[arg(short, long)]
    pub verbose: bool,

    /// Open the profile page in a browser after a successful lookup.
    #[arg(long)]
    pub open: bool,
}
