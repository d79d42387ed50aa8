//! Command line argument parsing

use crate::core::thumbnail::ThumbnailTier;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Cyberthum - grab YouTube thumbnails at the best available resolution
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// YouTube video URLs (watch, youtu.be, embed, /v/ or /u/<n>/ links)
    pub urls: Vec<String>,

    /// Tier to download: maxRes, hq, mq or sd (default: best available)
    #[arg(short, long, value_name = "TIER")]
    pub tier: Option<ThumbnailTier>,

    /// Output directory
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Verify tiers and print them without downloading
    #[arg(long)]
    pub list: bool,

    /// Print the thumbnail URLs and exit (no network access)
    #[arg(short = 'g', long)]
    pub print_urls: bool,

    /// Print thumbnail URLs and availability as JSON and exit
    #[arg(long)]
    pub json: bool,

    /// Skip availability probing
    #[arg(long)]
    pub no_verify: bool,

    /// Read response bodies in one piece instead of streaming
    #[arg(long)]
    pub no_stream: bool,

    /// Disable progress output
    #[arg(long)]
    pub no_progress: bool,

    /// HTTP timeout (e.g., 30s, 1m); unlimited when omitted
    #[arg(long, value_name = "DURATION")]
    pub timeout: Option<humantime::Duration>,

    /// Override User-Agent header
    #[arg(long, value_name = "USER_AGENT")]
    pub user_agent: Option<String>,

    /// Proxy URL (http/https/socks)
    #[arg(long, value_name = "URL")]
    pub proxy: Option<String>,

    /// Thumbnail host base URL
    #[arg(long, value_name = "URL")]
    pub thumbnail_host: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet output (only errors)
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Get HTTP timeout as Duration
    pub fn timeout_duration(&self) -> Option<Duration> {
        self.timeout.as_deref().copied()
    }

    /// Check if the run only prints information
    pub fn is_dry_run(&self) -> bool {
        self.list || self.print_urls || self.json
    }

    /// Check if `--tier` asked for a tier that could not be selected
    pub fn is_tier_missing(&self, selected: Option<ThumbnailTier>) -> bool {
        self.tier.is_some() && self.tier != selected
    }

    /// Get output verbosity level
    pub fn verbosity_level(&self) -> VerbosityLevel {
        if self.quiet {
            VerbosityLevel::Quiet
        } else if self.verbose {
            VerbosityLevel::Verbose
        } else {
            VerbosityLevel::Normal
        }
    }
}

/// Output verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbosityLevel {
    /// Quiet (only errors)
    Quiet,
    /// Normal
    Normal,
    /// Verbose (debug info)
    Verbose,
}

impl VerbosityLevel {
    /// Default tracing filter for this level
    pub fn log_filter(&self) -> &'static str {
        match self {
            VerbosityLevel::Quiet => "error",
            VerbosityLevel::Normal => "warn",
            VerbosityLevel::Verbose => "debug",
        }
    }
}

// Implement Default for Args to make tests work
impl Default for Args {
    fn default() -> Self {
        Self {
            urls: Vec::new(),
            tier: None,
            output: None,
            list: false,
            print_urls: false,
            json: false,
            no_verify: false,
            no_stream: false,
            no_progress: false,
            timeout: None,
            user_agent: None,
            proxy: None,
            thumbnail_host: None,
            verbose: false,
            quiet: false,
        }
    }
}
