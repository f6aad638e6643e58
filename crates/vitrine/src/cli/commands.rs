//! CLI command definitions.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use vitrine::MediaCategory;

/// Vitrine - resolve marketplace image references and their fallbacks
#[derive(Parser, Debug)]
#[command(name = "vitrine")]
#[command(about = "Resolve marketplace image references and their load-failure fallbacks", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file replacing the layered defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the persisted failure caches
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve one image reference to its display URL
    Resolve {
        /// Reference: a URL, or a JSON value when --json is given
        reference: String,

        /// Parse the reference as JSON (string or {url, thumbnail, key} object)
        #[arg(long)]
        json: bool,

        /// Media category
        #[arg(short, long, default_value = "default")]
        category: MediaCategory,

        /// Known external video id
        #[arg(long)]
        video_id: Option<String>,
    },

    /// Resolve every image field of a backend JSON record
    Record {
        /// JSON record with featuredImage, thumbnail, images and gallery fields
        record: String,

        /// Media category
        #[arg(short, long, default_value = "default")]
        category: MediaCategory,
    },

    /// Compute the next source after a URL failed to load
    Fallback {
        /// URL that failed
        url: String,

        /// Media category
        #[arg(short, long, default_value = "default")]
        category: MediaCategory,

        /// Known external video id
        #[arg(long)]
        video_id: Option<String>,
    },

    /// Show every source tried if each one fails, without persisting anything
    Chain {
        /// Reference URL the image starts from
        url: String,

        /// Media category
        #[arg(short, long, default_value = "default")]
        category: MediaCategory,

        /// Known external video id
        #[arg(long)]
        video_id: Option<String>,
    },

    /// Failure cache maintenance
    #[command(subcommand)]
    Cache(CacheCommands),
}

/// Failure cache subcommands
#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// List remembered failures
    List {
        /// Only this category (all categories when omitted)
        #[arg(short, long)]
        category: Option<MediaCategory>,
    },

    /// Forget remembered failures
    Clear {
        /// Only this category (all categories when omitted)
        #[arg(short, long)]
        category: Option<MediaCategory>,
    },

    /// Drop failures older than the TTL
    Prune {
        /// Only this category (all categories when omitted)
        #[arg(short, long)]
        category: Option<MediaCategory>,
    },
}

/// Output format options
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable format
    Human,
    /// JSON format
    Json,
}
