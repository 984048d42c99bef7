//! CLI argument parsing and command routing

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::services::CallOptions;

/// Bedrock: chat with models hosted on Amazon Bedrock
#[derive(Debug, Parser)]
#[command(name = "bedrock")]
#[command(about = "Chat with models hosted on Amazon Bedrock", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file to use instead of the default location
    #[arg(long, global = true, env = "BEDROCK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run a single query
    Query(QueryArgs),

    /// Show the effective configuration
    Config {
        /// Print the configuration as JSON
        #[arg(long)]
        show: bool,
    },

    /// Show version information
    Version,
}

/// Arguments of the `query` command
#[derive(Debug, clap::Args)]
pub struct QueryArgs {
    /// The prompt to send
    pub prompt: String,

    /// Model id, e.g. anthropic.claude-3-haiku-20240307-v1:0
    #[arg(short, long)]
    pub model: Option<String>,

    /// System prompt
    #[arg(short, long)]
    pub system: Option<String>,

    /// Image to attach to the prompt
    #[arg(long)]
    pub image: Option<PathBuf>,

    #[arg(long)]
    pub temperature: Option<f64>,

    #[arg(long)]
    pub top_p: Option<f64>,

    #[arg(long)]
    pub top_k: Option<u32>,

    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Stop sequence (repeatable)
    #[arg(long = "stop")]
    pub stop: Vec<String>,

    /// Number of candidates to generate
    #[arg(long)]
    pub candidates: Option<u32>,

    /// Print the full response as JSON
    #[arg(long)]
    pub json: bool,
}

impl QueryArgs {
    /// Call options from the sampling flags
    #[must_use]
    pub fn call_options(&self) -> CallOptions {
        CallOptions {
            model: self.model.clone(),
            temperature: self.temperature,
            top_p: self.top_p,
            top_k: self.top_k,
            max_tokens: self.max_tokens,
            stop_words: (!self.stop.is_empty()).then(|| self.stop.clone()),
            candidate_count: self.candidates,
            repetition_penalty: None,
        }
    }
}

/// Guess an image MIME type from the file extension
#[must_use]
pub fn image_mime_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

impl Cli {
    /// Parse CLI arguments from environment
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
