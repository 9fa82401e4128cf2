//! CLI argument definitions using Clap

use clap::{Parser, Subcommand};

/// InterviewCoach - practice interview answers out loud
#[derive(Parser, Debug)]
#[command(name = "interview-coach")]
#[command(version)]
#[command(about = "Record a mock-interview answer, get a transcript and coaching feedback")]
#[command(long_about = None)]
pub struct Cli {
    /// Coach backend base URL
    #[arg(short = 's', long, value_name = "URL", env = "COACH_SERVER_URL", global = true)]
    pub server_url: Option<String>,

    /// Answer this exact question instead of one from the list
    #[arg(short = 'q', long, value_name = "TEXT", conflicts_with_all = ["question_index", "random"])]
    pub question: Option<String>,

    /// Answer the question at this index in the fetched list
    #[arg(short = 'i', long, value_name = "N", conflicts_with = "random")]
    pub question_index: Option<usize>,

    /// Draw a random question (the default when no question is given)
    #[arg(short = 'r', long)]
    pub random: bool,

    /// Show a live face-status line while recording
    #[arg(short = 'o', long)]
    pub overlay: bool,

    /// Capture fragment interval in milliseconds
    #[arg(long, value_name = "MS")]
    pub fragment_millis: Option<u64>,

    /// Subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the available interview questions
    Questions,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// How the session's question is chosen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionChoice {
    /// Use this exact text
    Explicit(String),
    /// Pick by index from the question list
    Index(usize),
    /// Uniform random draw from the question list
    Random,
}

/// Parsed session options
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub server_url: String,
    pub question: QuestionChoice,
    pub overlay: bool,
    pub fragment_millis: u64,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &["server_url", "fragment_millis", "overlay"];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}

impl Cli {
    /// Resolve the question choice from the parsed flags
    pub fn question_choice(&self) -> QuestionChoice {
        if let Some(text) = &self.question {
            QuestionChoice::Explicit(text.clone())
        } else if let Some(index) = self.question_index {
            QuestionChoice::Index(index)
        } else {
            QuestionChoice::Random
        }
    }
}
