//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use dryrun_constant::{app, defaults};

#[derive(Parser)]
#[command(
    name = app::NAME,
    version = app::VERSION,
    about = app::DESCRIPTION,
    after_help = app::TAGLINE,
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format: text (human-readable) or json (machine-readable)
    #[arg(short, long, global = true, default_value = "text")]
    pub output: OutputFormat,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    /// Colored terminal output for humans
    #[default]
    Text,
    /// Structured JSON for scripts
    Json,
}

/// Where the code and the test case come from. `-` as a file reads stdin.
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// Code to analyze, inline
    #[arg(long, conflicts_with = "code_file")]
    pub code: Option<String>,
    /// File holding the code to analyze
    #[arg(short = 'f', long)]
    pub code_file: Option<PathBuf>,
    /// Test case (input and expected behavior), inline
    #[arg(short, long, conflicts_with = "test_file")]
    pub test: Option<String>,
    /// File holding the test case
    #[arg(long)]
    pub test_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the interactive TUI
    Tui {
        /// Provider to use (gemini, openai). Uses DRYRUN_PROVIDER env if not set.
        #[arg(long)]
        provider: Option<String>,
        /// Model to use. Uses DRYRUN_MODEL env if not set.
        #[arg(long)]
        model: Option<String>,
        /// Color theme: dark or light
        #[arg(long)]
        theme: Option<String>,
    },
    /// Analyze code against a test case and print the narrated dry run
    Analyze {
        #[command(flatten)]
        input: InputArgs,
        /// Provider to use (gemini, openai)
        #[arg(long)]
        provider: Option<String>,
        /// Model to use
        #[arg(long)]
        model: Option<String>,
        /// Save the raw response as a text report
        #[arg(long, num_args = 0..=1, default_missing_value = defaults::EXPORT_FILE_NAME)]
        export: Option<PathBuf>,
        /// Wait for the full reply instead of streaming it
        #[arg(long)]
        no_stream: bool,
        /// Per-attempt timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
        /// Retries after the first attempt on transient failures
        #[arg(long)]
        retries: Option<u32>,
    },
    /// Print the prompt that would be sent for an input, without calling a model
    Prompt {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Split a saved model response into narrative and summary
    Extract {
        /// Response file (`-` for stdin)
        file: PathBuf,
    },
    /// Inspect and test LLM providers
    Providers {
        #[command(subcommand)]
        action: ProvidersAction,
    },
    /// Configure dryrun settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ProvidersAction {
    /// List providers with key status and default model
    List,
    /// Check that a provider is reachable
    Test {
        /// Provider id (gemini, openai)
        provider: String,
    },
    /// List models a provider offers
    Models {
        /// Provider id (gemini, openai)
        provider: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Store an API key in ~/.dryrun/env
    Api {
        /// Provider to configure; prompts when omitted
        provider: Option<String>,
    },
}
