//! Command dispatch.

pub mod analyze;
pub mod config;
pub mod extract;
pub mod input;
pub mod prompt;
pub mod providers;
pub mod report;
pub mod tui;

use anyhow::Result;
use dryrun_observability::{init, ObservabilityConfig};

use crate::cli::{Cli, Command};
use crate::output;

pub async fn handle(cli: Cli) -> Result<()> {
    // The TUI routes logs to its own traces screen.
    if !matches!(cli.command, Command::Tui { .. }) {
        init_console_logging(cli.verbose);
    }
    match cli.command {
        Command::Tui {
            provider,
            model,
            theme,
        } => tui::handle(provider, model, theme).await,
        Command::Analyze {
            input,
            provider,
            model,
            export,
            no_stream,
            timeout,
            retries,
        } => {
            let options = analyze::AnalyzeOptions {
                provider,
                model,
                export,
                no_stream,
                timeout,
                retries,
            };
            analyze::handle(input, options).await
        }
        Command::Prompt { input } => prompt::handle(input),
        Command::Extract { file } => extract::handle(&file),
        Command::Providers { action } => providers::handle(action).await,
        Command::Config { action } => config::handle(action).await,
    }
}

/// Console tracing for one-shot commands: warnings by default, debug traces with `-v`.
fn init_console_logging(verbose: bool) {
    let mut config = ObservabilityConfig::from_env().with_console(true);
    if verbose {
        config = config.with_log_level("info,dryrun.trace=debug");
    } else if config.log_level.is_none() {
        config = config.with_log_level("warn");
    }
    if let Err(e) = init(config) {
        output::warning(&format!("Observability init failed (continuing): {}", e));
    }
}
