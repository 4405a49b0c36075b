//! `dryrun analyze`: one analysis from the command line.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Result};
use dryrun_core::{write_report, AnalysisRecord, SessionEvent};
use dryrun_runtime::{LlmProvider, Runtime, RuntimeConfig};
use indicatif::ProgressBar;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::cli::InputArgs;
use crate::commands::{input, report};
use crate::output;

#[derive(Debug, Default)]
pub struct AnalyzeOptions {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub export: Option<PathBuf>,
    pub no_stream: bool,
    pub timeout: Option<u64>,
    pub retries: Option<u32>,
}

/// Environment config with command-line overrides applied.
pub fn runtime_config(
    base: RuntimeConfig,
    provider: Option<&str>,
    model: Option<String>,
) -> Result<RuntimeConfig> {
    let mut config = base;
    if let Some(p) = provider {
        let provider = p.parse::<LlmProvider>().map_err(|_| {
            anyhow!(
                "Unknown provider '{}'. Available: {}",
                p,
                LlmProvider::ALL.map(|p| p.as_str()).join(", ")
            )
        })?;
        config = config.with_provider(provider);
    }
    if let Some(m) = model {
        config = config.with_model(m);
    }
    Ok(config)
}

fn apply_options(mut config: RuntimeConfig, options: &AnalyzeOptions) -> RuntimeConfig {
    if options.no_stream {
        config = config.with_stream(false);
    }
    if let Some(secs) = options.timeout {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    if let Some(n) = options.retries {
        config = config.with_max_retries(n);
    }
    config
}

pub async fn handle(args: InputArgs, options: AnalyzeOptions) -> Result<()> {
    let (code, test_case) = input::read_inputs(&args)?;
    let config = runtime_config(
        RuntimeConfig::from_env(),
        options.provider.as_deref(),
        options.model.clone(),
    )?;
    let config = apply_options(config, &options);

    let (event_tx, event_rx) = mpsc::channel(256);
    let mut runtime = Runtime::new(config.clone(), event_tx)
        .map_err(|e| anyhow!(e.user_message()))?;

    let spinner = output::spinner(&format!(
        "Analyzing with {} · {}",
        config.provider, config.model
    ));
    let progress = tokio::spawn(track_progress(event_rx, spinner.clone()));

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    let outcome = runtime.analyze(&code, &test_case, cancel).await;
    // Dropping the runtime closes the event channel and ends the progress task.
    drop(runtime);
    let _ = progress.await;

    let record = match outcome {
        Ok(record) => record,
        Err(e) => {
            output::spinner_error(&spinner, "Analysis failed");
            return Err(anyhow!(e.user_message()));
        }
    };
    output::spinner_success(&spinner, &completion_note(&record));

    if output::is_json() {
        output::data("analysis", &record);
    } else {
        println!();
        report::print_result(&record.result);
    }

    if let Some(path) = options.export.as_deref() {
        let bytes = write_report(path, record.raw_text())?;
        output::success(&format!("Exported {} bytes to {}", bytes, path.display()));
    }
    Ok(())
}

/// Mirrors runtime events onto the spinner until the channel closes.
async fn track_progress(mut event_rx: mpsc::Receiver<SessionEvent>, spinner: ProgressBar) {
    let mut received = 0usize;
    while let Some(event) = event_rx.recv().await {
        match event {
            SessionEvent::TextDelta { text } => {
                received += text.chars().count();
                spinner.set_message(format!("Receiving narration… {received} chars"));
            }
            SessionEvent::Retrying {
                attempt,
                delay_ms,
                reason,
            } => {
                received = 0;
                spinner.set_message(format!(
                    "Retrying (attempt {attempt}) in {:.1}s: {reason}",
                    delay_ms as f64 / 1000.0
                ));
            }
            SessionEvent::Status { message } => spinner.set_message(message),
            _ => {}
        }
    }
}

fn completion_note(record: &AnalysisRecord) -> String {
    let mut note = format!(
        "Analysis complete · {} · {}",
        record.response.provider, record.response.model
    );
    if let Some(usage) = &record.response.usage {
        note.push_str(&format!(" · {} tokens", usage.total_tokens));
    }
    note
}
