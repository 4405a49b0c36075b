//! `dryrun tui`: run the interactive TUI with runtime integration.

use std::sync::Arc;

use anyhow::Result;
use dryrun_core::SessionEvent;
use dryrun_observability::{init, ObservabilityConfig};
use dryrun_runtime::{Runtime, RuntimeConfig};
use dryrun_tui::{run_tui_with_runtime, AnalysisInput, Appearance};
use tokio::sync::mpsc;
use tracing::warn;

use crate::commands::analyze::runtime_config;
use crate::output;

/// Serves TUI requests until the request channel closes.
///
/// Each [AnalysisInput] carries its own cancel token, so a Ctrl+C that lands
/// before the runtime picks the input up still cancels it.
async fn run_runtime_loop<F>(
    mut make_runtime: F,
    event_tx: mpsc::Sender<SessionEvent>,
    mut request_rx: mpsc::Receiver<AnalysisInput>,
    mut new_session_rx: mpsc::Receiver<()>,
) where
    F: FnMut(mpsc::Sender<SessionEvent>) -> dryrun_runtime::Result<Runtime>,
{
    // Built on first use so a missing key is reported in the TUI, not at startup.
    let mut runtime_opt: Option<Runtime> = None;
    loop {
        tokio::select! {
            input = request_rx.recv() => {
                let Some(input) = input else { break };
                if runtime_opt.is_none() {
                    match make_runtime(event_tx.clone()) {
                        Ok(rt) => runtime_opt = Some(rt),
                        Err(e) => {
                            warn!(error = %e, "Runtime failed to start");
                            let _ = event_tx.send(SessionEvent::error(e.user_message())).await;
                            continue;
                        }
                    }
                }
                let Some(rt) = runtime_opt.as_mut() else { continue };
                if let Err(e) = rt.analyze(&input.code, &input.test_case, input.cancel).await {
                    // The runtime already reported it to the TUI.
                    warn!(error = %e, "Analysis failed");
                }
            }
            Some(()) = new_session_rx.recv() => {
                match runtime_opt.as_mut() {
                    Some(rt) => rt.new_session().await,
                    None => {
                        let _ = event_tx.send(SessionEvent::status("Started a new session")).await;
                    }
                }
            }
        }
    }

    if let Some(mut rt) = runtime_opt {
        if let Err(e) = rt.shutdown().await {
            warn!(error = %e, "Runtime shutdown failed");
        }
    }
}

pub async fn handle(
    provider: Option<String>,
    model: Option<String>,
    theme: Option<String>,
) -> Result<()> {
    let appearance = match theme.as_deref() {
        Some(t) => t
            .parse::<Appearance>()
            .map_err(|_| anyhow::anyhow!("Unknown theme '{}'. Available: dark, light", t))?,
        None => Appearance::default(),
    };
    let config = runtime_config(RuntimeConfig::from_env(), provider.as_deref(), model)?;

    // Runtime logs → TUI debug traces screen (Ctrl+D)
    let (log_tx, log_rx) = mpsc::channel::<String>(512);
    let log_sink: Arc<dyn Fn(String) + Send + Sync> = Arc::new(move |line| {
        let _ = log_tx.try_send(line);
    });

    // No console output while the TUI owns the terminal. dryrun.trace=debug puts
    // prompts and provider traces on the logs screen.
    let mut obs_config = ObservabilityConfig::from_env()
        .with_console(false)
        .with_log_sink(log_sink);
    if obs_config.log_level.is_none() {
        obs_config = obs_config.with_log_level("info,dryrun.trace=debug");
    }
    if let Err(e) = init(obs_config) {
        output::warning(&format!("Observability init failed (continuing): {}", e));
    }

    let (event_tx, event_rx) = mpsc::channel(256);
    let (request_tx, request_rx) = mpsc::channel::<AnalysisInput>(16);
    let (new_session_tx, new_session_rx) = mpsc::channel::<()>(4);

    tokio::spawn(run_runtime_loop(
        move |tx| Runtime::new(config.clone(), tx),
        event_tx,
        request_rx,
        new_session_rx,
    ));

    // The TUI loop blocks on terminal input; keep it off the async workers.
    tokio::task::spawn_blocking(move || {
        run_tui_with_runtime(
            event_rx,
            request_tx,
            Some(log_rx),
            Some(new_session_tx),
            appearance,
        )
    })
    .await??;
    Ok(())
}
