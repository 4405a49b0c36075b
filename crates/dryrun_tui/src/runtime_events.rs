//! Map [dryrun_core::SessionEvent] to [TuiState] updates.

use dryrun_core::{SessionEvent, SessionStatus};

use crate::state::{Tab, TuiState};
use crate::utils::STREAMING_DISPLAY_CAP;

/// Apply a session event to TUI state.
/// Runtime logs go to the debug traces screen (Ctrl+D), not through here.
pub fn apply_session_event(state: &mut TuiState, event: SessionEvent) {
    state.needs_redraw = true;
    match event {
        SessionEvent::AnalysisStart { provider, model } => {
            state.is_busy = true;
            state.pending_start = false;
            state.busy_since.get_or_insert_with(std::time::Instant::now);
            state.streaming_text.clear();
            state.last_error = None;
            state.provider_label = format!("{provider} · {model}");
            state.set_status("Analyzing code…");
            state.status_permanent = true;
        }
        SessionEvent::Status { message } => {
            state.set_status(message);
        }
        SessionEvent::TextDelta { text } => {
            if state.streaming_text.len() < STREAMING_DISPLAY_CAP {
                state.streaming_text.push_str(&text);
            }
        }
        SessionEvent::Retrying {
            attempt,
            delay_ms,
            reason,
        } => {
            // The next attempt streams from the start.
            state.streaming_text.clear();
            state.set_status(format!(
                "Retrying (attempt {attempt}) in {:.1}s: {reason}",
                delay_ms as f64 / 1000.0
            ));
            state.status_permanent = true;
        }
        SessionEvent::AnalysisDone { record } => {
            let note = match &record.result.extraction_error {
                Some(err) => format!("Analysis complete · summary unavailable ({err})"),
                None => match record.response.usage.as_ref() {
                    Some(usage) if usage.total_tokens > 0 => {
                        format!("Analysis complete · {} tokens", usage.total_tokens)
                    }
                    _ => "Analysis complete".to_string(),
                },
            };
            state.latest = Some(*record);
            state.results_scroll = 0;
            state.switch_tab(Tab::Results);
            state.set_status(note);
        }
        SessionEvent::Error { error } => {
            state.set_error(error);
            if state.pending_start {
                // Rejected before the analysis started; no end event follows.
                state.end_busy();
            }
        }
        SessionEvent::AnalysisEnd { status } => {
            state.end_busy();
            if status == SessionStatus::Cancelled {
                state.set_status("Analysis cancelled");
            }
        }
    }
}
