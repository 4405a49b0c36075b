use serde::{Deserialize, Serialize};

use crate::session::{AnalysisRecord, SessionStatus};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    AnalysisStart { provider: String, model: String },

    Status { message: String },

    TextDelta { text: String },

    Retrying {
        attempt: u32,
        delay_ms: u64,
        reason: String,
    },

    AnalysisDone { record: Box<AnalysisRecord> },

    Error { error: String },

    AnalysisEnd { status: SessionStatus },
}

impl SessionEvent {
    pub fn analysis_start(provider: impl Into<String>, model: impl Into<String>) -> Self {
        SessionEvent::AnalysisStart {
            provider: provider.into(),
            model: model.into(),
        }
    }

    pub fn status(message: impl Into<String>) -> Self {
        SessionEvent::Status {
            message: message.into(),
        }
    }

    pub fn text_delta(text: impl Into<String>) -> Self {
        SessionEvent::TextDelta { text: text.into() }
    }

    pub fn retrying(attempt: u32, delay_ms: u64, reason: impl Into<String>) -> Self {
        SessionEvent::Retrying {
            attempt,
            delay_ms,
            reason: reason.into(),
        }
    }

    pub fn analysis_done(record: AnalysisRecord) -> Self {
        SessionEvent::AnalysisDone {
            record: Box::new(record),
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        SessionEvent::Error {
            error: error.into(),
        }
    }

    pub fn analysis_end(status: SessionStatus) -> Self {
        SessionEvent::AnalysisEnd { status }
    }
}
