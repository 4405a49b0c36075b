use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::chart::{ChartSpec, SummaryChartBuilder};
use crate::extract::AnalysisResult;
use crate::request::{AnalysisRequest, AnalysisResponse};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Idle,
    Running,
    Completed,
    Failed {
        error: String,
    },
    Cancelled,
}

/// A finished analysis: what was asked, what came back, and how it was read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub request: AnalysisRequest,
    pub response: AnalysisResponse,
    pub result: AnalysisResult,
    pub completed_at: DateTime<Utc>,
}

impl AnalysisRecord {
    pub fn new(request: AnalysisRequest, response: AnalysisResponse, result: AnalysisResult) -> Self {
        Self {
            request,
            response,
            result,
            completed_at: Utc::now(),
        }
    }

    /// Chart for the summary, or `None` when extraction failed.
    pub fn chart(&self) -> Option<ChartSpec> {
        self.result
            .summary
            .as_ref()
            .map(|summary| SummaryChartBuilder::new().build(summary))
    }

    pub fn raw_text(&self) -> &str {
        &self.response.raw_text
    }
}

/// State for one interactive session. Holds at most one finished analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub id: SessionId,
    pub status: SessionStatus,
    latest: Option<AnalysisRecord>,
    pub created_at: DateTime<Utc>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            id: SessionId::new(),
            status: SessionStatus::Idle,
            latest: None,
            created_at: Utc::now(),
        }
    }

    pub fn begin(&mut self) {
        self.status = SessionStatus::Running;
    }

    /// Replaces the previous analysis.
    pub fn record(&mut self, record: AnalysisRecord) {
        self.latest = Some(record);
        self.status = SessionStatus::Completed;
    }

    /// Marks the in-flight analysis as failed. The previous record is kept.
    pub fn fail(&mut self, error: impl Into<String>) {
        self.status = SessionStatus::Failed {
            error: error.into(),
        };
    }

    pub fn cancel(&mut self) {
        self.status = SessionStatus::Cancelled;
    }

    pub fn latest(&self) -> Option<&AnalysisRecord> {
        self.latest.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.status, SessionStatus::Running)
    }

    /// Starts over with a fresh id and no stored analysis.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::ResponseExtractor;

    fn record(raw: &str) -> AnalysisRecord {
        let request = AnalysisRequest::new("x = 1", "none").unwrap();
        let response = AnalysisResponse::new(raw, "gemini", "gemini-2.0-flash");
        let result = ResponseExtractor::new().extract(raw);
        AnalysisRecord::new(request, response, result)
    }

    #[test]
    fn test_session_id_new() {
        let id = SessionId::new();
        assert_eq!(id.as_str().len(), 36);
        assert_eq!(format!("{}", id), id.as_str());
    }

    #[test]
    fn test_session_status_serialization() {
        let json = serde_json::to_string(&SessionStatus::Idle).unwrap();
        assert_eq!(json, r#"{"type":"idle"}"#);

        let status = SessionStatus::Failed {
            error: "quota exceeded".to_string(),
        };
        let json = serde_json::to_string(&status).unwrap();
        assert!(json.contains(r#""type":"failed"#));
        assert!(json.contains("quota exceeded"));
    }

    #[test]
    fn test_new_state_is_empty() {
        let state = SessionState::new();
        assert!(state.latest().is_none());
        assert_eq!(state.status, SessionStatus::Idle);
        assert!(!state.is_busy());
    }

    #[test]
    fn test_record_overwrites_previous() {
        let mut state = SessionState::new();
        state.begin();
        assert!(state.is_busy());
        state.record(record("first {}"));
        state.record(record("second {\"execution_steps\": 2}"));

        let latest = state.latest().unwrap();
        assert_eq!(latest.raw_text(), "second {\"execution_steps\": 2}");
        assert_eq!(state.status, SessionStatus::Completed);
    }

    #[test]
    fn test_failure_keeps_previous_record() {
        let mut state = SessionState::new();
        state.record(record("ok {}"));
        state.begin();
        state.fail("network unreachable");

        assert!(matches!(state.status, SessionStatus::Failed { .. }));
        assert_eq!(state.latest().unwrap().raw_text(), "ok {}");
    }

    #[test]
    fn test_chart_only_with_summary() {
        assert!(record("no summary").chart().is_none());
        let chart = record("Step 1\n{\"execution_steps\": 1}").chart().unwrap();
        assert_eq!(chart.bars[0].value, 1);
    }

    #[test]
    fn test_reset() {
        let mut state = SessionState::new();
        let old_id = state.id.clone();
        state.record(record("{}"));
        state.reset();
        assert!(state.latest().is_none());
        assert_ne!(state.id, old_id);
    }
}
