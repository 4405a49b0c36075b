pub mod chart;
pub mod error;
pub mod event;
pub mod export;
pub mod extract;
pub mod prompt;
pub mod request;
pub mod session;
pub mod summary;

pub use chart::{ChartBar, ChartSpec, SummaryChartBuilder};
pub use error::{DryRunError, Result};
pub use event::SessionEvent;
pub use export::{default_export_path, write_report};
pub use extract::{AnalysisResult, ExtractionError, ResponseExtractor, SUMMARY_DELIMITER};
pub use prompt::PromptBuilder;
pub use request::{AnalysisRequest, AnalysisResponse, InputField, TokenUsage};
pub use session::{AnalysisRecord, SessionId, SessionState, SessionStatus};
pub use summary::{SummaryCounts, SummaryField};
