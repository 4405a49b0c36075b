use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::summary::SummaryCounts;

/// Line the model is asked to print right before the summary object.
pub const SUMMARY_DELIMITER: &str = "SUMMARY_JSON:";

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ExtractionError {
    #[error("no summary block found in the response")]
    NoSummaryBlock,

    #[error("closing brace appears before the last opening brace")]
    ClosingBeforeOpening,

    #[error("summary block is not valid JSON: {0}")]
    Decode(String),
}

/// Narrative and summary split out of one model reply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub narrative: String,
    pub summary: Option<SummaryCounts>,
    /// Exact text that was parsed as the summary, when one was found.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary_block: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extraction_error: Option<ExtractionError>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl AnalysisResult {
    fn unextracted(raw_text: &str, error: ExtractionError) -> Self {
        Self {
            narrative: raw_text.to_string(),
            summary: None,
            summary_block: None,
            extraction_error: Some(error),
            warnings: Vec::new(),
        }
    }

    fn extracted(narrative: &str, block: &str, object: &serde_json::Map<String, Value>) -> Self {
        let (summary, warnings) = SummaryCounts::from_object(object);
        Self {
            narrative: narrative.to_string(),
            summary: Some(summary),
            summary_block: Some(block.to_string()),
            extraction_error: None,
            warnings,
        }
    }

    pub fn has_summary(&self) -> bool {
        self.summary.is_some()
    }
}

/// Splits a model reply into narrative text and summary counts.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseExtractor;

impl ResponseExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Never fails: anything that cannot be read as a summary leaves the whole
    /// reply as narrative with `summary` set to `None`.
    pub fn extract(&self, raw_text: &str) -> AnalysisResult {
        let delimiter_at = raw_text.rfind(SUMMARY_DELIMITER);
        if let Some(result) = delimiter_at.and_then(|at| extract_delimited(raw_text, at)) {
            return result;
        }
        extract_trailing(raw_text, delimiter_at)
    }
}

fn extract_delimited(raw_text: &str, delimiter_at: usize) -> Option<AnalysisResult> {
    let section = &raw_text[delimiter_at + SUMMARY_DELIMITER.len()..];
    let (start, end) = balanced_object(section)?;
    let block = &section[start..=end];

    match serde_json::from_str::<Value>(block) {
        Ok(Value::Object(object)) => Some(AnalysisResult::extracted(
            &raw_text[..delimiter_at],
            block,
            &object,
        )),
        _ => None,
    }
}

/// Last `{` to last `}`. A summary found after the delimiter still cuts the
/// narrative at the delimiter.
fn extract_trailing(raw_text: &str, delimiter_at: Option<usize>) -> AnalysisResult {
    let (Some(start), Some(end)) = (raw_text.rfind('{'), raw_text.rfind('}')) else {
        return AnalysisResult::unextracted(raw_text, ExtractionError::NoSummaryBlock);
    };
    if end < start {
        return AnalysisResult::unextracted(raw_text, ExtractionError::ClosingBeforeOpening);
    }

    let block = &raw_text[start..=end];
    match serde_json::from_str::<Value>(block) {
        Ok(Value::Object(object)) => {
            let narrative_end = match delimiter_at {
                Some(at) if at + SUMMARY_DELIMITER.len() <= start => at,
                _ => start,
            };
            AnalysisResult::extracted(&raw_text[..narrative_end], block, &object)
        }
        Ok(_) => AnalysisResult::unextracted(
            raw_text,
            ExtractionError::Decode("summary block is not a JSON object".to_string()),
        ),
        Err(e) => AnalysisResult::unextracted(raw_text, ExtractionError::Decode(e.to_string())),
    }
}

/// Byte range of the first balanced `{...}` in `text`, skipping braces that
/// appear inside JSON string literals.
fn balanced_object(text: &str) -> Option<(usize, usize)> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some((start, start + offset));
                }
            }
            _ => {}
        }
    }
    None
}
