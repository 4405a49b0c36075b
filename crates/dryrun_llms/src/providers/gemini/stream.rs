//! Gemini streaming support
//!
//! `streamGenerateContent?alt=sse` sends one `GenerateContentResponse` per
//! `data:` line. The last chunk carries `finishReason` and `usageMetadata`;
//! the stream ends when the server closes the connection.

use reqwest_eventsource::EventSource;

use super::convert::{parse_finish_reason, to_usage};
use super::types::GeminiResponse;
use crate::error::{Error, Result};
use crate::providers::sse;
use crate::types::{GenerateStream, StreamEvent};

pub fn create_stream(event_source: EventSource) -> GenerateStream {
    sse::drive("gemini", event_source, None, |data| {
        let chunk: GeminiResponse = serde_json::from_str(data)
            .map_err(|e| Error::stream_error(format!("Failed to parse Gemini chunk: {e}")))?;
        process_chunk(chunk)
    })
}

/// Process a single Gemini chunk into unified StreamEvent(s)
fn process_chunk(chunk: GeminiResponse) -> Result<Vec<StreamEvent>> {
    let mut events = Vec::new();

    let Some(candidate) = chunk.candidates.first() else {
        if let Some(reason) = chunk.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(Error::provider_error(format!(
                "Gemini blocked the prompt: {reason}"
            )));
        }
        return Ok(events);
    };

    let text = candidate.text();
    if !text.is_empty() {
        events.push(StreamEvent::text_delta(text));
    }

    if candidate.finish_reason.is_some() {
        let usage = chunk
            .usage_metadata
            .as_ref()
            .map(to_usage)
            .unwrap_or_default();
        events.push(StreamEvent::finish(
            usage,
            parse_finish_reason(&candidate.finish_reason),
        ));
    }

    Ok(events)
}
