//! OpenAI-compatible streaming support
//!
//! - `data: {"choices":[{"delta":{"content":"..."}}]}` for text deltas
//! - `data: [DONE]` to signal stream end

use reqwest_eventsource::EventSource;

use super::convert::parse_finish_reason;
use super::types::OpenAiStreamChunk;
use crate::error::Error;
use crate::providers::sse;
use crate::types::{GenerateStream, StreamEvent, Usage};

pub fn create_stream(event_source: EventSource) -> GenerateStream {
    sse::drive("openai", event_source, Some("[DONE]"), |data| {
        let chunk: OpenAiStreamChunk = serde_json::from_str(data)
            .map_err(|e| Error::stream_error(format!("Failed to parse chunk: {e}")))?;
        Ok(process_chunk(chunk))
    })
}

fn process_chunk(chunk: OpenAiStreamChunk) -> Vec<StreamEvent> {
    let mut events = Vec::new();

    for choice in &chunk.choices {
        if let Some(content) = choice.delta.content.as_ref().filter(|c| !c.is_empty()) {
            events.push(StreamEvent::text_delta(content.clone()));
        }

        if choice.finish_reason.is_some() {
            let usage = chunk
                .usage
                .as_ref()
                .map(|u| Usage::new(u.prompt_tokens, u.completion_tokens))
                .unwrap_or_default();
            events.push(StreamEvent::finish(
                usage,
                parse_finish_reason(&choice.finish_reason),
            ));
        }
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FinishReasonKind;

    fn chunk(json: &str) -> OpenAiStreamChunk {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_process_text_delta() {
        let events = process_chunk(chunk(r#"{"choices":[{"index":0,"delta":{"content":"Hello"}}]}"#));
        assert_eq!(events, vec![StreamEvent::text_delta("Hello")]);
    }

    #[test]
    fn test_process_role_only_delta() {
        let events = process_chunk(chunk(
            r#"{"choices":[{"index":0,"delta":{"role":"assistant","content":""}}]}"#,
        ));
        assert!(events.is_empty());
    }

    #[test]
    fn test_process_finish() {
        let events = process_chunk(chunk(
            r#"{"choices":[{"index":0,"delta":{},"finish_reason":"stop"}],
                "usage":{"prompt_tokens":10,"completion_tokens":20,"total_tokens":30}}"#,
        ));
        assert_eq!(events.len(), 1);
        if let StreamEvent::Finish { usage, reason } = &events[0] {
            assert_eq!(usage.total_tokens, 30);
            assert_eq!(reason.unified, FinishReasonKind::Stop);
        } else {
            panic!("Expected Finish");
        }
    }
}
