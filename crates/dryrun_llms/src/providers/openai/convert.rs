//! Conversion between unified types and OpenAI chat completions types

use serde_json::json;

use super::types::{OpenAiMessage, OpenAiRequest, OpenAiResponse};
use crate::error::{Error, Result};
use crate::types::{
    FinishReason, FinishReasonKind, GenerateRequest, GenerateResponse, Role, Usage,
};

pub fn to_openai_request(req: &GenerateRequest, stream: bool) -> OpenAiRequest {
    let messages = req
        .messages
        .iter()
        .map(|msg| OpenAiMessage {
            role: match msg.role {
                Role::System => "system",
                Role::User => "user",
                Role::Assistant => "assistant",
            }
            .to_string(),
            content: Some(msg.content.clone()),
        })
        .collect();

    OpenAiRequest {
        model: req.model.clone(),
        messages,
        temperature: req.options.temperature,
        top_p: req.options.top_p,
        max_tokens: req.options.max_tokens,
        stream: if stream { Some(true) } else { None },
        stop: req.options.stop_sequences.clone(),
    }
}

pub fn from_openai_response(resp: OpenAiResponse) -> Result<GenerateResponse> {
    let choice = resp
        .choices
        .first()
        .ok_or_else(|| Error::invalid_response("No choices in chat completion response"))?;

    let text = choice.message.content.clone().unwrap_or_default();
    if text.is_empty() {
        return Err(Error::invalid_response(
            "No content in chat completion response",
        ));
    }

    let usage = resp
        .usage
        .as_ref()
        .map(|u| Usage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        })
        .unwrap_or_default();

    Ok(GenerateResponse {
        text,
        usage,
        finish_reason: parse_finish_reason(&choice.finish_reason),
        metadata: Some(json!({
            "id": resp.id,
            "model": resp.model,
        })),
    })
}

pub fn parse_finish_reason(reason: &Option<String>) -> FinishReason {
    match reason.as_deref() {
        Some("stop") => FinishReason::with_raw(FinishReasonKind::Stop, "stop"),
        Some("length") => FinishReason::with_raw(FinishReasonKind::Length, "length"),
        Some("content_filter") => {
            FinishReason::with_raw(FinishReasonKind::ContentFilter, "content_filter")
        }
        Some(raw) => FinishReason::with_raw(FinishReasonKind::Other, raw),
        None => FinishReason::other(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Message;

    #[test]
    fn test_request_shape() {
        let req = GenerateRequest::new("gpt-4o-mini", vec![Message::user("x = 1")])
            .with_temperature(0.2);
        let body = serde_json::to_value(to_openai_request(&req, true)).unwrap();
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "x = 1");
        assert_eq!(body["stream"], true);
        assert!(body.get("max_tokens").is_none());
    }

    #[test]
    fn test_response() {
        let resp: OpenAiResponse = serde_json::from_str(
            r#"{"id":"c1","model":"gpt-4o-mini","choices":[{"index":0,"message":{"role":"assistant","content":"Step 1"},"finish_reason":"length"}],
                "usage":{"prompt_tokens":5,"completion_tokens":7,"total_tokens":12}}"#,
        )
        .unwrap();
        let out = from_openai_response(resp).unwrap();
        assert_eq!(out.text, "Step 1");
        assert_eq!(out.usage.total_tokens, 12);
        assert_eq!(out.finish_reason.unified, FinishReasonKind::Length);
    }

    #[test]
    fn test_empty_choices() {
        let resp: OpenAiResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(
            from_openai_response(resp),
            Err(Error::InvalidResponse(_))
        ));
    }
}
