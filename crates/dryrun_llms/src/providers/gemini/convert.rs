//! Conversion between unified types and Gemini types

use serde_json::json;

use super::types::{GeminiContent, GeminiPart, GeminiRequest, GeminiResponse, GenerationConfig};
use crate::error::{Error, Result};
use crate::types::{
    FinishReason, FinishReasonKind, GenerateRequest, GenerateResponse, Message, Role, Usage,
};

/// Convert unified request to Gemini request. System messages become the
/// `systemInstruction`; assistant turns use Gemini's `model` role.
pub fn to_gemini_request(req: &GenerateRequest) -> GeminiRequest {
    let system_text: Vec<&str> = req
        .messages
        .iter()
        .filter(|m| m.role == Role::System)
        .map(|m| m.content.as_str())
        .collect();

    let system_instruction = if system_text.is_empty() {
        None
    } else {
        Some(GeminiContent {
            role: None,
            parts: vec![text_part(system_text.join("\n\n"))],
        })
    };

    let contents = req
        .messages
        .iter()
        .filter(|m| m.role != Role::System)
        .map(to_gemini_content)
        .collect();

    let generation_config = GenerationConfig {
        temperature: req.options.temperature,
        top_p: req.options.top_p,
        max_output_tokens: req.options.max_tokens,
        stop_sequences: req.options.stop_sequences.clone(),
    };

    GeminiRequest {
        contents,
        system_instruction,
        generation_config: if generation_config.is_empty() {
            None
        } else {
            Some(generation_config)
        },
    }
}

fn to_gemini_content(msg: &Message) -> GeminiContent {
    let role = match msg.role {
        Role::Assistant => "model",
        Role::User | Role::System => "user",
    };
    GeminiContent {
        role: Some(role.to_string()),
        parts: vec![text_part(msg.content.clone())],
    }
}

fn text_part(text: String) -> GeminiPart {
    GeminiPart { text: Some(text) }
}

/// Convert Gemini response to unified response
pub fn from_gemini_response(resp: GeminiResponse) -> Result<GenerateResponse> {
    let Some(candidate) = resp.candidates.first() else {
        let reason = resp
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.clone());
        return Err(match reason {
            Some(reason) => Error::provider_error(format!("Gemini blocked the prompt: {reason}")),
            None => Error::invalid_response("No candidates in Gemini response"),
        });
    };

    let text = candidate.text();
    if text.is_empty() {
        return Err(Error::invalid_response(format!(
            "No content in Gemini response (finish reason: {})",
            candidate.finish_reason.as_deref().unwrap_or("unknown")
        )));
    }

    let usage = resp
        .usage_metadata
        .as_ref()
        .map(to_usage)
        .unwrap_or_default();

    Ok(GenerateResponse {
        text,
        usage,
        finish_reason: parse_finish_reason(&candidate.finish_reason),
        metadata: Some(json!({ "model_version": resp.model_version })),
    })
}

pub fn to_usage(usage: &super::types::GeminiUsage) -> Usage {
    Usage {
        prompt_tokens: usage.prompt_token_count,
        completion_tokens: usage.candidates_token_count,
        total_tokens: usage
            .total_token_count
            .max(usage.prompt_token_count + usage.candidates_token_count),
    }
}

/// Parse Gemini finish reason to unified finish reason
pub fn parse_finish_reason(reason: &Option<String>) -> FinishReason {
    match reason.as_deref() {
        Some("STOP") => FinishReason::with_raw(FinishReasonKind::Stop, "STOP"),
        Some("MAX_TOKENS") => FinishReason::with_raw(FinishReasonKind::Length, "MAX_TOKENS"),
        Some(raw @ ("SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT" | "SPII")) => {
            FinishReason::with_raw(FinishReasonKind::ContentFilter, raw)
        }
        Some(raw) => FinishReason::with_raw(FinishReasonKind::Other, raw),
        None => FinishReason::other(),
    }
}
