use serde::{Deserialize, Serialize};

use crate::error::{DryRunError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputField {
    Code,
    TestCase,
}

impl InputField {
    pub fn label(&self) -> &'static str {
        match self {
            InputField::Code => "the code to analyze",
            InputField::TestCase => "a test case",
        }
    }
}

/// One submission: source code plus the test scenario to walk it through.
///
/// Both fields are checked on construction, so a value of this type is always
/// safe to send to a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    code: String,
    test_case: String,
}

impl AnalysisRequest {
    pub fn new(code: impl Into<String>, test_case: impl Into<String>) -> Result<Self> {
        let code = code.into();
        let test_case = test_case.into();

        let mut missing = Vec::new();
        if code.trim().is_empty() {
            missing.push(InputField::Code);
        }
        if test_case.trim().is_empty() {
            missing.push(InputField::TestCase);
        }
        if !missing.is_empty() {
            return Err(DryRunError::InputValidation(missing));
        }

        Ok(Self { code, test_case })
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn test_case(&self) -> &str {
        &self.test_case
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl TokenUsage {
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Unprocessed model reply plus where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub raw_text: String,
    pub provider: String,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
}

impl AnalysisResponse {
    pub fn new(
        raw_text: impl Into<String>,
        provider: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            raw_text: raw_text.into(),
            provider: provider.into(),
            model: model.into(),
            usage: None,
        }
    }

    pub fn with_usage(mut self, usage: TokenUsage) -> Self {
        self.usage = Some(usage);
        self
    }
}
