//! Runtime defaults shared by the CLI, runtime and TUI.

/// Provider used when neither `DRYRUN_PROVIDER` nor an API key hints otherwise.
pub const PROVIDER: &str = "gemini";
/// Default Gemini model.
pub const GEMINI_MODEL: &str = "gemini-2.0-flash";
/// Default model for OpenAI-compatible endpoints.
pub const OPENAI_MODEL: &str = "gpt-4o-mini";

/// Upper bound on one remote call, in seconds.
pub const TIMEOUT_SECS: u64 = 120;
/// Retries after the first attempt on transient provider errors.
pub const MAX_RETRIES: u32 = 1;
/// Delay before the first retry; doubles per further attempt.
pub const RETRY_BACKOFF_MS: u64 = 1_000;
/// Maximum tokens requested for the narration.
pub const MAX_TOKENS: u32 = 4096;
/// Sampling temperature for the narration.
pub const TEMPERATURE: f32 = 0.2;

/// File name offered when exporting the raw model response.
pub const EXPORT_FILE_NAME: &str = "code_analysis_report.txt";
