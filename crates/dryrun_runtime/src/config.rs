//! Runtime configuration for dryrun

use std::str::FromStr;
use std::time::Duration;

use dryrun_constant::defaults;
use tracing::warn;

/// LLM provider selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    Gemini,
    OpenAI,
}

impl LlmProvider {
    pub const ALL: [LlmProvider; 2] = [LlmProvider::Gemini, LlmProvider::OpenAI];

    pub fn as_str(&self) -> &'static str {
        match self {
            LlmProvider::Gemini => "gemini",
            LlmProvider::OpenAI => "openai",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            LlmProvider::Gemini => defaults::GEMINI_MODEL,
            LlmProvider::OpenAI => defaults::OPENAI_MODEL,
        }
    }

    /// Environment variables that can hold this provider's key, in lookup order.
    pub fn api_key_vars(&self) -> &'static [&'static str] {
        match self {
            LlmProvider::Gemini => &["GEMINI_API_KEY", "GOOGLE_API_KEY"],
            LlmProvider::OpenAI => &["OPENAI_API_KEY"],
        }
    }
}

impl FromStr for LlmProvider {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Ok(LlmProvider::Gemini),
            "openai" => Ok(LlmProvider::OpenAI),
            _ => Err(()),
        }
    }
}

impl Default for LlmProvider {
    fn default() -> Self {
        defaults::PROVIDER.parse().unwrap_or(LlmProvider::Gemini)
    }
}

impl std::fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub provider: LlmProvider,
    pub model: String,
    /// Upper bound on a single remote call attempt
    pub timeout: Duration,
    /// Extra attempts after the first on retryable failures
    pub max_retries: u32,
    /// Delay before the first retry; doubles for each further retry
    pub retry_backoff: Duration,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Stream the narration instead of waiting for the full reply
    pub stream: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RuntimeConfig {
    pub fn new() -> Self {
        let provider = LlmProvider::default();
        Self {
            provider,
            model: provider.default_model().to_string(),
            timeout: Duration::from_secs(defaults::TIMEOUT_SECS),
            max_retries: defaults::MAX_RETRIES,
            retry_backoff: Duration::from_millis(defaults::RETRY_BACKOFF_MS),
            max_tokens: defaults::MAX_TOKENS,
            temperature: defaults::TEMPERATURE,
            stream: true,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Switching provider also switches the model if it was the old provider's default.
    pub fn with_provider(mut self, provider: LlmProvider) -> Self {
        if self.model == self.provider.default_model() {
            self.model = provider.default_model().to_string();
        }
        self.provider = provider;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }

    /// Delay before retry number `retry` (1-based).
    pub fn retry_delay(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        self.retry_backoff.saturating_mul(factor)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Reads `DRYRUN_*` settings through `var`. Unparseable values keep the
    /// default and are logged as warnings.
    /// Without `DRYRUN_PROVIDER` the provider is inferred from which API key is set.
    pub fn from_vars<F>(var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let (config, rejected) = Self::parse_vars(var);
        for (name, value) in rejected {
            warn!(var = name, value = %value, "Ignoring invalid setting");
        }
        config
    }

    fn parse_vars<F>(var: F) -> (Self, Vec<(&'static str, String)>)
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut env = EnvReader::new(var);
        let mut config = Self::new();

        let provider = match env.get("DRYRUN_PROVIDER") {
            Some(_) => env.parse::<LlmProvider>("DRYRUN_PROVIDER"),
            None => LlmProvider::ALL
                .into_iter()
                .find(|p| p.api_key_vars().iter().any(|k| env.get(k).is_some())),
        };
        if let Some(provider) = provider {
            config = config.with_provider(provider);
        }

        if let Some(model) = env.get("DRYRUN_MODEL") {
            config.model = model;
        }
        if let Some(secs) = env.parse::<u64>("DRYRUN_TIMEOUT_SECS") {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(n) = env.parse::<u32>("DRYRUN_MAX_RETRIES") {
            config.max_retries = n;
        }
        if let Some(ms) = env.parse::<u64>("DRYRUN_RETRY_BACKOFF_MS") {
            config.retry_backoff = Duration::from_millis(ms);
        }
        if let Some(n) = env.parse::<u32>("DRYRUN_MAX_TOKENS") {
            config.max_tokens = n;
        }
        if let Some(t) = env.parse::<f32>("DRYRUN_TEMPERATURE") {
            config.temperature = t;
        }
        if let Some(flag) = env.parse_with("DRYRUN_STREAM", parse_bool) {
            config.stream = flag;
        }

        (config, env.rejected)
    }
}

/// Blank values count as unset. Values that fail to parse are collected.
struct EnvReader<F> {
    var: F,
    rejected: Vec<(&'static str, String)>,
}

impl<F> EnvReader<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn new(var: F) -> Self {
        Self {
            var,
            rejected: Vec::new(),
        }
    }

    fn get(&self, name: &str) -> Option<String> {
        (self.var)(name).filter(|v| !v.trim().is_empty())
    }

    fn parse<T: FromStr>(&mut self, name: &'static str) -> Option<T> {
        self.parse_with(name, |v| v.trim().parse().ok())
    }

    fn parse_with<T>(&mut self, name: &'static str, parse: impl Fn(&str) -> Option<T>) -> Option<T> {
        let value = self.get(name)?;
        let parsed = parse(&value);
        if parsed.is_none() {
            self.rejected.push((name, value));
        }
        parsed
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_llm_provider_as_str() {
        assert_eq!(LlmProvider::Gemini.as_str(), "gemini");
        assert_eq!(LlmProvider::OpenAI.as_str(), "openai");
    }

    #[test]
    fn test_llm_provider_from_str() {
        assert_eq!("gemini".parse(), Ok(LlmProvider::Gemini));
        assert_eq!(" OpenAI ".parse(), Ok(LlmProvider::OpenAI));
        assert_eq!("google".parse(), Ok(LlmProvider::Gemini));
        assert!("anthropic".parse::<LlmProvider>().is_err());
    }

    #[test]
    fn test_runtime_config_new() {
        let config = RuntimeConfig::new();
        assert_eq!(config.provider, LlmProvider::Gemini);
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.timeout, Duration::from_secs(120));
        assert_eq!(config.max_retries, 1);
        assert_eq!(config.retry_backoff, Duration::from_secs(1));
        assert!(config.stream);
    }

    #[test]
    fn test_runtime_config_builder() {
        let config = RuntimeConfig::new()
            .with_provider(LlmProvider::OpenAI)
            .with_timeout(Duration::from_secs(30))
            .with_max_retries(0)
            .with_max_tokens(1024)
            .with_temperature(0.0)
            .with_stream(false);

        assert_eq!(config.provider, LlmProvider::OpenAI);
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_retries, 0);
        assert_eq!(config.max_tokens, 1024);
        assert!(!config.stream);
    }

    #[test]
    fn test_with_provider_keeps_custom_model() {
        let config = RuntimeConfig::new()
            .with_model("gemini-1.5-pro")
            .with_provider(LlmProvider::OpenAI);
        assert_eq!(config.model, "gemini-1.5-pro");
    }

    #[test]
    fn test_retry_delay_doubles() {
        let config = RuntimeConfig::new().with_retry_backoff(Duration::from_millis(250));
        assert_eq!(config.retry_delay(1), Duration::from_millis(250));
        assert_eq!(config.retry_delay(2), Duration::from_millis(500));
        assert_eq!(config.retry_delay(3), Duration::from_millis(1000));
    }

    #[test]
    fn test_from_vars_explicit() {
        let config = RuntimeConfig::from_vars(vars(&[
            ("DRYRUN_PROVIDER", "openai"),
            ("DRYRUN_MODEL", "gpt-4o"),
            ("DRYRUN_TIMEOUT_SECS", "45"),
            ("DRYRUN_MAX_RETRIES", "3"),
            ("DRYRUN_RETRY_BACKOFF_MS", "10"),
            ("DRYRUN_STREAM", "off"),
        ]));
        assert_eq!(config.provider, LlmProvider::OpenAI);
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.timeout, Duration::from_secs(45));
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.retry_backoff, Duration::from_millis(10));
        assert!(!config.stream);
    }

    #[test]
    fn test_from_vars_infers_provider_from_key() {
        let config = RuntimeConfig::from_vars(vars(&[("OPENAI_API_KEY", "sk-test")]));
        assert_eq!(config.provider, LlmProvider::OpenAI);
        assert_eq!(config.model, "gpt-4o-mini");

        let config = RuntimeConfig::from_vars(vars(&[
            ("GOOGLE_API_KEY", "g"),
            ("OPENAI_API_KEY", "sk-test"),
        ]));
        assert_eq!(config.provider, LlmProvider::Gemini);
    }

    #[test]
    fn test_from_vars_ignores_garbage() {
        let config = RuntimeConfig::from_vars(vars(&[
            ("DRYRUN_PROVIDER", "nope"),
            ("DRYRUN_TIMEOUT_SECS", "soon"),
            ("DRYRUN_MODEL", "   "),
        ]));
        assert_eq!(config.provider, LlmProvider::Gemini);
        assert_eq!(config.timeout, Duration::from_secs(120));
        assert_eq!(config.model, "gemini-2.0-flash");
    }

    #[test]
    fn test_invalid_values_are_reported() {
        let (config, rejected) = RuntimeConfig::parse_vars(vars(&[
            ("DRYRUN_PROVIDER", "llama"),
            ("DRYRUN_TIMEOUT_SECS", "abc"),
            ("DRYRUN_STREAM", "maybe"),
            ("DRYRUN_MAX_RETRIES", "2"),
            ("DRYRUN_MODEL", "   "),
        ]));
        assert_eq!(config.max_retries, 2);
        assert!(config.stream);
        assert_eq!(
            rejected,
            vec![
                ("DRYRUN_PROVIDER", "llama".to_string()),
                ("DRYRUN_TIMEOUT_SECS", "abc".to_string()),
                ("DRYRUN_STREAM", "maybe".to_string()),
            ]
        );
    }
}
