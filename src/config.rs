use anyhow::{bail, Context, Result};
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Staging,
    Prod,
}

impl Environment {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "prod" | "production" => Self::Prod,
            "staging" => Self::Staging,
            _ => Self::Dev,
        }
    }

    pub fn is_dev(&self) -> bool {
        matches!(self, Self::Dev)
    }

    pub fn is_prod(&self) -> bool {
        matches!(self, Self::Prod)
    }
}

/// LLM provider connection and model parameters.
#[derive(Debug, Clone)]
pub struct OpenAiSettings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f64,
    pub max_output_tokens: u32,
    pub timeout_seconds: u64,
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.openai.com".to_string(),
            model: "gpt-4.1".to_string(),
            temperature: 0.3,
            max_output_tokens: 16000,
            timeout_seconds: 120, // 2 minutes default for LLM calls
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub env: Environment,
    pub server_addr: String,

    // CORS
    pub cors_allow_origins: Vec<String>,
    pub max_request_body_bytes: usize,

    // Demo generator
    pub demo_mode: bool,
    pub demo_latency_ms: u64,

    // LLM provider
    pub openai: OpenAiSettings,
    pub max_attempts: u32,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let env = Environment::from_str(&lookup("ENV").unwrap_or_else(|| "dev".to_string()));
        let server_addr = lookup("SERVER_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_string());

        // CORS
        let cors_allow_origins = lookup("CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let max_request_body_bytes = parse_or(&lookup, "MAX_REQUEST_BODY_BYTES", 2 * 1024 * 1024)?;

        // Demo generator
        let demo_mode = parse_bool(&lookup, "DOCGEN_DEMO")?;
        let demo_latency_ms = parse_or(&lookup, "DOCGEN_DEMO_LATENCY_MS", 1500)?;

        // LLM provider
        let defaults = OpenAiSettings::default();
        let api_key = lookup("OPENAI_API_KEY")
            .map(|s| s.trim().to_string())
            .unwrap_or_default();
        if api_key.is_empty() && !demo_mode {
            bail!("OPENAI_API_KEY must be set unless DOCGEN_DEMO is enabled");
        }

        let base_url = lookup("OPENAI_BASE_URL").unwrap_or(defaults.base_url);
        url::Url::parse(&base_url)
            .with_context(|| format!("OPENAI_BASE_URL is not a valid URL: {base_url}"))?;

        let openai = OpenAiSettings {
            api_key,
            base_url,
            model: lookup("DOCGEN_MODEL").unwrap_or(defaults.model),
            temperature: parse_or(&lookup, "DOCGEN_TEMPERATURE", defaults.temperature)?,
            max_output_tokens: parse_or(&lookup, "DOCGEN_MAX_TOKENS", defaults.max_output_tokens)?,
            timeout_seconds: parse_or(&lookup, "DOCGEN_TIMEOUT_SECONDS", defaults.timeout_seconds)?,
        };
        let max_attempts = parse_or(&lookup, "DOCGEN_MAX_ATTEMPTS", 3)?;

        Ok(Settings {
            env,
            server_addr,
            cors_allow_origins,
            max_request_body_bytes,
            demo_mode,
            demo_latency_ms,
            openai,
            max_attempts,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw}")),
        _ => Ok(default),
    }
}

fn parse_bool(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<bool> {
    match lookup(key).map(|s| s.trim().to_lowercase()) {
        None => Ok(false),
        Some(s) => match s.as_str() {
            "" | "0" | "false" | "no" | "off" => Ok(false),
            "1" | "true" | "yes" | "on" => Ok(true),
            _ => bail!("{key} must be a boolean, got: {s}"),
        },
    }
}
