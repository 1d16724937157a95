use std::env;

use thiserror::Error;
use url::Url;

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_RESEND_BASE_URL: &str = "https://api.resend.com/";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} not configured")]
    Missing(&'static str),

    #[error("{var} is not a valid URL: {source}")]
    InvalidUrl {
        var: &'static str,
        #[source]
        source: url::ParseError,
    },
}

impl ConfigError {
    /// Name of the environment variable at fault.
    #[must_use]
    pub fn var(&self) -> &'static str {
        match self {
            ConfigError::Missing(var) | ConfigError::InvalidUrl { var, .. } => var,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: Url,
}

impl GeminiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_key: required("GEMINI_API_KEY")?,
            model: env::var("GEMINI_MODEL")
                .ok()
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            base_url: url_or_default("GEMINI_BASE_URL", DEFAULT_GEMINI_BASE_URL)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ResendConfig {
    pub api_key: String,
    pub base_url: Url,
}

impl ResendConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_key: required("RESEND_API_KEY")?,
            base_url: url_or_default("RESEND_BASE_URL", DEFAULT_RESEND_BASE_URL)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub url: Url,
    pub anon_key: String,
}

impl SupabaseConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = required("SUPABASE_URL")?;
        Ok(Self {
            url: parse_base_url("SUPABASE_URL", &raw)?,
            anon_key: required("SUPABASE_ANON_KEY")?,
        })
    }
}

fn required(var: &'static str) -> Result<String, ConfigError> {
    env::var(var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(var))
}

fn url_or_default(var: &'static str, default: &str) -> Result<Url, ConfigError> {
    match env::var(var).ok().filter(|v| !v.trim().is_empty()) {
        Some(raw) => parse_base_url(var, &raw),
        None => parse_base_url(var, default),
    }
}

/// Parses a base URL so that `Url::join` appends to its path instead of
/// replacing the last segment.
pub fn parse_base_url(var: &'static str, raw: &str) -> Result<Url, ConfigError> {
    let trimmed = raw.trim();
    let normalized = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    Url::parse(&normalized).map_err(|source| ConfigError::InvalidUrl { var, source })
}
