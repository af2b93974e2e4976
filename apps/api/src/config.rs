use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

/// Which similarity strategy backs `/api/v1/matches`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScorerBackend {
    Lexical,
    Semantic,
}

impl FromStr for ScorerBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lexical" => Ok(ScorerBackend::Lexical),
            "semantic" => Ok(ScorerBackend::Semantic),
            other => bail!("SCORER_BACKEND must be 'lexical' or 'semantic', got '{other}'"),
        }
    }
}

/// Upper bound for `EMBEDDING_MAX_RETRIES`; backoff doubles per retry.
pub const MAX_EMBEDDING_RETRIES: u32 = 10;

/// Settings for the external embedding provider (semantic backend only).
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    /// Every vector returned by the provider must have exactly this length.
    pub dimensions: usize,
    pub timeout: Duration,
    /// Retries after the first attempt, at most `MAX_EMBEDDING_RETRIES`.
    pub max_retries: u32,
    /// Base delay for exponential backoff between attempts.
    pub retry_backoff: Duration,
    /// Cache description embeddings by text. Only sound for deterministic providers.
    pub cache: bool,
}

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub catalog_path: PathBuf,
    pub port: u16,
    pub rust_log: String,
    pub scorer_backend: ScorerBackend,
    pub strip_punctuation: bool,
    pub match_top_k: usize,
    pub embedding: EmbeddingConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let scorer_backend: ScorerBackend = optional_env("SCORER_BACKEND", "lexical").parse()?;

        let api_key = match scorer_backend {
            ScorerBackend::Semantic => require_env("EMBEDDING_API_KEY")?,
            ScorerBackend::Lexical => std::env::var("EMBEDDING_API_KEY").unwrap_or_default(),
        };

        Ok(Config {
            catalog_path: PathBuf::from(require_env("CATALOG_PATH")?),
            port: parse_env("PORT", "8080")?,
            rust_log: optional_env("RUST_LOG", "info"),
            scorer_backend,
            strip_punctuation: parse_env("STRIP_PUNCTUATION", "true")?,
            match_top_k: parse_env("MATCH_TOP_K", "3")?,
            embedding: EmbeddingConfig {
                api_url: optional_env(
                    "EMBEDDING_API_URL",
                    "https://api.openai.com/v1/embeddings",
                ),
                api_key,
                model: optional_env("EMBEDDING_MODEL", "text-embedding-3-small"),
                dimensions: parse_env("EMBEDDING_DIMENSIONS", "1536")?,
                timeout: Duration::from_secs(parse_env("EMBEDDING_TIMEOUT_SECS", "30")?),
                max_retries: parse_retries(parse_env("EMBEDDING_MAX_RETRIES", "3")?)?,
                retry_backoff: Duration::from_millis(500),
                cache: parse_env("EMBEDDING_CACHE", "false")?,
            },
        })
    }
}

#[cfg(test)]
impl Config {
    /// Lexical backend, top-3, no provider configured.
    pub fn for_tests() -> Self {
        Config {
            catalog_path: PathBuf::from("jobs.csv"),
            port: 0,
            rust_log: "debug".to_string(),
            scorer_backend: ScorerBackend::Lexical,
            strip_punctuation: true,
            match_top_k: 3,
            embedding: EmbeddingConfig {
                api_url: "http://127.0.0.1:0/v1/embeddings".to_string(),
                api_key: String::new(),
                model: "test".to_string(),
                dimensions: 3,
                timeout: Duration::from_secs(1),
                max_retries: 1,
                retry_backoff: Duration::from_millis(1),
                cache: false,
            },
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    optional_env(key, default)
        .trim()
        .parse::<T>()
        .with_context(|| format!("{key} has an invalid value"))
}

fn parse_retries(retries: u32) -> Result<u32> {
    if retries > MAX_EMBEDDING_RETRIES {
        bail!("EMBEDDING_MAX_RETRIES must be at most {MAX_EMBEDDING_RETRIES}, got {retries}");
    }
    Ok(retries)
}
