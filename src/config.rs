use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;

const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:5000";
const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";
const DEFAULT_OLLAMA_MODEL: &str = "llama3.2";

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub ollama_base_url: String,
    pub ollama_model: String,
    /// No client-side timeout when unset.
    pub llm_timeout_secs: Option<u64>,
    pub mcq_max_attempts: usize,
    pub mcq_max_consecutive_unavailable: usize,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_address: get_env_or("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS),
            ollama_base_url: get_env_or("OLLAMA_BASE_URL", DEFAULT_OLLAMA_BASE_URL),
            ollama_model: get_env_or("OLLAMA_MODEL", DEFAULT_OLLAMA_MODEL),
            llm_timeout_secs: get_env_parse_opt("LLM_TIMEOUT_SECS")?,
            mcq_max_attempts: get_env_parse_opt("MCQ_MAX_ATTEMPTS")?.unwrap_or(6),
            mcq_max_consecutive_unavailable: get_env_parse_opt("MCQ_MAX_CONSECUTIVE_UNAVAILABLE")?
                .unwrap_or(3),
        })
    }
}

fn get_env_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn get_env_parse_opt<T>(name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        _ => Ok(None),
    }
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}
