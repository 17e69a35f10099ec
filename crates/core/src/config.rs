use std::env;
use std::path::Path;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_ENV_FILE: &str = "api_keys.env";
pub const DEFAULT_GROQ_MODEL: &str = "llama3-8b-8192";
pub const DEFAULT_GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_AERODATA_HOST: &str = "aerodatabox.p.rapidapi.com";
pub const DEFAULT_MIN_ANSWER_CHARS: usize = 10;

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct FlightDataConfig {
    pub api_key: String,
    pub host: String,
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(20),
            connect_timeout: Duration::from_secs(6),
        }
    }
}

/// Process-wide settings, resolved once at startup and handed to each
/// component constructor.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub llm: LlmConfig,
    pub flight_data: FlightDataConfig,
    pub http: HttpConfig,
    pub min_answer_chars: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let groq_api_key =
            read("GROQ_API_KEY").ok_or(ConfigError::MissingCredential("GROQ_API_KEY"))?;
        let aerodata_host =
            read("AERODATA_HOST").unwrap_or_else(|| DEFAULT_AERODATA_HOST.to_string());
        let aerodata_base_url = read("AERODATA_BASE_URL")
            .unwrap_or_else(|| format!("https://{aerodata_host}"));

        let timeout = parse_number(&read, "FLIGHTDESK_HTTP_TIMEOUT_SECONDS", 20)?;
        let connect_timeout = parse_number(&read, "FLIGHTDESK_HTTP_CONNECT_TIMEOUT_SECONDS", 6)?;
        let min_answer_chars = parse_number(
            &read,
            "FLIGHTDESK_MIN_ANSWER_CHARS",
            DEFAULT_MIN_ANSWER_CHARS as u64,
        )? as usize;

        Ok(Self {
            llm: LlmConfig {
                api_key: groq_api_key,
                model: read("GROQ_MODEL").unwrap_or_else(|| DEFAULT_GROQ_MODEL.to_string()),
                base_url: trim_base_url(
                    read("GROQ_BASE_URL").unwrap_or_else(|| DEFAULT_GROQ_BASE_URL.to_string()),
                ),
            },
            flight_data: FlightDataConfig {
                api_key: read("AERODATA_API_KEY").unwrap_or_default(),
                host: aerodata_host,
                base_url: trim_base_url(aerodata_base_url),
            },
            http: HttpConfig {
                timeout: Duration::from_secs(timeout),
                connect_timeout: Duration::from_secs(connect_timeout),
            },
            min_answer_chars,
        })
    }
}

/// Loads `KEY=VALUE` pairs from `path` into the process environment without
/// overriding variables that are already set. A missing file is not an error.
pub fn load_env_file(path: impl AsRef<Path>) -> Result<bool, ConfigError> {
    let path = path.as_ref();
    match dotenvy::from_filename(path) {
        Ok(_) => Ok(true),
        Err(err) if err.not_found() => Ok(false),
        Err(source) => Err(ConfigError::EnvFile {
            path: path.display().to_string(),
            source,
        }),
    }
}

fn parse_number<F>(read: &F, key: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match read(key) {
        Some(value) => value
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
        None => Ok(default),
    }
}

fn trim_base_url(value: String) -> String {
    value.trim_end_matches('/').to_string()
}
