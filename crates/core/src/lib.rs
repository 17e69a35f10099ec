pub mod config;
pub mod error;
pub mod extract;
pub mod models;
pub mod table;
pub mod template;

pub use config::{load_env_file, AppConfig, FlightDataConfig, HttpConfig, LlmConfig};
pub use error::{ConfigError, ProviderError};
pub use extract::{extract_flight_number_pattern, normalize_flight_number, normalize_text};
pub use models::*;
pub use table::FlightTable;
pub use template::compose_fallback_answer;
