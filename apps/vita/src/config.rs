use std::path::PathBuf;

/// Process configuration loaded from environment variables.
/// Every value has a default; command-line flags override these.
#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub default_config_path: PathBuf,
    pub default_output_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Config {
            log_level: env_or("VITA_LOG", "info"),
            default_config_path: PathBuf::from(env_or("VITA_CONFIG", "data")),
            default_output_path: PathBuf::from(env_or("VITA_OUTPUT", "data/cv.pdf")),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
