use std::env;
use std::path::PathBuf;

/// Environment variable names - single source of truth
pub mod env_vars {
    pub const HOST: &str = "HOST";
    pub const PORT: &str = "PORT";
    /// Location of the JSON snapshot. Set to an empty string to keep notes
    /// in memory only.
    pub const NOTES_STORE_PATH: &str = "NOTES_STORE_PATH";
}

/// Default values
pub mod defaults {
    pub const HOST: &str = "0.0.0.0";
    pub const PORT: u16 = 3001;
    pub const NOTES_STORE_PATH: &str = "/tmp/notes_store.json";
}

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// `None` disables persistence
    pub notes_store_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let host = lookup(env_vars::HOST)
            .filter(|h| !h.trim().is_empty())
            .unwrap_or_else(|| defaults::HOST.to_string());

        let port = match lookup(env_vars::PORT) {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                log::warn!("Invalid {} value '{}', using {}", env_vars::PORT, raw, defaults::PORT);
                defaults::PORT
            }),
            None => defaults::PORT,
        };

        let notes_store_path = match lookup(env_vars::NOTES_STORE_PATH) {
            Some(raw) if raw.trim().is_empty() => None,
            Some(raw) => Some(PathBuf::from(raw.trim())),
            None => Some(PathBuf::from(defaults::NOTES_STORE_PATH)),
        };

        Self {
            host,
            port,
            notes_store_path,
        }
    }
}
