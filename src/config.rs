use std::env;

pub const DEFAULT_PRIMARY_URL: &str =
    "https://solvo-audio-ai-back.onrender.com/transcribir-audio/";
pub const DEFAULT_FALLBACK_URL: &str =
    "https://solvo-audio-ai-backup.onrender.com/transcribir-audio/";

const PRIMARY_URL_ENV: &str = "TRANSCRIBE_PRIMARY_URL";
const FALLBACK_URL_ENV: &str = "TRANSCRIBE_FALLBACK_URL";

/// Endpoint configuration resolved once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub primary_url: String,
    pub fallback_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            primary_url: DEFAULT_PRIMARY_URL.to_string(),
            fallback_url: DEFAULT_FALLBACK_URL.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            primary_url: normalize_url(env::var(PRIMARY_URL_ENV).ok(), DEFAULT_PRIMARY_URL),
            fallback_url: normalize_url(env::var(FALLBACK_URL_ENV).ok(), DEFAULT_FALLBACK_URL),
        }
    }
}

fn normalize_url(value: Option<String>, default: &str) -> String {
    match value {
        Some(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                default.to_string()
            } else {
                trimmed.to_string()
            }
        }
        None => default.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_production_hosts() {
        let config = Config::default();
        assert_eq!(config.primary_url, DEFAULT_PRIMARY_URL);
        assert_eq!(config.fallback_url, DEFAULT_FALLBACK_URL);
    }

    #[test]
    fn normalize_trims_and_rejects_empty() {
        assert_eq!(
            normalize_url(Some("  http://localhost:9000/stt  ".to_string()), "x"),
            "http://localhost:9000/stt"
        );
        assert_eq!(normalize_url(Some("   ".to_string()), "x"), "x");
        assert_eq!(normalize_url(None, "x"), "x");
    }
}
