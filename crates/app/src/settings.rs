use std::path::{Path, PathBuf};

/// Default backend base URL, matching the local development server.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";

/// Default request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

/// Environment override for the backend base URL.
pub const API_URL_ENV_VAR: &str = "FOLIO_API_URL";

/// Host settings read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSettings {
    pub api_base_url: String,
    pub request_timeout_seconds: u64,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECONDS,
        }
    }
}

impl AppSettings {
    /// Returns the default config file path.
    pub fn default_config_path() -> PathBuf {
        PathBuf::from(".folio").join("settings.conf")
    }

    /// Loads settings from the default path, then applies the environment
    /// override.
    pub fn load() -> Self {
        let mut settings = Self::load_from(&Self::default_config_path());
        if let Ok(url) = std::env::var(API_URL_ENV_VAR)
            && !url.trim().is_empty()
        {
            settings.api_base_url = url.trim().to_string();
        }
        settings
    }

    /// Loads settings from `path` or returns defaults.
    fn load_from(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => {
                tracing::info!("settings file not found at {:?}, using defaults", path);
                return Self::default();
            }
        };

        Self::parse_settings(&content)
    }

    /// Parses settings from `key=value` lines; unknown keys and malformed
    /// values are skipped.
    fn parse_settings(content: &str) -> Self {
        let mut settings = Self::default();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();
                let value = value.trim();

                match key {
                    "api_base_url" if !value.is_empty() => {
                        settings.api_base_url = value.to_string();
                    }
                    "request_timeout_seconds" => {
                        if let Ok(seconds) = value.parse::<u64>() {
                            settings.request_timeout_seconds = seconds;
                        }
                    }
                    _ => {}
                }
            }
        }

        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_content_yields_defaults() {
        let settings = AppSettings::parse_settings("");
        assert_eq!(settings, AppSettings::default());
    }

    #[test]
    fn known_keys_override_defaults() {
        let settings = AppSettings::parse_settings(
            "# folio settings\n\
             api_base_url=https://portfolio.example.com/api\n\
             request_timeout_seconds=10\n",
        );
        assert_eq!(settings.api_base_url, "https://portfolio.example.com/api");
        assert_eq!(settings.request_timeout_seconds, 10);
    }

    #[test]
    fn malformed_and_unknown_lines_are_skipped() {
        let settings = AppSettings::parse_settings(
            "request_timeout_seconds=soon\n\
             api_base_url=\n\
             color_scheme=mauve\n\
             not a key value line\n",
        );
        assert_eq!(settings, AppSettings::default());
    }
}
