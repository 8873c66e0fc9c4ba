use std::time::Duration;

use chrono_tz::Tz;

pub const DEFAULT_TIMEZONE: Tz = chrono_tz::America::Sao_Paulo;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("invalid base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("timeout must be greater than zero")]
    ZeroTimeout,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub timeout: Option<Duration>,
    pub timezone: Tz,
    pub camera_permission: bool,
}

impl Config {
    pub fn new(
        base_url: &str,
        timeout_ms: Option<u64>,
        timezone: Tz,
        camera_permission: bool,
    ) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason,
        };
        let parsed = reqwest::Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {}", parsed.scheme())));
        }
        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(invalid("query and fragment are not allowed".to_string()));
        }

        let timeout = match timeout_ms {
            Some(0) => return Err(ConfigError::ZeroTimeout),
            Some(ms) => Some(Duration::from_millis(ms)),
            None => None,
        };

        Ok(Self {
            base_url: base_url.to_string(),
            timeout,
            timezone,
            camera_permission,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_base() {
        let config = Config::new("https://api.example.com/v1", Some(5000), DEFAULT_TIMEZONE, true)
            .unwrap();
        assert_eq!(config.timeout, Some(Duration::from_millis(5000)));
        assert_eq!(config.base_url, "https://api.example.com/v1");
    }

    #[test]
    fn rejects_bad_urls() {
        for url in ["not a url", "ftp://example.com", "http://example.com/?a=1"] {
            assert!(
                matches!(
                    Config::new(url, None, DEFAULT_TIMEZONE, true),
                    Err(ConfigError::InvalidBaseUrl { .. })
                ),
                "{url}"
            );
        }
    }

    #[test]
    fn rejects_zero_timeout() {
        assert!(matches!(
            Config::new("http://localhost", Some(0), DEFAULT_TIMEZONE, true),
            Err(ConfigError::ZeroTimeout)
        ));
    }
}
