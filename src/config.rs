use std::env;
use std::time::Duration;

use crate::error::{MexcError, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.mexc.com";
pub const DEFAULT_RECV_WINDOW: u64 = 60_000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// API key pair. `Debug` never prints the secret.
#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &redact(&self.api_key))
            .field("api_secret", &"***")
            .finish()
    }
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub credentials: Option<Credentials>,
    /// Applied to orders that don't set their own.
    pub recv_window: u64,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            credentials: None,
            recv_window: DEFAULT_RECV_WINDOW,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    pub fn with_credentials(mut self, api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        self.credentials = Some(Credentials {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        });
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_recv_window(mut self, recv_window: u64) -> Self {
        self.recv_window = recv_window;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load config from environment variables
    ///
    /// MEXC_API_KEY / MEXC_API_SECRET are optional, but must be set together.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(base_url) = env::var("MEXC_BASE_URL") {
            config = config.with_base_url(base_url);
        }

        match (env::var("MEXC_API_KEY").ok(), env::var("MEXC_API_SECRET").ok()) {
            (Some(key), Some(secret)) => config = config.with_credentials(key, secret),
            (None, None) => {}
            (Some(_), None) => {
                return Err(MexcError::Config("MEXC_API_SECRET not set".to_string()));
            }
            (None, Some(_)) => {
                return Err(MexcError::Config("MEXC_API_KEY not set".to_string()));
            }
        }

        if let Ok(value) = env::var("MEXC_RECV_WINDOW") {
            let recv_window = value
                .parse::<u64>()
                .map_err(|e| MexcError::Config(format!("Invalid MEXC_RECV_WINDOW: {}", e)))?;
            config = config.with_recv_window(recv_window);
        }

        if let Ok(value) = env::var("MEXC_TIMEOUT_SECS") {
            let secs = value
                .parse::<u64>()
                .map_err(|e| MexcError::Config(format!("Invalid MEXC_TIMEOUT_SECS: {}", e)))?;
            config = config.with_timeout(Duration::from_secs(secs));
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(MexcError::Config("base URL must not be empty".to_string()));
        }

        // 거래소 최대값
        if self.recv_window == 0 || self.recv_window > DEFAULT_RECV_WINDOW {
            return Err(MexcError::Config(format!(
                "recvWindow must be between 1 and {} ms, got {}",
                DEFAULT_RECV_WINDOW, self.recv_window
            )));
        }

        if self.timeout.is_zero() {
            return Err(MexcError::Config("timeout must be greater than zero".to_string()));
        }

        if let Some(credentials) = &self.credentials {
            if credentials.api_key.is_empty() || credentials.api_secret.is_empty() {
                return Err(MexcError::Config("API key and secret must not be empty".to_string()));
            }
        }

        Ok(())
    }
}

fn redact(value: &str) -> String {
    let visible: String = value.chars().take(4).collect();
    format!("{}***", visible)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "https://api.mexc.com");
        assert_eq!(config.recv_window, 60000);
        assert!(config.credentials.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let config = ClientConfig::default().with_base_url("http://localhost:8080/");
        assert_eq!(config.base_url, "http://localhost:8080");
    }

    #[test]
    fn test_validate_recv_window() {
        assert!(ClientConfig::default().with_recv_window(0).validate().is_err());
        assert!(ClientConfig::default().with_recv_window(60001).validate().is_err());
        assert!(ClientConfig::default().with_recv_window(5000).validate().is_ok());
    }

    #[test]
    fn test_debug_hides_secret() {
        let config = ClientConfig::default().with_credentials("mx0vglABCDEF", "super-secret");
        let debug = format!("{:?}", config);

        assert!(debug.contains("mx0v***"));
        assert!(!debug.contains("ABCDEF"));
        assert!(!debug.contains("super-secret"));
    }

    #[test]
    fn test_validate_timeout() {
        let zero = ClientConfig::default().with_timeout(Duration::ZERO);
        assert!(matches!(zero.validate(), Err(MexcError::Config(_))));

        let one = ClientConfig::default().with_timeout(Duration::from_secs(1));
        assert!(one.validate().is_ok());
    }

    // 환경 변수는 프로세스 전역이므로 from_env 테스트는 직렬로 실행
    static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

    const ENV_VARS: [&str; 5] = [
        "MEXC_API_KEY",
        "MEXC_API_SECRET",
        "MEXC_BASE_URL",
        "MEXC_RECV_WINDOW",
        "MEXC_TIMEOUT_SECS",
    ];

    fn from_env_with(vars: &[(&str, &str)]) -> Result<ClientConfig> {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());

        for key in ENV_VARS {
            env::remove_var(key);
        }
        for (key, value) in vars {
            env::set_var(key, value);
        }

        let result = ClientConfig::from_env();

        for key in ENV_VARS {
            env::remove_var(key);
        }
        result
    }

    #[test]
    fn test_from_env_defaults() {
        let config = from_env_with(&[]).unwrap();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.recv_window, DEFAULT_RECV_WINDOW);
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert!(config.credentials.is_none());
    }

    #[test]
    fn test_from_env_overrides() {
        let config = from_env_with(&[
            ("MEXC_API_KEY", "mx0vgl-key"),
            ("MEXC_API_SECRET", "secret"),
            ("MEXC_BASE_URL", "http://localhost:9000/"),
            ("MEXC_RECV_WINDOW", "5000"),
            ("MEXC_TIMEOUT_SECS", "3"),
        ])
        .unwrap();

        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.recv_window, 5000);
        assert_eq!(config.timeout, Duration::from_secs(3));

        let credentials = config.credentials.unwrap();
        assert_eq!(credentials.api_key, "mx0vgl-key");
        assert_eq!(credentials.api_secret, "secret");
    }

    #[test]
    fn test_from_env_requires_key_pair() {
        let key_only = from_env_with(&[("MEXC_API_KEY", "mx0vgl-key")]);
        assert!(matches!(key_only, Err(MexcError::Config(msg)) if msg.contains("MEXC_API_SECRET")));

        let secret_only = from_env_with(&[("MEXC_API_SECRET", "secret")]);
        assert!(matches!(secret_only, Err(MexcError::Config(msg)) if msg.contains("MEXC_API_KEY")));
    }

    #[test]
    fn test_from_env_rejects_bad_numbers() {
        let recv_window = from_env_with(&[("MEXC_RECV_WINDOW", "soon")]);
        assert!(matches!(recv_window, Err(MexcError::Config(msg)) if msg.contains("MEXC_RECV_WINDOW")));

        let timeout = from_env_with(&[("MEXC_TIMEOUT_SECS", "ten")]);
        assert!(matches!(timeout, Err(MexcError::Config(msg)) if msg.contains("MEXC_TIMEOUT_SECS")));

        let zero_timeout = from_env_with(&[("MEXC_TIMEOUT_SECS", "0")]);
        assert!(matches!(zero_timeout, Err(MexcError::Config(_))));

        let out_of_range = from_env_with(&[("MEXC_RECV_WINDOW", "0")]);
        assert!(matches!(out_of_range, Err(MexcError::Config(_))));
    }
}
