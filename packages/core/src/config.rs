use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::error::ServiceError;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_TRACKER_TIMEOUT_SECONDS: u64 = 5;

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    pub port: u16,
    /// Webhook receiving error reports. Reports are only sent in production.
    pub tracker_url: Option<String>,
    pub tracker_timeout: Duration,
}

/// Deployment environment. Only `Production` forwards errors to the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Production,
    #[default]
    Development,
    Test,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Production => "production",
            Environment::Development => "development",
            Environment::Test => "test",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "production" => Ok(Environment::Production),
            "development" => Ok(Environment::Development),
            "test" => Ok(Environment::Test),
            other => Err(ServiceError::Config(format!("Invalid APP_ENV: {}", other))),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            port: DEFAULT_PORT,
            tracker_url: None,
            tracker_timeout: Duration::from_secs(DEFAULT_TRACKER_TIMEOUT_SECONDS),
        }
    }
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ServiceError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read configuration through `lookup`, which returns the value of a
    /// variable if it is set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ServiceError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("APP_ENV") {
            Some(raw) => raw.parse()?,
            None => Environment::default(),
        };

        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| ServiceError::Config("PORT must be a valid port number".into()))?,
            None => DEFAULT_PORT,
        };

        let tracker_url = lookup("ERROR_TRACKER_URL").filter(|url| !url.trim().is_empty());

        let tracker_timeout = match lookup("ERROR_TRACKER_TIMEOUT_SECONDS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ServiceError::Config(
                        "ERROR_TRACKER_TIMEOUT_SECONDS must be a positive number".into(),
                    ))
                }
            },
            None => Duration::from_secs(DEFAULT_TRACKER_TIMEOUT_SECONDS),
        };

        Ok(Self {
            environment,
            port,
            tracker_url,
            tracker_timeout,
        })
    }

    /// Apply command-line overrides on top of environment values.
    pub fn apply_cli(mut self, cli: &Cli) -> Result<Self, ServiceError> {
        if let Some(environment) = cli.environment.as_deref() {
            self.environment = environment.parse()?;
        }
        if let Some(port) = cli.port {
            self.port = port;
        }
        if let Some(url) = cli.tracker_url.clone() {
            self.tracker_url = Some(url);
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(config.tracker_url.is_none());
        assert_eq!(config.tracker_timeout, Duration::from_secs(5));
    }

    #[test]
    fn reads_all_variables() {
        let config = Config::from_lookup(lookup_from(&[
            ("APP_ENV", "production"),
            ("PORT", "9090"),
            ("ERROR_TRACKER_URL", "https://tracker.example.com/hook"),
            ("ERROR_TRACKER_TIMEOUT_SECONDS", "2"),
        ]))
        .unwrap();

        assert!(config.environment.is_production());
        assert_eq!(config.port, 9090);
        assert_eq!(config.tracker_url.as_deref(), Some("https://tracker.example.com/hook"));
        assert_eq!(config.tracker_timeout, Duration::from_secs(2));
    }

    #[test]
    fn blank_tracker_url_is_ignored() {
        let config = Config::from_lookup(lookup_from(&[("ERROR_TRACKER_URL", "  ")])).unwrap();
        assert!(config.tracker_url.is_none());
    }

    #[test]
    fn rejects_unknown_environment() {
        let err = Config::from_lookup(lookup_from(&[("APP_ENV", "staging")])).unwrap_err();
        assert!(matches!(err, ServiceError::Config(_)));
    }

    #[test]
    fn rejects_invalid_port() {
        let err = Config::from_lookup(lookup_from(&[("PORT", "http")])).unwrap_err();
        assert_eq!(err.to_string(), "Config error: PORT must be a valid port number");
    }

    #[test]
    fn rejects_zero_or_invalid_tracker_timeout() {
        for raw in ["0", "soon", "-1"] {
            let err = Config::from_lookup(lookup_from(&[("ERROR_TRACKER_TIMEOUT_SECONDS", raw)]))
                .unwrap_err();
            assert_eq!(
                err.to_string(),
                "Config error: ERROR_TRACKER_TIMEOUT_SECONDS must be a positive number"
            );
        }
    }

    #[test]
    fn cli_overrides_environment() {
        let cli = Cli {
            environment: Some("test".to_string()),
            port: Some(3000),
            tracker_url: None,
            list_codes: false,
        };
        let config = Config::default().apply_cli(&cli).unwrap();
        assert_eq!(config.environment, Environment::Test);
        assert_eq!(config.port, 3000);
    }
}
