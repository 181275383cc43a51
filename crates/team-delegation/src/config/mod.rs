use crate::delegation::{EngineConfig, Weights, DEFAULT_CAPACITY_WEEKS};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub engine: EngineConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            engine: load_engine_config()?,
        })
    }
}

fn load_engine_config() -> Result<EngineConfig, ConfigError> {
    let nominal_capacity_weeks = match env::var("APP_CAPACITY_WEEKS") {
        Ok(raw) => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|weeks| weeks.is_finite() && *weeks > 0.0)
            .ok_or(ConfigError::InvalidCapacity)?,
        Err(_) => DEFAULT_CAPACITY_WEEKS,
    };

    let defaults = Weights::balanced();
    let weights = Weights::new(
        weight_var("APP_WEIGHT_CAPACITY", defaults.capacity)?,
        weight_var("APP_WEIGHT_SKILL", defaults.skill)?,
        weight_var("APP_WEIGHT_RELIABILITY", defaults.reliability)?,
        weight_var("APP_WEIGHT_LEARNING", defaults.learning)?,
    );

    let allow_overcommit = match env::var("APP_ALLOW_OVERCOMMIT") {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" | "" => false,
            _ => return Err(ConfigError::InvalidFlag("APP_ALLOW_OVERCOMMIT")),
        },
        Err(_) => false,
    };

    Ok(EngineConfig {
        nominal_capacity_weeks,
        weights,
        allow_overcommit,
    })
}

fn weight_var(name: &'static str, default: f64) -> Result<f64, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|weight| weight.is_finite() && *weight >= 0.0)
            .ok_or(ConfigError::InvalidWeight(name)),
        Err(_) => Ok(default),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidCapacity,
    InvalidWeight(&'static str),
    InvalidFlag(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidCapacity => {
                write!(f, "APP_CAPACITY_WEEKS must be a positive number of weeks")
            }
            ConfigError::InvalidWeight(name) => {
                write!(f, "{name} must be a non-negative number")
            }
            ConfigError::InvalidFlag(name) => write!(f, "{name} must be true or false"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidCapacity
            | ConfigError::InvalidWeight(_)
            | ConfigError::InvalidFlag(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for name in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "APP_CAPACITY_WEEKS",
            "APP_WEIGHT_CAPACITY",
            "APP_WEIGHT_SKILL",
            "APP_WEIGHT_RELIABILITY",
            "APP_WEIGHT_LEARNING",
            "APP_ALLOW_OVERCOMMIT",
        ] {
            env::remove_var(name);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.engine, EngineConfig::default());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn engine_settings_come_from_env() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_CAPACITY_WEEKS", "10");
        env::set_var("APP_WEIGHT_SKILL", "0.5");
        env::set_var("APP_ALLOW_OVERCOMMIT", "yes");

        let config = AppConfig::load().expect("config loads");

        assert_eq!(config.engine.nominal_capacity_weeks, 10.0);
        assert_eq!(config.engine.weights.skill, 0.5);
        assert_eq!(config.engine.weights.capacity, 0.4);
        assert!(config.engine.allow_overcommit);
        reset_env();
    }

    #[test]
    fn rejects_invalid_engine_settings() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_CAPACITY_WEEKS", "0");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidCapacity)
        ));

        reset_env();
        env::set_var("APP_WEIGHT_LEARNING", "-0.1");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidWeight("APP_WEIGHT_LEARNING"))
        ));
        reset_env();
    }
}
