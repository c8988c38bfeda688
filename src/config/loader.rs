//! Configuration loading from disk and environment.

use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use crate::config::schema::ServiceConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding the listener port.
pub const PORT_ENV: &str = "PORT";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Env { name: &'static str, value: String },
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Env { name, value } => {
                write!(f, "Invalid value {:?} for environment variable {}", value, name)
            }
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load configuration, apply environment overrides, and validate.
///
/// Without a path the built-in defaults are used.
pub fn load_config(path: Option<&Path>) -> Result<ServiceConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
            toml::from_str(&content).map_err(ConfigError::Parse)?
        }
        None => ServiceConfig::default(),
    };

    let port = std::env::var(PORT_ENV).ok();
    apply_port_override(&mut config, port.as_deref())?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Replace the port of `listener.bind_address` with `port`, when set.
pub fn apply_port_override(config: &mut ServiceConfig, port: Option<&str>) -> Result<(), ConfigError> {
    let Some(port) = port.filter(|p| !p.is_empty()) else {
        return Ok(());
    };
    let env_err = || ConfigError::Env {
        name: PORT_ENV,
        value: port.to_string(),
    };

    let port: u16 = port.parse().map_err(|_| env_err())?;
    // An unparseable bind address is reported later by validation.
    if let Ok(mut addr) = config.listener.bind_address.parse::<SocketAddr>() {
        addr.set_port(port);
        config.listener.bind_address = addr.to_string();
    }
    Ok(())
}
