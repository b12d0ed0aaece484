use std::{env, fs, path::Path};

use anyhow::Context;
use serde::Deserialize;

use crate::core::clock::{Ttl, DEFAULT_TTL_SECS};

/// Config file used when none is given and `FERRYMQ_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "ferrymq.toml";

/// Environment variable that overrides the config path.
pub const CONFIG_ENV: &str = "FERRYMQ_CONFIG";

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:5000".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct BrokerConfig {
    /// TTL for messages sent without `ttl_seconds`.
    pub default_ttl_seconds: f64,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            default_ttl_seconds: DEFAULT_TTL_SECS,
        }
    }
}

impl BrokerConfig {
    pub fn default_ttl(&self) -> anyhow::Result<Ttl> {
        Ttl::from_secs(self.default_ttl_seconds).context("invalid broker.default_ttl_seconds")
    }
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub broker: BrokerConfig,
}

impl Config {
    /// Resolves the config source and loads it.
    ///
    /// `FERRYMQ_CONFIG` wins over `path`. With neither, `ferrymq.toml` is read if
    /// present and built-in defaults are used otherwise. An explicitly named
    /// file that cannot be read is an error.
    pub fn load(path: Option<&str>) -> anyhow::Result<Config> {
        let explicit = env::var(CONFIG_ENV).ok().or(path.map(str::to_owned));

        let config = match explicit {
            Some(p) => load_config(&p)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => load_config(DEFAULT_CONFIG_PATH)?,
            None => Config::default(),
        };
        config.broker.default_ttl()?;
        Ok(config)
    }
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, anyhow::Error> {
    let path = path.as_ref();
    let raw: String = fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    let config: Config = toml::from_str(&raw)
        .with_context(|| format!("parsing config file {}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.server.bind_addr, "127.0.0.1:5000");
        assert_eq!(config.broker.default_ttl_seconds, 60.0);
    }

    #[test]
    fn partial_sections_fill_in_defaults() {
        let config: Config = toml::from_str(
            r#"
            [broker]
            default_ttl_seconds = 2.5
            "#,
        )
        .unwrap();
        assert_eq!(config.server, ServerConfig::default());
        assert_eq!(config.broker.default_ttl().unwrap().as_millis(), 2_500);
    }

    #[test]
    fn negative_default_ttl_is_rejected() {
        let config = BrokerConfig {
            default_ttl_seconds: -3.0,
        };
        assert!(config.default_ttl().is_err());
    }
}
