//! Configuration management for tallychain

use serde::Deserialize;
use std::fs;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub client: ClientConfig,
}

#[derive(Debug, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_api_port")]
    pub api_port: u16,
    #[serde(default = "default_bind")]
    pub bind: String,
}

#[derive(Debug, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_node_url")]
    pub node_url: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            api_port: default_api_port(),
            bind: default_bind(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            node_url: default_node_url(),
        }
    }
}

pub fn load_config() -> Result<Config, Box<dyn std::error::Error>> {
    let config_str = fs::read_to_string("config.toml").unwrap_or_default();
    let config: Config = if config_str.is_empty() {
        // Sane defaults when config.toml is absent
        Config {
            network: NetworkConfig::default(),
            client: ClientConfig::default(),
        }
    } else {
        toml::from_str(&config_str)?
    };

    if config.client.node_url.is_empty() {
        return Err("client.node_url must be set in config.toml".into());
    }

    Ok(config)
}

fn default_api_port() -> u16 {
    5000
}

fn default_bind() -> String {
    "0.0.0.0".to_string()
}

fn default_node_url() -> String {
    "http://localhost:5000".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_sections() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.network.api_port, 5000);
        assert_eq!(config.network.bind, "0.0.0.0");
        assert_eq!(config.client.node_url, "http://localhost:5000");
    }

    #[test]
    fn test_partial_override() {
        let config: Config = toml::from_str("[network]\napi_port = 8080\n").unwrap();
        assert_eq!(config.network.api_port, 8080);
        assert_eq!(config.network.bind, "0.0.0.0");
        assert_eq!(config.client.node_url, "http://localhost:5000");
    }
}
