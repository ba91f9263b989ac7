use anyhow::{Context, Result};
use std::env;
use std::net::{IpAddr, SocketAddr};

#[derive(Debug, Clone)]
pub struct AddonConfig {
    pub host: String,
    pub port: u16,
    /// Public URL the platform uses to reach this add-on.
    pub base_url: String,
    pub key: String,
    pub name: String,
}

impl AddonConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            base_url: base_url.into(),
            key: "connect-jwt-example".to_string(),
            name: "Connect JWT Example".to_string(),
        }
    }

    pub fn from_env() -> Result<Self> {
        let base_url = env::var("ADDON_BASE_URL").context("ADDON_BASE_URL must be set")?;
        let mut config = Self::new(base_url.trim_end_matches('/'));
        if let Ok(host) = env::var("HOST") {
            config.host = host;
        }
        config.port = env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(config.port);
        if let Ok(key) = env::var("ADDON_KEY") {
            config.key = key;
        }
        if let Ok(name) = env::var("ADDON_NAME") {
            config.name = name;
        }
        Ok(config)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .host
            .parse()
            .with_context(|| format!("invalid HOST '{}'", self.host))?;
        Ok(SocketAddr::from((ip, self.port)))
    }
}
