use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_DB_PATH: &str = "scsn.db";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;

/// Server settings, read from the environment (after `.env` is loaded).
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub db_path: PathBuf,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_path = lookup("SCSN_DB_PATH")
            .unwrap_or_else(|| DEFAULT_DB_PATH.into())
            .into();
        let host = lookup("SCSN_HOST").unwrap_or_else(|| DEFAULT_HOST.into());
        let port = match lookup("SCSN_PORT") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("SCSN_PORT is not a valid port: {raw:?}"))?,
            None => DEFAULT_PORT,
        };

        Ok(Self { db_path, host, port })
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.db_path, PathBuf::from("scsn.db"));
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.listen_addr().unwrap().port(), 3000);
    }

    #[test]
    fn overrides_are_read() {
        let config = config_from(&[
            ("SCSN_DB_PATH", "/var/lib/scsn/feed.db"),
            ("SCSN_HOST", "127.0.0.1"),
            ("SCSN_PORT", "8080"),
        ])
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/var/lib/scsn/feed.db"));
        assert_eq!(config.listen_addr().unwrap().to_string(), "127.0.0.1:8080");
    }

    #[test]
    fn bad_port_is_an_error() {
        assert!(config_from(&[("SCSN_PORT", "eighty")]).is_err());
        assert!(config_from(&[("SCSN_PORT", "70000")]).is_err());
    }

    #[test]
    fn bad_host_fails_at_bind_time() {
        let config = config_from(&[("SCSN_HOST", "not a host")]).unwrap();
        assert!(config.listen_addr().is_err());
    }
}
