use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::tts::google::DEFAULT_API_BASE_URL;
use crate::tts::ServiceAccountKey;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3001;
const DEFAULT_LOCALE: &str = "cs-CZ";

/// Runtime settings, read once from the environment at startup.
#[derive(Debug)]
pub struct Config {
    pub addr: SocketAddr,
    /// Language/region code used for every synthesis.
    pub locale: String,
    pub static_dir: Option<PathBuf>,
    pub credentials: ServiceAccountKey,
    pub project_id: Option<String>,
    pub api_base_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match lookup("PORT") {
            Some(port) => port.parse::<u16>().map_err(|e| ConfigError::Invalid {
                var: "PORT",
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };
        let ip: IpAddr = host.parse().map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
            var: "HOST",
            reason: e.to_string(),
        })?;
        let addr = SocketAddr::from((ip, port));

        let locale = lookup("TTS_LOCALE")
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| DEFAULT_LOCALE.to_string());

        let static_dir = lookup("STATIC_DIR")
            .filter(|d| !d.is_empty())
            .map(PathBuf::from);

        let raw_credentials = lookup("GOOGLE_APPLICATION_CREDENTIALS")
            .filter(|c| !c.trim().is_empty())
            .ok_or(ConfigError::Missing("GOOGLE_APPLICATION_CREDENTIALS"))?;
        let credentials = ServiceAccountKey::load(&raw_credentials)?;

        let project_id = lookup("GOOGLE_CLOUD_PROJECT")
            .filter(|p| !p.is_empty())
            .or_else(|| credentials.project_id.clone());

        let api_base_url =
            lookup("TTS_API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        Ok(Self {
            addr,
            locale,
            static_dir,
            credentials,
            project_id,
            api_base_url,
        })
    }
}
