use std::{net::SocketAddr, time::Duration};

use anyhow::Context;

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,
    /// `None` disables enrichment; movies are then stored by title only.
    pub omdb_api_key: Option<String>,
    pub omdb_base_url: String,
    pub omdb_timeout: Duration,
    pub omdb_rps: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 =
            std::env::var("PORT").unwrap_or_else(|_| "5000".to_string()).parse().context("PORT")?;

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://moviweb.db?mode=rwc".to_string());

        let omdb_api_key = std::env::var("OMDB_API_KEY")
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());
        let omdb_base_url = std::env::var("OMDB_BASE_URL")
            .unwrap_or_else(|_| "http://www.omdbapi.com/".to_string());

        let omdb_timeout_secs: u64 =
            std::env::var("OMDB_TIMEOUT_SECS").ok().and_then(|s| s.parse().ok()).unwrap_or(5);

        let omdb_rps: u32 =
            std::env::var("OMDB_RPS").ok().and_then(|s| s.parse().ok()).unwrap_or(4);

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            database_url,
            omdb_api_key,
            omdb_base_url,
            omdb_timeout: Duration::from_secs(omdb_timeout_secs),
            omdb_rps,
        })
    }
}
