use config::{Config, ConfigError, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Postgres {
    pub url: String,
    pub port: u32,
    pub user: String,
    pub password: String,
    pub database: String,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub listen: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Tier {
    pub level: u32,
    pub target: u64,
    pub reward: String,
}

#[derive(Debug, Deserialize)]
pub struct Network {
    pub visited_cap: usize,
    pub tiers: Vec<Tier>,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub postgres: Postgres,
    pub server: Server,
    pub network: Network,
}

impl Settings {
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder().add_source(File::with_name(path)).build()?;

        config.try_deserialize()
    }
}
