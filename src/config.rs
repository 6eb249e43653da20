use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub surreal_endpoint: String,
    pub surreal_user: String,
    pub surreal_pass: String,
    pub surreal_ns: String,
    pub surreal_db: String,
    pub jwt_secret: String,
    pub jwt_ttl_secs: usize,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("HIRELINK_PORT", "3587"),
            surreal_endpoint: try_load("SURREAL_ENDPOINT", "ws://localhost:8050"),
            surreal_user: try_load("SURREAL_USER", "root"),
            surreal_pass: try_load("SURREAL_PASS", "secret"),
            surreal_ns: try_load("SURREAL_NS", "hirelink"),
            surreal_db: try_load("SURREAL_DB", "auth"),
            jwt_secret: try_load("HIRELINK_JWT_SECRET", "secret"),
            jwt_ttl_secs: try_load("HIRELINK_JWT_TTL_SECS", "86400"),
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}
