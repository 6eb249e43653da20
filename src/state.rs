use std::sync::Arc;

use surrealdb::{
    Surreal,
    engine::any::{Any, connect},
    opt::auth::Root,
};

use crate::{config::Config, errors::Result};

#[derive(Debug, Clone)]
pub struct AppState {
    pub sdb: Surreal<Any>,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn init(config: Config) -> Result<Self> {
        let sdb = connect(&config.surreal_endpoint).await?;
        // The in-memory engine has no root user to sign in as.
        if !config.surreal_endpoint.starts_with("mem:") {
            sdb.signin(Root {
                username: &config.surreal_user,
                password: &config.surreal_pass,
            })
            .await?;
        }
        sdb.use_ns(&config.surreal_ns)
            .use_db(&config.surreal_db)
            .await?;

        Ok(Self {
            sdb,
            config: Arc::new(config),
        })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Fresh in-memory store per test.
    pub async fn mem_state() -> AppState {
        let config = Config {
            port: 0,
            surreal_endpoint: "mem://".to_string(),
            surreal_user: String::new(),
            surreal_pass: String::new(),
            surreal_ns: "test".to_string(),
            surreal_db: "test".to_string(),
            jwt_secret: "test-secret".to_string(),
            jwt_ttl_secs: 3600,
        };
        AppState::init(config).await.expect("mem state")
    }
}
