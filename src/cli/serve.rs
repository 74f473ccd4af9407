//! Service command

use crate::api::{ApiServer, AppState};
use crate::domain::config::RepositoryConf;
use crate::infrastructure::{FileSystemStore, TemplateRepository};
use clap::Parser;
use std::sync::Arc;
use tracing::info;

/// Environment variable holding the config file path when --config is not given
pub const CONF_FILE_ENV: &str = "TEMPLATE_REPOSITORY_CONF";

#[derive(Parser, Debug, Clone)]
pub struct ServeCommand {
    /// Path to configuration file (TOML)
    /// If not provided, reads from TEMPLATE_REPOSITORY_CONF, then falls back to defaults
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Root directory of the template catalog (overrides CATALOG_PATH)
    #[arg(long, value_name = "PATH")]
    pub catalog_path: Option<String>,

    /// Address to bind
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides PORT)
    #[arg(long, short = 'p')]
    pub port: Option<u16>,
}

impl ServeCommand {
    /// Resolve configuration: defaults < config file < environment < command line
    pub fn resolve_conf(&self) -> anyhow::Result<RepositoryConf> {
        let config_path = self
            .config
            .clone()
            .or_else(|| std::env::var(CONF_FILE_ENV).ok().filter(|p| !p.is_empty()));

        let mut conf = RepositoryConf::load(config_path.as_deref())
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

        if let Some(ref catalog_path) = self.catalog_path {
            conf.catalog_path = catalog_path.clone();
        }
        if let Some(ref host) = self.host {
            conf.host = host.clone();
        }
        if let Some(port) = self.port {
            conf.port = port;
        }

        conf.validate()
            .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;
        Ok(conf)
    }

    pub async fn execute(&self) -> anyhow::Result<()> {
        let conf = self.resolve_conf()?;
        super::init_tracing(&conf.log_level);

        info!("Loading templates from {}", conf.catalog_path);
        let store = Arc::new(FileSystemStore::new(&conf.catalog_path));
        let repository = TemplateRepository::open(store)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to load templates: {}", e))?;

        let state = AppState::new(Arc::new(repository), conf.domain.as_str());
        ApiServer::new(state, conf)
            .serve()
            .await
            .map_err(|e| anyhow::anyhow!("Server failed: {}", e))?;

        Ok(())
    }
}
