//! Command line interface

pub mod commands;
pub mod display;
pub mod serve;
pub mod template;

pub use commands::{CliArgs, Commands};

use crate::client::DEFAULT_ADDRESS;
use clap::Args;
use std::collections::HashMap;
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. `RUST_LOG` wins over `default_level`.
pub fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // A subscriber may already be installed when commands run inside tests
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Connection options shared by commands that talk to a running service
#[derive(Args, Debug, Clone)]
pub struct ClientArgs {
    /// Template repository service address
    #[arg(long, short = 'a', env = "TEMPLATE_REPOSITORY_ADDRESS", default_value = DEFAULT_ADDRESS)]
    pub address: String,

    /// Basic auth credentials (user:password)
    #[arg(long, value_name = "USER:PASSWORD")]
    pub auth: Option<String>,
}

impl ClientArgs {
    pub fn client(&self) -> anyhow::Result<crate::client::TemplateRepositoryClient> {
        let client = crate::client::TemplateRepositoryClient::new(self.address.clone())
            .map_err(|e| anyhow::anyhow!("Failed to create client: {}", e))?;
        match self.auth.as_deref() {
            Some(auth) => {
                let (username, password) = auth
                    .split_once(':')
                    .ok_or_else(|| anyhow::anyhow!("Invalid auth format, expected user:password"))?;
                Ok(client.with_basic_auth(username, password))
            }
            None => Ok(client),
        }
    }
}

/// Parse `key=value` pairs given with `-p`
pub fn parse_key_value_pairs(pairs: &[String]) -> Result<HashMap<String, String>, String> {
    let mut map = HashMap::new();

    for pair in pairs {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| format!("Invalid parameter format: '{}'. Expected 'key=value'", pair))?;

        let key = key.trim();
        if key.is_empty() {
            return Err(format!("Empty key in parameter: '{}'", pair));
        }

        map.insert(key.to_string(), value.trim().to_string());
    }

    Ok(map)
}
