// Copyright 2025 JiangLong.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Service configuration
//!
//! Resolution order: defaults < TOML file < environment < command line.

use crate::shared::error::{Result, TemplateError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::read_to_string;

pub const ENV_DOMAIN: &str = "DOMAIN";
pub const ENV_PORT: &str = "PORT";
pub const ENV_TLS_CERT_PATH: &str = "TLS_CERT_PATH";
pub const ENV_TLS_KEY_PATH: &str = "TLS_KEY_PATH";
pub const ENV_CATALOG_PATH: &str = "CATALOG_PATH";
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";

pub const DEFAULT_CATALOG_PATH: &str = "./catalogData/";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryConf {
    pub host: String,
    pub port: u16,
    /// Root of the template catalog on disk.
    pub catalog_path: String,
    /// Value of `$domain_name` when rendering.
    pub domain: String,
    pub log_level: String,
    pub tls: TlsConf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TlsConf {
    pub cert_path: Option<String>,
    pub key_path: Option<String>,
}

impl Default for RepositoryConf {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            catalog_path: DEFAULT_CATALOG_PATH.to_string(),
            domain: String::new(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            tls: TlsConf::default(),
        }
    }
}

impl RepositoryConf {
    /// Load configuration from TOML file
    pub fn from<T: AsRef<str>>(path: T) -> Result<Self> {
        let content = read_to_string(path.as_ref()).map_err(|e| {
            TemplateError::config_error(format!(
                "Failed to read config file {}: {}",
                path.as_ref(),
                e
            ))
        })?;

        let conf: Self = toml::from_str(&content)?;
        Ok(conf)
    }

    /// Load from an optional file, then apply the process environment.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut conf = match path {
            Some(path) => Self::from(path)?,
            None => Self::default(),
        };
        let env: HashMap<String, String> = std::env::vars().collect();
        conf.apply_env(&env)?;
        Ok(conf)
    }

    /// Override fields from environment variables. Empty values are ignored.
    pub fn apply_env(&mut self, env: &HashMap<String, String>) -> Result<()> {
        let get = |key: &str| env.get(key).filter(|v| !v.is_empty()).cloned();

        if let Some(domain) = get(ENV_DOMAIN) {
            self.domain = domain;
        }

        if let Some(port) = get(ENV_PORT) {
            self.port = port
                .parse::<u16>()
                .map_err(|e| TemplateError::config_error(format!("Invalid PORT {}: {}", port, e)))?;
        }

        if let Some(path) = get(ENV_CATALOG_PATH) {
            self.catalog_path = path;
        }

        if let Some(level) = get(ENV_LOG_LEVEL) {
            self.log_level = level;
        }

        if let Some(cert) = get(ENV_TLS_CERT_PATH) {
            self.tls.cert_path = Some(cert);
        }

        if let Some(key) = get(ENV_TLS_KEY_PATH) {
            self.tls.key_path = Some(key);
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.catalog_path.trim().is_empty() {
            return Err(TemplateError::config_error("catalog_path can't be empty"));
        }
        if self.port == 0 {
            return Err(TemplateError::config_error("port must be > 0"));
        }
        self.tls.paths()?;
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl TlsConf {
    /// Certificate and key paths when TLS is enabled.
    pub fn paths(&self) -> Result<Option<(&str, &str)>> {
        let cert = self.cert_path.as_deref().filter(|p| !p.is_empty());
        let key = self.key_path.as_deref().filter(|p| !p.is_empty());
        match (cert, key) {
            (Some(cert), Some(key)) => Ok(Some((cert, key))),
            (None, None) => Ok(None),
            (Some(_), None) => Err(TemplateError::config_error(
                "TLS_CERT_PATH is set but TLS_KEY_PATH is missing",
            )),
            (None, Some(_)) => Err(TemplateError::config_error(
                "TLS_KEY_PATH is set but TLS_CERT_PATH is missing",
            )),
        }
    }
}
