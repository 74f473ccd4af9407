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

//! HTTP client for a running template repository

use crate::domain::template::placeholders::QUERY_INSTANCE_ID;
use crate::domain::template::{RawTemplate, Template};
use crate::shared::error::{Result, TemplateError};
use reqwest::{RequestBuilder, Response};
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_ADDRESS: &str = "http://localhost:8080";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct TemplateRepositoryClient {
    address: String,
    http: reqwest::Client,
    basic_auth: Option<(String, String)>,
}

impl TemplateRepositoryClient {
    pub fn new(address: impl Into<String>) -> Result<Self> {
        let address = address.into();
        if !(address.starts_with("http://") || address.starts_with("https://")) {
            return Err(TemplateError::config_error(format!(
                "Template repository address must start with http:// or https://: {}",
                address
            )));
        }

        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            address: address.trim_end_matches('/').to_string(),
            http,
            basic_auth: None,
        })
    }

    pub fn with_basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.basic_auth = Some((username.into(), password.into()));
        self
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub async fn list_templates(&self) -> Result<Vec<Template>> {
        let response = self.send(self.http.get(self.url("/api/v1/templates"))).await?;
        Ok(response.json().await?)
    }

    pub async fn get_template(&self, id: &str) -> Result<RawTemplate> {
        let url = self.url(&format!("/api/v1/templates/{}", id));
        let response = self.send(self.http.get(url)).await?;
        Ok(response.json().await?)
    }

    /// Render template `id` for `instance_id`. Every replacement is sent as a
    /// query parameter and becomes a `$key` placeholder on the server.
    pub async fn generate_parsed_template(
        &self,
        id: &str,
        instance_id: &str,
        replacements: &HashMap<String, String>,
    ) -> Result<Template> {
        let url = self.url(&format!("/api/v1/parsed_template/{}", id));
        let request = self
            .http
            .get(url)
            .query(&[(QUERY_INSTANCE_ID, instance_id)])
            .query(replacements);
        let response = self.send(request).await?;
        Ok(response.json().await?)
    }

    pub async fn create_template(&self, template: &RawTemplate) -> Result<()> {
        let request = self.http.post(self.url("/api/v1/templates")).json(template);
        self.send(request).await?;
        Ok(())
    }

    pub async fn delete_template(&self, id: &str) -> Result<()> {
        let url = self.url(&format!("/api/v1/templates/{}", id));
        self.send(self.http.delete(url)).await?;
        Ok(())
    }

    pub async fn health(&self) -> Result<serde_json::Value> {
        let response = self.send(self.http.get(self.url("/healthz"))).await?;
        Ok(response.json().await?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let request = match &self.basic_auth {
            Some((username, password)) => request.basic_auth(username, Some(password)),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        debug!("{} {}", response.url(), status);

        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(TemplateError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_is_normalized() {
        let client = TemplateRepositoryClient::new("http://localhost:8080/").unwrap();
        assert_eq!(client.address(), "http://localhost:8080");
        assert_eq!(client.url("/healthz"), "http://localhost:8080/healthz");
    }

    #[test]
    fn test_address_requires_scheme() {
        let err = TemplateRepositoryClient::new("localhost:8080").unwrap_err();
        assert!(err.to_string().contains("http://"));
    }
}
