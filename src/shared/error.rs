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

use thiserror::Error;
pub type Result<T> = std::result::Result<T, TemplateError>;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Can't find template by id: {0}")]
    NotFound(String),

    #[error("Template with id {0} already exists")]
    AlreadyExists(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Unmarshalling {kind} error: {source}")]
    Unmarshal {
        kind: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Bad response status: {status}. Body: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl TemplateError {
    pub fn validation(context: impl Into<String>) -> Self {
        Self::Validation(context.into())
    }

    pub fn forbidden(context: impl Into<String>) -> Self {
        Self::Forbidden(context.into())
    }

    pub fn config_error(context: impl Into<String>) -> Self {
        Self::ConfigError(context.into())
    }

    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound(id.into())
    }

    pub fn already_exists(id: impl Into<String>) -> Self {
        Self::AlreadyExists(id.into())
    }

    pub fn unmarshal(kind: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Unmarshal {
            kind: kind.into(),
            source,
        }
    }

    /// HTTP status code a handler answers with for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            TemplateError::Validation(_) => 400,
            TemplateError::Forbidden(_) => 403,
            TemplateError::NotFound(_) => 404,
            TemplateError::AlreadyExists(_) => 409,
            _ => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(TemplateError::validation("bad").status_code(), 400);
        assert_eq!(TemplateError::forbidden("no").status_code(), 403);
        assert_eq!(TemplateError::not_found("x").status_code(), 404);
        assert_eq!(TemplateError::already_exists("x").status_code(), 409);
        assert_eq!(TemplateError::config_error("x").status_code(), 500);

        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk");
        assert_eq!(TemplateError::from(io).status_code(), 500);
    }

    #[test]
    fn test_unmarshal_message_names_fragment() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = TemplateError::unmarshal("deployment", source);
        assert!(err.to_string().starts_with("Unmarshalling deployment error"));
    }
}
