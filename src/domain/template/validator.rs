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

use super::model::{FragmentKind, RawTemplate, RAW_TEMPLATE_ID_FIELD};
use crate::shared::error::{Result, TemplateError};
use regex::Regex;
use serde_json::Value;

/// Minimum instance id length, the prefix a short DNS name is built from.
pub const MIN_INSTANCE_ID_LEN: usize = 15;

const TEMPLATE_ID_PATTERN: &str = r"^[A-Za-z0-9][A-Za-z0-9._-]*$";

/// Ids of templates already in the catalog are whatever their directory is
/// called, so lookups only require a non-empty id.
pub fn require_template_id(template_id: &str) -> Result<()> {
    if template_id.is_empty() {
        return Err(TemplateError::validation("templateId can't be empty!"));
    }
    Ok(())
}

/// Rules for the id of a newly created template.
pub fn validate_template_id(template_id: &str) -> Result<()> {
    if template_id.is_empty() {
        return Err(TemplateError::validation("templateId can't be empty!"));
    }
    if template_id.contains("..") {
        return Err(TemplateError::validation(format!(
            "templateId can't contain '..': {}",
            template_id
        )));
    }

    let pattern = Regex::new(TEMPLATE_ID_PATTERN)
        .map_err(|e| TemplateError::config_error(format!("Invalid id pattern: {}", e)))?;
    if !pattern.is_match(template_id) {
        return Err(TemplateError::validation(format!(
            "Invalid templateId: {}. Only letters, digits, '.', '_' and '-' are allowed",
            template_id
        )));
    }

    Ok(())
}

pub fn validate_instance_id(instance_id: &str) -> Result<()> {
    if instance_id.is_empty() {
        return Err(TemplateError::validation("uuid can't be empty!"));
    }
    if instance_id.chars().count() < MIN_INSTANCE_ID_LEN {
        return Err(TemplateError::validation(format!(
            "instanceId has to be longer than {} characters!",
            MIN_INSTANCE_ID_LEN
        )));
    }
    Ok(())
}

/// Check a posted template and return its id.
///
/// Only the shape is checked here. The repository parses the objects before
/// anything is written.
pub fn validate_raw_template(raw: &RawTemplate) -> Result<String> {
    let id = match raw.get(RAW_TEMPLATE_ID_FIELD) {
        None | Some(Value::Null) => "",
        Some(Value::String(id)) => id.as_str(),
        Some(_) => return Err(TemplateError::validation("templateId has to be a string")),
    };
    validate_template_id(id)?;

    match raw.get("body") {
        None | Some(Value::Null) => {}
        Some(Value::Object(body)) => {
            for kind in FragmentKind::ALL {
                match body.get(kind.body_field()) {
                    None | Some(Value::Null) | Some(Value::Array(_)) => {}
                    Some(_) => {
                        return Err(TemplateError::validation(format!(
                            "body.{} has to be an array",
                            kind.body_field()
                        )))
                    }
                }
            }
        }
        Some(_) => return Err(TemplateError::validation("body has to be an object")),
    }

    match raw.get("hooks") {
        None | Some(Value::Null) | Some(Value::Object(_)) => {}
        Some(_) => return Err(TemplateError::validation("hooks has to be an object")),
    }

    Ok(id.to_string())
}
