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

use super::error::ApiError;
use super::AppState;
use crate::domain::template::placeholders::{QUERY_INSTANCE_ID, QUERY_PLAN_NAME};
use crate::domain::template::validator::{require_template_id, validate_instance_id};
use crate::domain::template::{build_replacements, RawTemplate, Template};
use crate::shared::error::TemplateError;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};
use std::collections::HashMap;
use tracing::{info, warn};

pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "template-repository",
        "version": env!("CARGO_PKG_VERSION"),
        "templates": state.repository.index().len().await,
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

pub async fn list_templates(State(state): State<AppState>) -> Result<Json<Vec<Template>>, ApiError> {
    info!("API: Listing templates");
    let templates = state.repository.list_templates().await?;
    Ok(Json(templates))
}

pub async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RawTemplate>, ApiError> {
    info!("API: Getting template: {}", id);
    require_template_id(&id)?;
    let template = state.repository.get_raw_template(&id).await?;
    Ok(Json(template))
}

pub async fn get_parsed_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<Template>, ApiError> {
    let instance_id = query
        .get(QUERY_INSTANCE_ID)
        .map(String::as_str)
        .unwrap_or_default();
    let plan_name = query
        .get(QUERY_PLAN_NAME)
        .map(String::as_str)
        .unwrap_or_default();
    info!(
        "API: Rendering template {} for instance {}",
        id, instance_id
    );

    require_template_id(&id)?;
    validate_instance_id(instance_id)?;

    let replacements = build_replacements(instance_id, &state.domain, &query);
    let template = state
        .repository
        .get_parsed_template(&id, &replacements, plan_name)
        .await?;
    Ok(Json(template))
}

pub async fn create_template(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let raw: RawTemplate = serde_json::from_slice(&body).map_err(|e| {
        warn!("API: Rejecting malformed template: {}", e);
        TemplateError::validation(format!("Malformed template: {}", e))
    })?;

    let id = state.repository.add_custom_template(raw).await?;
    info!("API: Created template: {}", id);
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": id,
            "status": "created",
        })),
    ))
}

pub async fn delete_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    info!("API: Deleting template: {}", id);
    state.repository.remove_custom_template(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
