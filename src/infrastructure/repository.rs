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

use crate::domain::template::validator::validate_raw_template;
use crate::domain::template::{
    create_template_from_blueprint, filter_by_plan_name, parse_template, KubernetesBlueprint,
    RawTemplate, Template, TemplateMetadata,
};
use crate::infrastructure::catalog::{
    blueprint_from_raw, read_blueprint, read_raw_template, write_blueprint,
};
use crate::infrastructure::constants::{CUSTOM_DIR, DEFAULT_PLAN_DIR, TEMPLATE_FILE};
use crate::infrastructure::index::TemplateIndex;
use crate::infrastructure::storage::TemplateStore;
use crate::shared::error::{Result, TemplateError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, error, info, warn};

/// Templates stored in a catalog, looked up through an in-memory index.
pub struct TemplateRepository {
    store: Arc<dyn TemplateStore>,
    index: TemplateIndex,
    /// Serializes create and delete.
    write_lock: Mutex<()>,
}

impl TemplateRepository {
    pub fn new(store: Arc<dyn TemplateStore>) -> Self {
        Self {
            index: TemplateIndex::new(store.clone()),
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Create the repository and load the index.
    pub async fn open(store: Arc<dyn TemplateStore>) -> Result<Self> {
        let repository = Self::new(store);
        repository.refresh().await?;
        Ok(repository)
    }

    pub async fn refresh(&self) -> Result<usize> {
        self.index.refresh().await
    }

    pub fn index(&self) -> &TemplateIndex {
        &self.index
    }

    pub async fn get_metadata(&self, id: &str) -> Result<TemplateMetadata> {
        self.index
            .get(id)
            .await
            .ok_or_else(|| TemplateError::not_found(id))
    }

    /// Every template, unsubstituted, sorted by id.
    pub async fn list_templates(&self) -> Result<Vec<Template>> {
        let mut metadata: Vec<TemplateMetadata> =
            self.index.snapshot().await.into_values().collect();
        metadata.sort_by(|a, b| a.id.cmp(&b.id));

        let mut templates = Vec::with_capacity(metadata.len());
        for meta in &metadata {
            templates.push(self.assemble(meta).await?);
        }
        debug!("Listed {} templates", templates.len());
        Ok(templates)
    }

    /// The stored `template.json`, or the assembled template when there is none.
    pub async fn get_raw_template(&self, id: &str) -> Result<RawTemplate> {
        let metadata = self.get_metadata(id).await?;
        let template_file = PathBuf::from(&metadata.template_dir_name).join(TEMPLATE_FILE);

        if self.store.exists(&template_file).await? {
            return read_raw_template(self.store.as_ref(), &template_file).await;
        }

        let template = self.assemble(&metadata).await?;
        match serde_json::to_value(&template)? {
            serde_json::Value::Object(raw) => Ok(raw),
            _ => Err(TemplateError::validation(format!(
                "Template {} is not a JSON object",
                id
            ))),
        }
    }

    /// Render a template for one instance.
    pub async fn get_parsed_template(
        &self,
        id: &str,
        replacements: &HashMap<String, String>,
        plan_name: &str,
    ) -> Result<Template> {
        let metadata = self.get_metadata(id).await?;
        let blueprint = read_blueprint(self.store.as_ref(), &metadata).await?;

        let mut template = parse_template(blueprint, replacements).map_err(|e| {
            error!("Rendering template {} failed: {}", id, e);
            e
        })?;
        template.id = metadata.id;

        info!(
            "Rendered template {} (plan: {}, {} objects)",
            id,
            if plan_name.is_empty() { "-" } else { plan_name },
            template.body.object_count()
        );
        Ok(filter_by_plan_name(template, plan_name))
    }

    /// Store a new template under `custom/<id>/` and register it.
    pub async fn add_custom_template(&self, raw: RawTemplate) -> Result<String> {
        let id = validate_raw_template(&raw)?;

        let blueprint = blueprint_from_raw(&raw)?;
        create_template_from_blueprint(&blueprint, true).map_err(|e| {
            TemplateError::validation(format!("Invalid template {}: {}", id, e))
        })?;

        let guard = self.write_lock.lock().await;

        let template_path = Path::new(CUSTOM_DIR).join(&id);
        if self.index.get(&id).await.is_some() || self.store.exists(&template_path).await? {
            warn!("Template with Id: {} already exists!", id);
            return Err(TemplateError::already_exists(id));
        }

        if let Err(e) = self.write_custom_template(&template_path, &raw, &blueprint).await {
            error!("Saving template {} failed: {}", id, e);
            if let Err(cleanup) = self.store.remove_dir_all(&template_path).await {
                warn!("Cleanup of {} failed: {}", template_path.display(), cleanup);
            }
            return Err(e);
        }

        self.refresh_after_write(guard, &id, "created").await?;
        info!("Template {} created", id);
        Ok(id)
    }

    /// Delete a template created through [`Self::add_custom_template`].
    pub async fn remove_custom_template(&self, id: &str) -> Result<()> {
        if id.contains("..") {
            return Err(TemplateError::validation("illegal templateId"));
        }

        let guard = self.write_lock.lock().await;

        let metadata = self.get_metadata(id).await?;
        let custom_prefix = format!("{}/", CUSTOM_DIR);
        if !metadata.template_dir_name.starts_with(&custom_prefix) {
            return Err(TemplateError::forbidden(format!(
                "removing template {} is forbidden",
                id
            )));
        }

        self.store
            .remove_dir_all(Path::new(&metadata.template_dir_name))
            .await?;
        self.refresh_after_write(guard, id, "deleted").await?;
        info!("Template {} deleted", id);
        Ok(())
    }

    /// Refresh after a change is already on disk. A failed refresh is retried
    /// once after the write lock is released. If that fails too the change
    /// stays stored but the index is stale until the next successful refresh.
    async fn refresh_after_write(
        &self,
        guard: MutexGuard<'_, ()>,
        id: &str,
        action: &str,
    ) -> Result<()> {
        let first = self.index.refresh().await;
        drop(guard);

        if let Err(e) = first {
            warn!(
                "Template {} {} on disk, index refresh failed: {}, retrying",
                id, action, e
            );
            if let Err(e) = self.index.refresh().await {
                error!(
                    "Template {} {} on disk but the index is stale: {}",
                    id, action, e
                );
                return Err(e);
            }
        }
        Ok(())
    }

    async fn assemble(&self, metadata: &TemplateMetadata) -> Result<Template> {
        let blueprint = read_blueprint(self.store.as_ref(), metadata).await?;
        let mut template = create_template_from_blueprint(&blueprint, true)?;
        template.id = metadata.id.clone();
        Ok(template)
    }

    async fn write_custom_template(
        &self,
        template_path: &Path,
        raw: &RawTemplate,
        blueprint: &KubernetesBlueprint,
    ) -> Result<()> {
        let content = serde_json::to_string_pretty(raw)?;
        self.store
            .write_file(&template_path.join(TEMPLATE_FILE), &content)
            .await?;
        write_blueprint(
            self.store.as_ref(),
            &template_path.join(DEFAULT_PLAN_DIR),
            blueprint,
        )
        .await
    }
}
