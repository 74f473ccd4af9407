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

//! In-memory index of the templates found in the catalog

use crate::domain::template::TemplateMetadata;
use crate::infrastructure::constants::{
    DEFAULT_PLAN_DIR, K8S_DIR, SECRET_TEMPLATES_DIR, TEMPLATE_FILE,
};
use crate::infrastructure::storage::TemplateStore;
use crate::shared::error::{Result, TemplateError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

pub struct TemplateIndex {
    store: Arc<dyn TemplateStore>,
    entries: RwLock<HashMap<String, TemplateMetadata>>,
}

impl TemplateIndex {
    pub fn new(store: Arc<dyn TemplateStore>) -> Self {
        Self {
            store,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Rescan the catalog and replace the whole index.
    ///
    /// The new map is built without holding the lock. On error the previous
    /// index stays in place.
    pub async fn refresh(&self) -> Result<usize> {
        let entries = self.scan().await?;
        let count = entries.len();

        *self.entries.write().await = entries;
        info!("Template index refreshed, {} templates loaded", count);
        Ok(count)
    }

    pub async fn get(&self, id: &str) -> Option<TemplateMetadata> {
        self.entries.read().await.get(id).cloned()
    }

    pub async fn snapshot(&self) -> HashMap<String, TemplateMetadata> {
        self.entries.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    async fn scan(&self) -> Result<HashMap<String, TemplateMetadata>> {
        let mut entries: HashMap<String, TemplateMetadata> = HashMap::new();
        let root = Path::new("");

        if !self.store.exists(root).await? {
            error!("Catalog root doesn't exist, can't load templates");
            return Err(TemplateError::config_error("Catalog root doesn't exist"));
        }

        for type_entry in self.store.list_dir(root).await? {
            if !type_entry.is_dir {
                debug!("NOT A DIR - skipping {}", type_entry.name);
                continue;
            }
            debug!("Loading templates of type {}", type_entry.name);

            let type_path = PathBuf::from(&type_entry.name);
            for template_entry in self.store.list_dir(&type_path).await? {
                if !template_entry.is_dir {
                    debug!("NOT A DIR - skipping template {}", template_entry.name);
                    continue;
                }

                let id = template_entry.name;
                let template_dir_name = format!("{}/{}", type_entry.name, id);
                let Some(metadata) = self.load_template(&id, &template_dir_name).await? else {
                    continue;
                };

                if let Some(existing) = entries.get(&id) {
                    warn!(
                        "Template id {} in {} already loaded from {}, skipping",
                        id, template_dir_name, existing.template_dir_name
                    );
                    continue;
                }

                debug!("LOADED - template id: {} from {}", id, template_dir_name);
                entries.insert(id, metadata);
            }
        }

        Ok(entries)
    }

    async fn load_template(
        &self,
        id: &str,
        template_dir_name: &str,
    ) -> Result<Option<TemplateMetadata>> {
        let template_path = PathBuf::from(template_dir_name);
        let mut plan_dirs = Vec::new();
        let mut has_template_file = false;

        for entry in self.store.list_dir(&template_path).await? {
            if !entry.is_dir {
                has_template_file |= entry.name == TEMPLATE_FILE;
                continue;
            }
            if entry.name == SECRET_TEMPLATES_DIR {
                continue;
            }
            let k8s_path = template_path.join(&entry.name).join(K8S_DIR);
            if self.store.exists(&k8s_path).await? {
                plan_dirs.push(entry.name);
            }
        }

        let plan_dir_name = if plan_dirs.iter().any(|p| p == DEFAULT_PLAN_DIR) {
            DEFAULT_PLAN_DIR.to_string()
        } else if let Some(first) = plan_dirs.into_iter().next() {
            first
        } else if has_template_file {
            String::new()
        } else {
            warn!(
                "Can't find required {} file or plan directory for template: {}",
                TEMPLATE_FILE, id
            );
            return Ok(None);
        };

        Ok(Some(TemplateMetadata::new(id, template_dir_name, plan_dir_name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::FileSystemStore;

    async fn store_with(files: &[&str]) -> (tempfile::TempDir, Arc<FileSystemStore>) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FileSystemStore::new(dir.path()));
        for file in files {
            store.write_file(Path::new(file), "{}").await.unwrap();
        }
        (dir, store)
    }

    #[tokio::test]
    async fn test_refresh_registers_templates() {
        let (_dir, store) = store_with(&[
            "core/mysql/default/k8s/deployment_001.json",
            "core/mysql/small/k8s/deployment_001.json",
            "core/redis/b-plan/k8s/service_001.json",
            "core/redis/a-plan/k8s/service_001.json",
            "custom/test/template.json",
            "core/broken/readme.txt",
            "core/notes.txt",
        ])
        .await;

        let index = TemplateIndex::new(store);
        assert_eq!(index.refresh().await.unwrap(), 3);

        let mysql = index.get("mysql").await.unwrap();
        assert_eq!(mysql.template_dir_name, "core/mysql");
        assert_eq!(mysql.plan_dir_name, "default");

        let redis = index.get("redis").await.unwrap();
        assert_eq!(redis.plan_dir_name, "a-plan");

        let custom = index.get("test").await.unwrap();
        assert_eq!(custom.template_dir_name, "custom/test");
        assert_eq!(custom.plan_dir_name, "");

        assert!(index.get("broken").await.is_none());
    }

    #[tokio::test]
    async fn test_secret_templates_is_not_a_plan() {
        let (_dir, store) = store_with(&["core/db/secretTemplates/k8s/secret.json"]).await;

        let index = TemplateIndex::new(store);
        assert_eq!(index.refresh().await.unwrap(), 0);
        assert!(index.is_empty().await);
    }

    #[tokio::test]
    async fn test_refresh_replaces_entries() {
        let (_dir, store) = store_with(&["custom/first/template.json"]).await;
        let index = TemplateIndex::new(store.clone());
        index.refresh().await.unwrap();
        assert_eq!(index.len().await, 1);

        store.remove_dir_all(Path::new("custom/first")).await.unwrap();
        store
            .write_file(Path::new("custom/second/template.json"), "{}")
            .await
            .unwrap();
        index.refresh().await.unwrap();

        let snapshot = index.snapshot().await;
        assert_eq!(snapshot.len(), 1);
        assert!(snapshot.contains_key("second"));
    }

    #[tokio::test]
    async fn test_missing_root_fails_refresh() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FileSystemStore::new(dir.path().join("absent")));

        let index = TemplateIndex::new(store);
        let err = index.refresh().await.unwrap_err();
        assert!(matches!(err, TemplateError::ConfigError(_)));
        assert!(index.is_empty().await);
    }
}
