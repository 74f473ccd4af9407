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

use super::{StoreEntry, TemplateStore};
use crate::shared::error::{Result, TemplateError};
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::{debug, error};

/// Catalog stored as a plain directory tree.
#[derive(Debug, Clone)]
pub struct FileSystemStore {
    root: PathBuf,
}

impl FileSystemStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &Path) -> Result<PathBuf> {
        if path
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(TemplateError::forbidden(format!(
                "Path {} escapes the catalog root",
                path.display()
            )));
        }
        Ok(self.root.join(path))
    }
}

#[async_trait::async_trait]
impl TemplateStore for FileSystemStore {
    async fn list_dir(&self, path: &Path) -> Result<Vec<StoreEntry>> {
        let full_path = self.resolve(path)?;
        let mut reader = fs::read_dir(&full_path).await.map_err(|e| {
            error!("Read dir {} failed: {}", full_path.display(), e);
            e
        })?;

        let mut entries = Vec::new();
        while let Some(entry) = reader.next_entry().await? {
            let is_dir = entry.file_type().await?.is_dir();
            entries.push(StoreEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir,
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    async fn read_file(&self, path: &Path) -> Result<String> {
        let full_path = self.resolve(path)?;
        debug!("Reading {}", full_path.display());
        fs::read_to_string(&full_path).await.map_err(|e| {
            error!("Error reading file {}: {}", full_path.display(), e);
            e.into()
        })
    }

    async fn write_file(&self, path: &Path, contents: &str) -> Result<()> {
        let full_path = self.resolve(path)?;
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&full_path, contents).await.map_err(|e| {
            error!("Save file {} failed: {}", full_path.display(), e);
            e.into()
        })
    }

    async fn create_dir_all(&self, path: &Path) -> Result<()> {
        let full_path = self.resolve(path)?;
        fs::create_dir_all(&full_path).await?;
        Ok(())
    }

    async fn remove_dir_all(&self, path: &Path) -> Result<()> {
        let full_path = self.resolve(path)?;
        match fs::remove_dir_all(&full_path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, path: &Path) -> Result<bool> {
        let full_path = self.resolve(path)?;
        Ok(fs::try_exists(&full_path).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_then_list_and_read() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSystemStore::new(dir.path());

        store
            .write_file(Path::new("custom/t/default/k8s/service_001.json"), "{}")
            .await
            .unwrap();
        store
            .write_file(Path::new("custom/t/template.json"), r#"{"id":"t"}"#)
            .await
            .unwrap();

        let entries = store.list_dir(Path::new("custom/t")).await.unwrap();
        assert_eq!(
            entries,
            vec![
                StoreEntry {
                    name: "default".to_string(),
                    is_dir: true
                },
                StoreEntry {
                    name: "template.json".to_string(),
                    is_dir: false
                },
            ]
        );

        let content = store.read_file(Path::new("custom/t/template.json")).await.unwrap();
        assert_eq!(content, r#"{"id":"t"}"#);
        assert!(store.exists(Path::new("custom/t/default/k8s")).await.unwrap());
    }

    #[tokio::test]
    async fn test_remove_dir_all_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSystemStore::new(dir.path());

        store.create_dir_all(Path::new("custom/gone")).await.unwrap();
        store.remove_dir_all(Path::new("custom/gone")).await.unwrap();
        assert!(!store.exists(Path::new("custom/gone")).await.unwrap());
        store.remove_dir_all(Path::new("custom/gone")).await.unwrap();
    }

    #[tokio::test]
    async fn test_paths_cannot_escape_root() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSystemStore::new(dir.path());

        let err = store.read_file(Path::new("../etc/passwd")).await.unwrap_err();
        assert_eq!(err.status_code(), 403);
        assert!(store.exists(Path::new("/etc")).await.is_err());
    }
}
