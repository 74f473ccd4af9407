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

//! Backing store for catalog files

pub mod filesystem;

pub use self::filesystem::FileSystemStore;

use crate::shared::error::Result;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreEntry {
    pub name: String,
    pub is_dir: bool,
}

/// All paths are relative to the catalog root. An empty path is the root.
#[async_trait::async_trait]
pub trait TemplateStore: Send + Sync {
    /// Entries of a directory, sorted by name.
    async fn list_dir(&self, path: &Path) -> Result<Vec<StoreEntry>>;

    async fn read_file(&self, path: &Path) -> Result<String>;

    /// Write a file, creating missing parent directories.
    async fn write_file(&self, path: &Path, contents: &str) -> Result<()>;

    async fn create_dir_all(&self, path: &Path) -> Result<()>;

    async fn remove_dir_all(&self, path: &Path) -> Result<()>;

    async fn exists(&self, path: &Path) -> Result<bool>;
}
