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

//! Reading and writing blueprints in the catalog directory layout

use crate::domain::template::{FragmentKind, KubernetesBlueprint, RawTemplate, TemplateMetadata};
use crate::infrastructure::constants::*;
use crate::infrastructure::storage::TemplateStore;
use crate::shared::error::{Result, TemplateError};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

/// Collect the raw fragments of a template plan.
///
/// Templates without a plan directory are assembled from their `template.json`.
pub async fn read_blueprint(
    store: &dyn TemplateStore,
    metadata: &TemplateMetadata,
) -> Result<KubernetesBlueprint> {
    let template_path = PathBuf::from(&metadata.template_dir_name);

    if metadata.plan_dir_name.is_empty() {
        let raw = read_raw_template(store, &template_path.join(TEMPLATE_FILE)).await?;
        return blueprint_from_raw(&raw);
    }

    let plan_path = template_path.join(&metadata.plan_dir_name);
    let k8s_path = plan_path.join(K8S_DIR);
    let secrets_path = template_path.join(SECRET_TEMPLATES_DIR);

    let mut blueprint = KubernetesBlueprint::default();
    for kind in FragmentKind::ALL {
        *blueprint.fragments_mut(kind) =
            read_files_with_prefix(store, &k8s_path, kind.file_prefix(), JSON_SUFFIX).await?;
    }

    if blueprint.secrets.is_empty() && store.exists(&secrets_path).await? {
        debug!(
            "No secrets in {}, reading {}",
            k8s_path.display(),
            secrets_path.display()
        );
        blueprint.secrets = read_files_with_prefix(
            store,
            &secrets_path,
            FragmentKind::Secret.file_prefix(),
            "",
        )
        .await?;
    }

    let credentials_mappings =
        read_files_with_prefix(store, &plan_path, CREDENTIALS_MAPPINGS_PREFIX, JSON_SUFFIX).await?;
    let replicas =
        read_files_with_prefix(store, &plan_path, NODE_TEMPLATE_PREFIX, JSON_SUFFIX).await?;
    let uri_templates =
        read_files_with_prefix(store, &plan_path, URI_CLUSTER_TEMPLATE_PREFIX, "").await?;
    let components =
        read_files_with_prefix(store, &plan_path, COMPONENT_PREFIX, JSON_SUFFIX).await?;
    let plans = read_files_with_prefix(store, &plan_path, PLAN_PREFIX, JSON_SUFFIX).await?;
    let hooks = read_files_with_prefix(store, &k8s_path, HOOKS_PREFIX, JSON_SUFFIX).await?;

    if credentials_mappings.len() > 1 || replicas.len() > 1 {
        warn!(
            "Multiple credentials mappings or replica templates found for template {}, using only the first one",
            metadata.id
        );
    }

    blueprint.credentials_mapping = first_or_empty(credentials_mappings);
    blueprint.replica_template = first_or_empty(replicas);
    blueprint.uri_template = first_or_empty(uri_templates);
    blueprint.component = first_or_empty(components);
    blueprint.plan = first_or_empty(plans);
    blueprint.hooks = first_or_empty(hooks);

    Ok(blueprint)
}

pub async fn read_raw_template(store: &dyn TemplateStore, path: &Path) -> Result<RawTemplate> {
    let content = store.read_file(path).await?;
    serde_json::from_str(&content).map_err(|e| {
        error!("Unmarshalling {} error: {}", path.display(), e);
        TemplateError::unmarshal("template", e)
    })
}

/// Write a blueprint as a plan directory: `<plan>/k8s/<prefix>_<n>.json`,
/// `<plan>/k8s/hooks.json`, `<plan>/component.json` and `<plan>/plan.json`.
pub async fn write_blueprint(
    store: &dyn TemplateStore,
    plan_path: &Path,
    blueprint: &KubernetesBlueprint,
) -> Result<()> {
    let k8s_path = plan_path.join(K8S_DIR);
    store.create_dir_all(&k8s_path).await?;

    for kind in FragmentKind::ALL {
        for (i, fragment) in blueprint.fragments(kind).iter().enumerate() {
            let file_name = format!("{}_{:03}{}", kind.file_prefix(), i + 1, JSON_SUFFIX);
            store.write_file(&k8s_path.join(file_name), fragment).await?;
        }
    }

    let documents = [
        (k8s_path.join(format!("{}{}", HOOKS_PREFIX, JSON_SUFFIX)), &blueprint.hooks),
        (plan_path.join(format!("{}{}", COMPONENT_PREFIX, JSON_SUFFIX)), &blueprint.component),
        (plan_path.join(format!("{}{}", PLAN_PREFIX, JSON_SUFFIX)), &blueprint.plan),
    ];
    for (path, content) in documents {
        if !content.is_empty() {
            store.write_file(&path, content).await?;
        }
    }

    Ok(())
}

/// Split a raw template into blueprint fragments.
///
/// Every element of a `body` category array becomes one fragment. The rest
/// of `body` (such as `componentType`) becomes the component document.
pub fn blueprint_from_raw(raw: &RawTemplate) -> Result<KubernetesBlueprint> {
    let mut blueprint = KubernetesBlueprint::default();

    if let Some(Value::Object(body)) = raw.get(RAW_BODY_FIELD) {
        let mut component = body.clone();
        for kind in FragmentKind::ALL {
            if let Some(Value::Array(items)) = component.remove(kind.body_field()) {
                *blueprint.fragments_mut(kind) = items
                    .iter()
                    .map(serde_json::to_string)
                    .collect::<std::result::Result<_, _>>()?;
            }
        }
        component.retain(|_, value| !value.is_null());
        if !component.is_empty() {
            blueprint.component = serde_json::to_string(&component)?;
        }
    }

    if let Some(hooks) = raw.get(RAW_HOOKS_FIELD).filter(|v| v.is_object()) {
        blueprint.hooks = serde_json::to_string(hooks)?;
    }

    if let Some(plan) = raw.get(RAW_PLAN_FIELD).filter(|v| v.is_object()) {
        blueprint.plan = serde_json::to_string(plan)?;
    }

    Ok(blueprint)
}

/// Contents of every file in `dir` named `<prefix>*<suffix>`, in name order.
async fn read_files_with_prefix(
    store: &dyn TemplateStore,
    dir: &Path,
    prefix: &str,
    suffix: &str,
) -> Result<Vec<String>> {
    let mut results = Vec::new();
    for entry in store.list_dir(dir).await? {
        if !entry.is_dir && entry.name.starts_with(prefix) && entry.name.ends_with(suffix) {
            results.push(store.read_file(&dir.join(&entry.name)).await?);
        }
    }
    Ok(results)
}

fn first_or_empty(mut files: Vec<String>) -> String {
    if files.is_empty() {
        String::new()
    } else {
        files.swap_remove(0)
    }
}
