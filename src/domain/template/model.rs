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

//! Template data model

use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{
    PersistentVolumeClaim, Pod, Secret, Service, ServiceAccount,
};
use k8s_openapi::api::networking::v1::Ingress;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Field of a raw template holding its identifier.
pub const RAW_TEMPLATE_ID_FIELD: &str = "id";

/// A template exactly as stored in `template.json`.
pub type RawTemplate = serde_json::Map<String, serde_json::Value>;

/// Location of a template's files relative to the catalog root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateMetadata {
    pub id: String,
    /// `<type>/<templateId>`
    pub template_dir_name: String,
    pub plan_dir_name: String,
}

impl TemplateMetadata {
    pub fn new(
        id: impl Into<String>,
        template_dir_name: impl Into<String>,
        plan_dir_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            template_dir_name: template_dir_name.into(),
            plan_dir_name: plan_dir_name.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentType {
    Broker,
    #[default]
    Instance,
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HookType {
    Deployment,
    Provision,
    Deprovision,
    Bind,
    Unbind,
    Removal,
}

/// Contents of a plan's `plan.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlanMetadata {
    pub id: String,
    pub name: String,
    pub description: String,
    pub free: bool,
}

/// Typed Kubernetes objects making up one template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KubernetesComponent {
    pub component_type: ComponentType,
    pub persistent_volume_claims: Vec<PersistentVolumeClaim>,
    pub deployments: Vec<Deployment>,
    pub ingresses: Vec<Ingress>,
    pub services: Vec<Service>,
    pub service_accounts: Vec<ServiceAccount>,
    pub secrets: Vec<Secret>,
}

impl KubernetesComponent {
    pub fn object_count(&self) -> usize {
        self.persistent_volume_claims.len()
            + self.deployments.len()
            + self.ingresses.len()
            + self.services.len()
            + self.service_accounts.len()
            + self.secrets.len()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Template {
    pub id: String,
    pub body: KubernetesComponent,
    pub hooks: BTreeMap<HookType, Pod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<PlanMetadata>,
}

/// Manifest fragment categories, each stored as `<prefix>_<n>.json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentKind {
    PersistentVolumeClaim,
    Secret,
    Deployment,
    Ingress,
    Service,
    ServiceAccount,
}

impl FragmentKind {
    pub const ALL: [FragmentKind; 6] = [
        FragmentKind::PersistentVolumeClaim,
        FragmentKind::Secret,
        FragmentKind::Deployment,
        FragmentKind::Ingress,
        FragmentKind::Service,
        FragmentKind::ServiceAccount,
    ];

    /// File name prefix fragments of this kind are stored under.
    pub fn file_prefix(&self) -> &'static str {
        match self {
            FragmentKind::PersistentVolumeClaim => "persistentvolumeclaim",
            FragmentKind::Secret => "secret",
            FragmentKind::Deployment => "deployment",
            FragmentKind::Ingress => "ingress",
            FragmentKind::Service => "service",
            FragmentKind::ServiceAccount => "account",
        }
    }

    /// Key of this category inside a template body.
    pub fn body_field(&self) -> &'static str {
        match self {
            FragmentKind::PersistentVolumeClaim => "persistentVolumeClaims",
            FragmentKind::Secret => "secrets",
            FragmentKind::Deployment => "deployments",
            FragmentKind::Ingress => "ingresses",
            FragmentKind::Service => "services",
            FragmentKind::ServiceAccount => "serviceAccounts",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FragmentKind::PersistentVolumeClaim => "PersistentVolumeClaim",
            FragmentKind::Secret => "secret",
            FragmentKind::Deployment => "deployment",
            FragmentKind::Ingress => "ingress",
            FragmentKind::Service => "service",
            FragmentKind::ServiceAccount => "service account",
        }
    }
}

/// Raw manifest fragments collected for one template plan, before substitution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KubernetesBlueprint {
    pub persistent_volume_claims: Vec<String>,
    pub secrets: Vec<String>,
    pub deployments: Vec<String>,
    pub ingresses: Vec<String>,
    pub services: Vec<String>,
    pub service_accounts: Vec<String>,
    pub hooks: String,
    pub component: String,
    pub plan: String,
    pub credentials_mapping: String,
    pub replica_template: String,
    pub uri_template: String,
}

impl KubernetesBlueprint {
    pub fn fragments(&self, kind: FragmentKind) -> &[String] {
        match kind {
            FragmentKind::PersistentVolumeClaim => &self.persistent_volume_claims,
            FragmentKind::Secret => &self.secrets,
            FragmentKind::Deployment => &self.deployments,
            FragmentKind::Ingress => &self.ingresses,
            FragmentKind::Service => &self.services,
            FragmentKind::ServiceAccount => &self.service_accounts,
        }
    }

    pub fn fragments_mut(&mut self, kind: FragmentKind) -> &mut Vec<String> {
        match kind {
            FragmentKind::PersistentVolumeClaim => &mut self.persistent_volume_claims,
            FragmentKind::Secret => &mut self.secrets,
            FragmentKind::Deployment => &mut self.deployments,
            FragmentKind::Ingress => &mut self.ingresses,
            FragmentKind::Service => &mut self.services,
            FragmentKind::ServiceAccount => &mut self.service_accounts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_defaults_when_fields_missing() {
        let template: Template = serde_json::from_str(r#"{"id":"test"}"#).unwrap();
        assert_eq!(template.id, "test");
        assert_eq!(template.body.component_type, ComponentType::Instance);
        assert!(template.hooks.is_empty());
        assert_eq!(template.body.object_count(), 0);
    }

    #[test]
    fn test_component_uses_camel_case_keys() {
        let json = serde_json::to_value(KubernetesComponent::default()).unwrap();
        assert_eq!(json["componentType"], "instance");
        assert!(json.get("persistentVolumeClaims").is_some());
        assert!(json.get("serviceAccounts").is_some());
    }

    #[test]
    fn test_hooks_keyed_by_lowercase_name() {
        let template: Template =
            serde_json::from_str(r#"{"id":"t","hooks":{"provision":{"metadata":{"name":"p"}}}}"#)
                .unwrap();
        let pod = template.hooks.get(&HookType::Provision).unwrap();
        assert_eq!(pod.metadata.name.as_deref(), Some("p"));
    }

    #[test]
    fn test_fragment_prefixes() {
        assert_eq!(FragmentKind::ServiceAccount.file_prefix(), "account");
        assert_eq!(FragmentKind::Secret.body_field(), "secrets");
        assert_eq!(FragmentKind::ALL.len(), 6);
    }
}
