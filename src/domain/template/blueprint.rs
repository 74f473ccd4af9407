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

//! Turning a blueprint of raw fragments into a typed template

use super::model::{
    FragmentKind, HookType, KubernetesBlueprint, KubernetesComponent, PlanMetadata, Template,
};
use super::substitution::{adjust_params, encode_base64_placeholders};
use crate::shared::error::{Result, TemplateError};
use k8s_openapi::api::core::v1::Pod;
use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, HashMap};
use tracing::error;

/// Substitute placeholders in every fragment, then build the typed template.
pub fn parse_template(
    mut blueprint: KubernetesBlueprint,
    replacements: &HashMap<String, String>,
) -> Result<Template> {
    for kind in FragmentKind::ALL {
        for fragment in blueprint.fragments_mut(kind).iter_mut() {
            *fragment = adjust_params(fragment, replacements);
        }
    }
    blueprint.hooks = adjust_params(&blueprint.hooks, replacements);

    create_template_from_blueprint(&blueprint, false)
}

/// Unmarshal every fragment into its Kubernetes type.
///
/// The first fragment that fails to parse aborts the whole template. With
/// `encode_secrets`, `$base64-` markers in secrets are encoded first so an
/// unsubstituted secret still carries valid base64 data.
pub fn create_template_from_blueprint(
    blueprint: &KubernetesBlueprint,
    encode_secrets: bool,
) -> Result<Template> {
    let mut body: KubernetesComponent = if blueprint.component.trim().is_empty() {
        KubernetesComponent::default()
    } else {
        parse_document(&blueprint.component, "component")?
    };

    body.persistent_volume_claims.extend(parse_fragments(
        &blueprint.persistent_volume_claims,
        FragmentKind::PersistentVolumeClaim,
    )?);

    if encode_secrets {
        let encoded: Vec<String> = blueprint
            .secrets
            .iter()
            .map(|secret| encode_base64_placeholders(secret))
            .collect();
        body.secrets
            .extend(parse_fragments(&encoded, FragmentKind::Secret)?);
    } else {
        body.secrets
            .extend(parse_fragments(&blueprint.secrets, FragmentKind::Secret)?);
    }

    body.deployments
        .extend(parse_fragments(&blueprint.deployments, FragmentKind::Deployment)?);
    body.ingresses
        .extend(parse_fragments(&blueprint.ingresses, FragmentKind::Ingress)?);
    body.services
        .extend(parse_fragments(&blueprint.services, FragmentKind::Service)?);
    body.service_accounts.extend(parse_fragments(
        &blueprint.service_accounts,
        FragmentKind::ServiceAccount,
    )?);

    let hooks: BTreeMap<HookType, Pod> = if blueprint.hooks.trim().is_empty() {
        BTreeMap::new()
    } else {
        parse_document(&blueprint.hooks, "hook")?
    };

    let plan: Option<PlanMetadata> = if blueprint.plan.trim().is_empty() {
        None
    } else {
        Some(parse_document(&blueprint.plan, "plan")?)
    };

    Ok(Template {
        id: String::new(),
        body,
        hooks,
        plan,
    })
}

fn parse_fragments<T: DeserializeOwned>(fragments: &[String], kind: FragmentKind) -> Result<Vec<T>> {
    fragments
        .iter()
        .map(|fragment| parse_document(fragment, kind.as_str()))
        .collect()
}

fn parse_document<T: DeserializeOwned>(content: &str, kind: &str) -> Result<T> {
    serde_json::from_str(content).map_err(|e| {
        error!("Unmarshalling {} error: {}", kind, e);
        TemplateError::unmarshal(kind, e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::template::model::ComponentType;
    use kube::ResourceExt;

    const DEPLOYMENT: &str = r#"{
        "apiVersion": "apps/v1",
        "kind": "Deployment",
        "metadata": {"name": "$short_instance_id", "labels": {"org": "$org"}},
        "spec": {
            "selector": {"matchLabels": {"app": "$short_instance_id"}},
            "template": {
                "metadata": {"labels": {"app": "$short_instance_id"}},
                "spec": {"containers": [{"name": "main", "image": "$image"}]}
            }
        }
    }"#;

    const SECRET: &str = r#"{
        "apiVersion": "v1",
        "kind": "Secret",
        "metadata": {"name": "$short_instance_id-credentials"},
        "data": {"password": "$base64-$random0"}
    }"#;

    const HOOKS: &str = r#"{
        "provision": {
            "metadata": {"name": "$short_instance_id-provision"},
            "spec": {"containers": [{"name": "hook", "image": "busybox"}]}
        }
    }"#;

    fn blueprint() -> KubernetesBlueprint {
        KubernetesBlueprint {
            deployments: vec![DEPLOYMENT.to_string()],
            secrets: vec![SECRET.to_string()],
            hooks: HOOKS.to_string(),
            component: r#"{"componentType": "broker"}"#.to_string(),
            plan: r#"{"name": "simple", "free": true}"#.to_string(),
            ..Default::default()
        }
    }

    fn replacements() -> HashMap<String, String> {
        let mut map = HashMap::new();
        map.insert(
            "$instance_id".to_string(),
            "a5740d8a-9f4b-4711-a1a0-eae62db54474".to_string(),
        );
        map.insert("$image".to_string(), "nginx:1.25".to_string());
        map.insert("$org".to_string(), "acme".to_string());
        map
    }

    #[test]
    fn test_parse_template_substitutes_every_fragment() {
        let template = parse_template(blueprint(), &replacements()).unwrap();

        assert_eq!(template.body.component_type, ComponentType::Broker);
        assert_eq!(template.body.deployments.len(), 1);
        let deployment = &template.body.deployments[0];
        assert_eq!(deployment.name_any(), "xa5740d8a9f4b4");
        assert_eq!(deployment.labels().get("org").map(String::as_str), Some("acme"));

        let container = &deployment
            .spec
            .as_ref()
            .unwrap()
            .template
            .spec
            .as_ref()
            .unwrap()
            .containers[0];
        assert_eq!(container.image.as_deref(), Some("nginx:1.25"));

        let secret = &template.body.secrets[0];
        let password = secret.data.as_ref().unwrap().get("password").unwrap();
        assert_eq!(password.0.len(), 10);

        let hook = template.hooks.get(&HookType::Provision).unwrap();
        assert_eq!(hook.name_any(), "xa5740d8a9f4b4-provision");

        let plan = template.plan.unwrap();
        assert_eq!(plan.name, "simple");
        assert!(plan.free);
    }

    #[test]
    fn test_component_type_defaults_to_instance() {
        let blueprint = KubernetesBlueprint::default();
        let template = create_template_from_blueprint(&blueprint, false).unwrap();
        assert_eq!(template.body.component_type, ComponentType::Instance);
        assert!(template.hooks.is_empty());
        assert!(template.plan.is_none());
    }

    #[test]
    fn test_unsubstituted_secret_needs_encoding() {
        let blueprint = KubernetesBlueprint {
            secrets: vec![r#"{"metadata": {"name": "s"}, "data": {"k": "$base64-value"}}"#.to_string()],
            ..Default::default()
        };

        assert!(create_template_from_blueprint(&blueprint, false).is_err());

        let template = create_template_from_blueprint(&blueprint, true).unwrap();
        let data = template.body.secrets[0].data.as_ref().unwrap();
        assert_eq!(data.get("k").unwrap().0, b"value".to_vec());
    }

    #[test]
    fn test_malformed_fragment_aborts() {
        let mut blueprint = blueprint();
        blueprint.services.push("{ not json".to_string());

        let err = parse_template(blueprint, &replacements()).unwrap_err();
        assert!(err.to_string().contains("Unmarshalling service error"));
    }
}
