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

//! Per-plan filtering of template objects

use super::model::Template;
use kube::ResourceExt;

/// Annotation listing the plans an object belongs to, comma separated.
pub const PLAN_NAMES_ANNOTATION: &str = "plan_names";

/// Keep only objects belonging to `plan_name`.
///
/// An object without the annotation, or with an empty one, belongs to every
/// plan. An empty `plan_name` keeps everything.
pub fn filter_by_plan_name(mut template: Template, plan_name: &str) -> Template {
    if plan_name.is_empty() {
        return template;
    }

    let body = &mut template.body;
    body.persistent_volume_claims
        .retain(|o| belongs_to_plan(o, plan_name));
    body.secrets.retain(|o| belongs_to_plan(o, plan_name));
    body.deployments.retain(|o| belongs_to_plan(o, plan_name));
    body.ingresses.retain(|o| belongs_to_plan(o, plan_name));
    body.services.retain(|o| belongs_to_plan(o, plan_name));
    body.service_accounts
        .retain(|o| belongs_to_plan(o, plan_name));
    template.hooks.retain(|_, pod| belongs_to_plan(pod, plan_name));

    template
}

fn belongs_to_plan<K: ResourceExt>(object: &K, plan_name: &str) -> bool {
    match object.annotations().get(PLAN_NAMES_ANNOTATION) {
        None => true,
        Some(plans) if plans.trim().is_empty() => true,
        Some(plans) => plans.split(',').any(|p| p.trim() == plan_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::template::model::HookType;
    use k8s_openapi::api::apps::v1::Deployment;
    use k8s_openapi::api::core::v1::Pod;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
    use std::collections::BTreeMap;

    fn meta(name: &str, plans: Option<&str>) -> ObjectMeta {
        let annotations = plans.map(|p| {
            let mut map = BTreeMap::new();
            map.insert(PLAN_NAMES_ANNOTATION.to_string(), p.to_string());
            map
        });
        ObjectMeta {
            name: Some(name.to_string()),
            annotations,
            ..Default::default()
        }
    }

    fn template() -> Template {
        let mut template = Template::default();
        for (name, plans) in [
            ("both", Some("A,B")),
            ("only-a", Some("A")),
            ("empty", Some("")),
            ("none", None),
        ] {
            template.body.deployments.push(Deployment {
                metadata: meta(name, plans),
                ..Default::default()
            });
        }
        template
    }

    #[test]
    fn test_filter_plan_a() {
        let filtered = filter_by_plan_name(template(), "A");
        assert_eq!(filtered.body.deployments.len(), 4);
    }

    #[test]
    fn test_filter_plan_b() {
        let filtered = filter_by_plan_name(template(), "B");
        let names: Vec<String> = filtered
            .body
            .deployments
            .iter()
            .map(|d| d.name_any())
            .collect();
        assert_eq!(names, vec!["both", "empty", "none"]);
    }

    #[test]
    fn test_filter_empty_plan_keeps_everything() {
        let filtered = filter_by_plan_name(template(), "");
        assert_eq!(filtered.body.deployments.len(), 4);
    }

    #[test]
    fn test_filter_unknown_plan() {
        let filtered = filter_by_plan_name(template(), "C");
        assert_eq!(filtered.body.deployments.len(), 2);
    }

    #[test]
    fn test_filter_applies_to_hooks() {
        let mut template = Template::default();
        template.hooks.insert(
            HookType::Provision,
            Pod {
                metadata: meta("provision", Some("A")),
                ..Default::default()
            },
        );
        template.hooks.insert(
            HookType::Bind,
            Pod {
                metadata: meta("bind", None),
                ..Default::default()
            },
        );

        let filtered = filter_by_plan_name(template, "B");
        assert_eq!(filtered.hooks.len(), 1);
        assert!(filtered.hooks.contains_key(&HookType::Bind));
    }
}
