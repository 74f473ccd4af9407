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

/// Catalog layout: `<root>/<type>/<templateId>/<plan>/k8s/`
pub const TEMPLATE_FILE: &str = "template.json";
pub const K8S_DIR: &str = "k8s";
pub const SECRET_TEMPLATES_DIR: &str = "secretTemplates";
pub const DEFAULT_PLAN_DIR: &str = "default";

/// Template type directory holding templates created through the API
pub const CUSTOM_DIR: &str = "custom";

/// Fragment files
pub const JSON_SUFFIX: &str = ".json";
pub const HOOKS_PREFIX: &str = "hooks";
pub const COMPONENT_PREFIX: &str = "component";
pub const PLAN_PREFIX: &str = "plan";
pub const CREDENTIALS_MAPPINGS_PREFIX: &str = "credentials-mappings";
pub const NODE_TEMPLATE_PREFIX: &str = "node_template";
pub const URI_CLUSTER_TEMPLATE_PREFIX: &str = "uri_cluster_template";

/// Raw template fields
pub const RAW_BODY_FIELD: &str = "body";
pub const RAW_HOOKS_FIELD: &str = "hooks";
pub const RAW_PLAN_FIELD: &str = "plan";
