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

//! Placeholder names and the replacement map built for a render request

use std::collections::HashMap;

pub const PLACEHOLDER_ORG: &str = "org";
pub const PLACEHOLDER_SPACE: &str = "space";

pub const PLACEHOLDER_DOMAIN_NAME: &str = "domain_name";
pub const PLACEHOLDER_IMAGE: &str = "image";
pub const PLACEHOLDER_HOSTNAME: &str = "hostname";
pub const PLACEHOLDER_EXTRA_ENVS: &str = "extra_envs";
pub const PLACEHOLDER_MEMORY_LIMIT: &str = "memory_limit";

pub const PLACEHOLDER_INSTANCE_NAME: &str = "instance_name";
pub const PLACEHOLDER_INSTANCE_ID: &str = "instance_id";

pub const PLACEHOLDER_IDX_AND_SHORT_INSTANCE_ID: &str = "idx_and_short_instance_id";
pub const PLACEHOLDER_SHORT_INSTANCE_ID: &str = "short_instance_id";
pub const PLACEHOLDER_BOUND_INSTANCE_ID: &str = "bound_instance_id";

pub const PLACEHOLDER_RANDOM: &str = "random";
pub const PLACEHOLDER_RANDOM_DNS: &str = "random_dns";

pub const PLACEHOLDER_OFFERING_ID: &str = "offering_id";
pub const PLACEHOLDER_PLAN_ID: &str = "plan_id";

pub const PLACEHOLDER_CEPH_MONITORS: &str = "ceph_monitors";
pub const PLACEHOLDER_CREATED_BY: &str = "created_by";

/// Prefix marking a literal to be base64 encoded at render time.
pub const BASE64_PREFIX: &str = "$base64-";

pub const DEFAULT_ORG: &str = "00000000-0000-0000-0000-000000000000";
pub const DEFAULT_SPACE: &str = "defaultSpace";
pub const DEFAULT_MEMORY_LIMIT: &str = "1Gi";

/// Query parameters consumed by the render endpoint itself.
pub const QUERY_INSTANCE_ID: &str = "instanceId";
pub const QUERY_PLAN_NAME: &str = "planName";

pub fn with_dollar_prefix(placeholder: &str) -> String {
    format!("${}", placeholder)
}

/// Fill in default values for placeholders missing from `replacements`.
pub fn with_default_replacements(mut replacements: HashMap<String, String>) -> HashMap<String, String> {
    let defaults = [
        (PLACEHOLDER_ORG, DEFAULT_ORG),
        (PLACEHOLDER_SPACE, DEFAULT_SPACE),
        (PLACEHOLDER_CEPH_MONITORS, ""),
        (PLACEHOLDER_MEMORY_LIMIT, DEFAULT_MEMORY_LIMIT),
    ];

    for (name, value) in defaults {
        replacements
            .entry(with_dollar_prefix(name))
            .or_insert_with(|| value.to_string());
    }
    replacements
}

/// Replacement map for rendering one instance.
///
/// Every query parameter `key` is exposed as `$key`, so callers can override
/// any placeholder, including the defaults.
pub fn build_replacements(
    instance_id: &str,
    domain: &str,
    query: &HashMap<String, String>,
) -> HashMap<String, String> {
    let mut replacements = HashMap::new();
    replacements.insert(
        with_dollar_prefix(PLACEHOLDER_INSTANCE_ID),
        instance_id.to_string(),
    );
    replacements.insert(
        with_dollar_prefix(PLACEHOLDER_DOMAIN_NAME),
        domain.to_string(),
    );

    for (key, value) in query {
        replacements.insert(with_dollar_prefix(key), value.clone());
    }

    with_default_replacements(replacements)
}
