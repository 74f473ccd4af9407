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

//! Template domain

pub mod blueprint;
pub mod filter;
pub mod model;
pub mod placeholders;
pub mod substitution;
pub mod validator;

pub use self::blueprint::{create_template_from_blueprint, parse_template};
pub use self::filter::{filter_by_plan_name, PLAN_NAMES_ANNOTATION};
pub use self::model::{
    ComponentType, FragmentKind, HookType, KubernetesBlueprint, KubernetesComponent,
    PlanMetadata, RawTemplate, Template, TemplateMetadata,
};
pub use self::placeholders::build_replacements;
pub use self::substitution::{adjust_params, encode_base64_placeholders, to_short_dns_name};
