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

//! Placeholder substitution for manifest fragments
//!
//! Rules are applied in a fixed order:
//! 1. supplied replacements (`$extra_envs` is JSON-escaped first)
//! 2. `$short_instance_id` / `$idx_and_short_instance_id`
//! 3. `$random0..8` / `$random_dns0..8`
//! 4. `$base64-<literal>"` encoding
//!
//! Base64 encoding runs last so that a wrapped placeholder is encoded with
//! its final value.

use super::placeholders::{
    with_dollar_prefix, BASE64_PREFIX, PLACEHOLDER_EXTRA_ENVS,
    PLACEHOLDER_IDX_AND_SHORT_INSTANCE_ID, PLACEHOLDER_INSTANCE_ID, PLACEHOLDER_RANDOM,
    PLACEHOLDER_RANDOM_DNS, PLACEHOLDER_SHORT_INSTANCE_ID,
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::Rng;
use std::collections::HashMap;

const RANDOM_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ1234567890";
const RANDOM_DNS_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyz1234567890";

const RANDOM_LENGTH: usize = 10;
const RANDOM_DNS_LENGTH: usize = 6;
/// `$random0` .. `$random8`
const RANDOM_PLACEHOLDER_COUNT: usize = 9;

/// Number of instance id characters kept in a short DNS name.
const SHORT_DNS_NAME_SOURCE_LEN: usize = 15;

pub fn adjust_params(content: &str, replacements: &HashMap<String, String>) -> String {
    let extra_envs_key = with_dollar_prefix(PLACEHOLDER_EXTRA_ENVS);

    // Longest keys first, so `$org` never rewrites part of `$organization`.
    let mut keys: Vec<&String> = replacements.keys().filter(|k| k.len() > 1).collect();
    keys.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

    let mut content = content.to_string();
    for key in keys {
        let value = &replacements[key];
        if *key == extra_envs_key {
            content = content.replace(key.as_str(), &json_escape(value));
        } else {
            content = content.replace(key.as_str(), value);
        }
    }

    let instance_id = replacements
        .get(&with_dollar_prefix(PLACEHOLDER_INSTANCE_ID))
        .map(String::as_str)
        .unwrap_or_default();
    let short_dns_name = to_short_dns_name(instance_id);
    content = content.replace(
        &with_dollar_prefix(PLACEHOLDER_SHORT_INSTANCE_ID),
        &short_dns_name,
    );
    content = content.replace(
        &with_dollar_prefix(PLACEHOLDER_IDX_AND_SHORT_INSTANCE_ID),
        &short_dns_name,
    );

    for i in 0..RANDOM_PLACEHOLDER_COUNT {
        content = content.replace(
            &format!("{}{}", with_dollar_prefix(PLACEHOLDER_RANDOM), i),
            &random_string(RANDOM_LENGTH, RANDOM_CHARS),
        );
        content = content.replace(
            &format!("{}{}", with_dollar_prefix(PLACEHOLDER_RANDOM_DNS), i),
            &random_string(RANDOM_DNS_LENGTH, RANDOM_DNS_CHARS),
        );
    }

    encode_base64_placeholders(&content)
}

/// Replace every `$base64-<literal>"` with the base64 encoding of the literal.
///
/// The literal runs up to the next unescaped quote on the same line. JSON
/// escapes inside it are decoded before encoding, and the closing quote is
/// kept. An unterminated marker is left as is.
pub fn encode_base64_placeholders(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut rest = content;

    while let Some(start) = rest.find(BASE64_PREFIX) {
        out.push_str(&rest[..start]);
        let after = &rest[start + BASE64_PREFIX.len()..];

        match find_literal_end(after) {
            Some(end) => {
                out.push_str(&STANDARD.encode(unescape_json(&after[..end])));
                rest = &after[end..];
            }
            None => {
                out.push_str(BASE64_PREFIX);
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Byte offset of the closing quote, `None` if a newline comes first.
fn find_literal_end(s: &str) -> Option<usize> {
    let mut escaped = false;
    for (idx, c) in s.char_indices() {
        match c {
            '\n' => return None,
            '\\' if !escaped => escaped = true,
            '"' if !escaped => return Some(idx),
            _ => escaped = false,
        }
    }
    None
}

fn unescape_json(literal: &str) -> String {
    serde_json::from_str::<String>(&format!("\"{}\"", literal))
        .unwrap_or_else(|_| literal.to_string())
}

fn json_escape(value: &str) -> String {
    let quoted = serde_json::Value::String(value.to_string()).to_string();
    quoted[1..quoted.len() - 1].to_string()
}

/// Turn an instance id into a valid, short Kubernetes name: `x` followed by
/// the first 15 characters of the id, lower-cased, keeping only `[a-z0-9]`.
pub fn to_short_dns_name(instance_id: &str) -> String {
    let name: String = instance_id
        .chars()
        .take(SHORT_DNS_NAME_SOURCE_LEN)
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect();
    format!("x{}", name)
}

fn random_string(length: usize, charset: &[u8]) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| charset[rng.gen_range(0..charset.len())] as char)
        .collect()
}
