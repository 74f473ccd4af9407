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

//! HTTP API tests against a catalog in a temporary directory

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use template_repository::{router, AppState, FileSystemStore, TemplateRepository};
use tower::ServiceExt;

const INSTANCE_ID: &str = "a5740d8a-9f4b-4711-a1a0-eae62db54474";

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

/// A catalog with one plain template and one with plan annotated objects.
fn create_catalog(root: &Path) {
    write(
        root,
        "core/nginx/default/k8s/deployment_001.json",
        r#"{"metadata": {"name": "$short_instance_id", "labels": {"space": "$space", "domain": "$domain_name"}}}"#,
    );
    write(
        root,
        "core/nginx/default/k8s/service_001.json",
        r#"{"metadata": {"name": "$short_instance_id"}}"#,
    );

    write(
        root,
        "core/db/default/k8s/deployment_001.json",
        r#"{"metadata": {"name": "db-small", "annotations": {"plan_names": "small"}}}"#,
    );
    write(
        root,
        "core/db/default/k8s/deployment_002.json",
        r#"{"metadata": {"name": "db-large", "annotations": {"plan_names": "large, xlarge"}}}"#,
    );
    write(
        root,
        "core/db/default/k8s/service_001.json",
        r#"{"metadata": {"name": "db"}}"#,
    );
    write(
        root,
        "core/db/default/k8s/hooks.json",
        r#"{"provision": {"metadata": {"name": "init", "annotations": {"plan_names": "large"}}}}"#,
    );
}

async fn app() -> (tempfile::TempDir, Router) {
    let dir = tempfile::tempdir().unwrap();
    create_catalog(dir.path());
    let app = open_app(dir.path()).await;
    (dir, app)
}

async fn open_app(root: &Path) -> Router {
    let store = Arc::new(FileSystemStore::new(root));
    let repository = TemplateRepository::open(store).await.unwrap();
    router(AppState::new(Arc::new(repository), "apps.example.com"))
}

/// Every file under `root` with its contents, keyed by relative path.
fn catalog_snapshot(root: &Path) -> BTreeMap<String, String> {
    fn walk(root: &Path, dir: &Path, files: &mut BTreeMap<String, String>) {
        for entry in std::fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                walk(root, &path, files);
            } else {
                let relative = path.strip_prefix(root).unwrap().display().to_string();
                files.insert(relative, std::fs::read_to_string(&path).unwrap());
            }
        }
    }

    let mut files = BTreeMap::new();
    walk(root, root, &mut files);
    files
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_health_check() {
    let (_dir, app) = app().await;

    let (status, body) = send(&app, Method::GET, "/healthz", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["templates"], 2);
}

#[tokio::test]
async fn test_list_templates() {
    let (_dir, app) = app().await;

    let (status, body) = send(&app, Method::GET, "/api/v1/templates", None).await;
    assert_eq!(status, StatusCode::OK);

    let templates = body.as_array().unwrap();
    let ids: Vec<&str> = templates.iter().map(|t| t["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["db", "nginx"]);
    assert_eq!(templates[1]["body"]["deployments"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_parsed_template() {
    let (_dir, app) = app().await;

    let uri = format!(
        "/api/v1/parsed_template/nginx?instanceId={}&space=prod",
        INSTANCE_ID
    );
    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);

    let deployment = &body["body"]["deployments"][0]["metadata"];
    assert_eq!(deployment["name"], "xa5740d8a9f4b4");
    assert_eq!(deployment["labels"]["space"], "prod");
    assert_eq!(deployment["labels"]["domain"], "apps.example.com");
}

#[tokio::test]
async fn test_parsed_template_filtered_by_plan() {
    let (_dir, app) = app().await;

    let uri = format!(
        "/api/v1/parsed_template/db?instanceId={}&planName=xlarge",
        INSTANCE_ID
    );
    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);

    let deployments = body["body"]["deployments"].as_array().unwrap();
    assert_eq!(deployments.len(), 1);
    assert_eq!(deployments[0]["metadata"]["name"], "db-large");
    assert_eq!(body["body"]["services"].as_array().unwrap().len(), 1);
    assert!(body["hooks"].as_object().map_or(true, |hooks| hooks.is_empty()));
}

#[tokio::test]
async fn test_parsed_template_requires_instance_id() {
    let (_dir, app) = app().await;

    let (status, body) = send(&app, Method::GET, "/api/v1/parsed_template/nginx", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("uuid can't be empty!"));

    let (status, _) = send(
        &app,
        Method::GET,
        "/api/v1/parsed_template/nginx?instanceId=short",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_template() {
    let (_dir, app) = app().await;

    let (status, body) = send(&app, Method::GET, "/api/v1/templates/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("missing"));
}

#[tokio::test]
async fn test_create_get_delete_template() {
    let (_dir, app) = app().await;

    let template = json!({
        "id": "test",
        "body": {"services": [{"metadata": {"name": "$short_instance_id"}}]},
        "hooks": {}
    });
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/templates",
        Some(template.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], "test");

    let (status, _) = send(&app, Method::POST, "/api/v1/templates", Some(template.clone())).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(&app, Method::GET, "/api/v1/templates/test", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, template);

    let (_, body) = send(&app, Method::GET, "/api/v1/templates", None).await;
    assert_eq!(body.as_array().unwrap().len(), 3);

    let (status, _) = send(&app, Method::DELETE, "/api/v1/templates/test", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::GET, "/api/v1/templates/test", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_rejects_invalid_templates() {
    let (_dir, app) = app().await;

    let (status, _) = send(&app, Method::POST, "/api/v1/templates", Some(json!({"body": {}}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/templates",
        Some(json!({"id": "nginx"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/v1/templates")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_protected_templates() {
    let (dir, app) = app().await;
    let (status, _) = send(&app, Method::POST, "/api/v1/templates", Some(json!({"id": "kept"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    let before = catalog_snapshot(dir.path());

    let (status, _) = send(&app, Method::DELETE, "/api/v1/templates/..", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(catalog_snapshot(dir.path()), before);

    let (_, body) = send(&app, Method::GET, "/api/v1/templates", None).await;
    assert_eq!(body.as_array().unwrap().len(), 3);

    let (status, _) = send(&app, Method::DELETE, "/api/v1/templates/nginx", None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, Method::DELETE, "/api/v1/templates/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_catalog_ids_outside_the_create_pattern() {
    let dir = tempfile::tempdir().unwrap();
    create_catalog(dir.path());
    write(
        dir.path(),
        "core/_base/default/k8s/service_001.json",
        r#"{"metadata": {"name": "$short_instance_id"}}"#,
    );
    let app = open_app(dir.path()).await;

    let (status, body) = send(&app, Method::GET, "/api/v1/templates/_base", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "_base");

    let uri = format!("/api/v1/parsed_template/_base?instanceId={}", INSTANCE_ID);
    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["body"]["services"][0]["metadata"]["name"], "xa5740d8a9f4b4");

    // New templates still have to follow the id rules
    let (status, _) = send(&app, Method::POST, "/api/v1/templates", Some(json!({"id": "_copy"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
