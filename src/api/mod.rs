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

//! HTTP API

pub mod error;
pub mod handlers;

pub use self::error::ApiError;

use crate::domain::config::RepositoryConf;
use crate::infrastructure::TemplateRepository;
use crate::shared::error::{Result, TemplateError};
use axum::routing::get;
use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use axum_server::Handle;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

const SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<TemplateRepository>,
    /// Value of `$domain_name` for rendered templates.
    pub domain: Arc<str>,
}

impl AppState {
    pub fn new(repository: Arc<TemplateRepository>, domain: impl Into<Arc<str>>) -> Self {
        Self {
            repository,
            domain: domain.into(),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(handlers::health_check))
        .route(
            "/api/v1/templates",
            get(handlers::list_templates).post(handlers::create_template),
        )
        .route(
            "/api/v1/templates/{id}",
            get(handlers::get_template).delete(handlers::delete_template),
        )
        .route(
            "/api/v1/parsed_template/{id}",
            get(handlers::get_parsed_template),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub struct ApiServer {
    app: Router,
    conf: RepositoryConf,
}

impl ApiServer {
    pub fn new(state: AppState, conf: RepositoryConf) -> Self {
        Self {
            app: router(state),
            conf,
        }
    }

    /// Serve until Ctrl-C, over TLS when both certificate and key are configured.
    pub async fn serve(self) -> Result<()> {
        let addr: SocketAddr = self.conf.bind_address().parse().map_err(|e| {
            TemplateError::config_error(format!(
                "Invalid bind address {}: {}",
                self.conf.bind_address(),
                e
            ))
        })?;

        match self.conf.tls.paths()? {
            Some((cert, key)) => {
                let tls = RustlsConfig::from_pem_file(cert, key).await?;
                let handle = Handle::new();
                tokio::spawn(shutdown_on_ctrl_c(handle.clone()));

                info!("Template repository listening on https://{}", addr);
                axum_server::bind_rustls(addr, tls)
                    .handle(handle)
                    .serve(self.app.into_make_service())
                    .await?;
            }
            None => {
                let listener = tokio::net::TcpListener::bind(addr).await?;
                info!("Template repository listening on http://{}", addr);
                axum::serve(listener, self.app)
                    .with_graceful_shutdown(async {
                        wait_for_ctrl_c().await;
                    })
                    .await?;
            }
        }

        info!("Template repository stopped");
        Ok(())
    }

    pub fn into_router(self) -> Router {
        self.app
    }
}

async fn wait_for_ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

async fn shutdown_on_ctrl_c(handle: Handle) {
    wait_for_ctrl_c().await;
    handle.graceful_shutdown(Some(SHUTDOWN_GRACE_PERIOD));
}
