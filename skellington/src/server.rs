//! Webhook and OAuth HTTP server.
//!
//! The controller does the platform work behind both routes; this module only binds the port
//! and turns the OAuth outcome into a response (JSON body or a configured redirect).

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Redirect, Response},
    routing::{get, post},
    Router,
};
use skellington_core::{Controller, OAuthCallback, WebServer};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::info;

use crate::config::Settings;
use crate::utils::log_error;

pub const WEBHOOK_PATH: &str = "/slack/receive";
pub const OAUTH_PATH: &str = "/oauth";

#[derive(Clone)]
struct ServerState {
    controller: Arc<dyn Controller>,
    success_redirect_uri: Option<String>,
    error_redirect_uri: Option<String>,
}

/// A bound, serving HTTP server.
pub struct RunningServer {
    handle: WebServer,
    task: JoinHandle<()>,
}

impl RunningServer {
    pub fn handle(&self) -> WebServer {
        self.handle
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.handle.local_addr()
    }

    /// Waits until the server stops.
    pub async fn wait(self) {
        if let Err(e) = self.task.await {
            if !e.is_cancelled() {
                log_error(&e, "Webserver task failed");
            }
        }
    }

    /// Stops serving and waits for the task to finish.
    pub async fn shutdown(self) {
        self.task.abort();
        self.wait().await;
    }
}

/// Builds the webhook + OAuth router (shared between startup and tests).
pub fn build_router(controller: Arc<dyn Controller>, settings: &Settings) -> Router {
    let state = ServerState {
        controller,
        success_redirect_uri: settings.success_redirect_uri.clone(),
        error_redirect_uri: settings.error_redirect_uri.clone(),
    };

    Router::new()
        .route(WEBHOOK_PATH, post(webhook_handler))
        .route(OAUTH_PATH, get(oauth_handler))
        .with_state(state)
}

/// Binds `0.0.0.0:<port>` and serves in the background. On bind failure the error is logged and
/// `None` returned; the run goes on without a server.
pub async fn start(
    controller: Arc<dyn Controller>,
    settings: &Settings,
    port: u16,
) -> Option<RunningServer> {
    let listener = match TcpListener::bind(("0.0.0.0", port)).await {
        Ok(listener) => listener,
        Err(e) => {
            log_error(&e, &format!("Error setting up server on port {}", port));
            return None;
        }
    };
    let local_addr = match listener.local_addr() {
        Ok(addr) => addr,
        Err(e) => {
            log_error(&e, &format!("Error setting up server on port {}", port));
            return None;
        }
    };

    let router = build_router(controller, settings);
    let task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            log_error(&e, "Webserver stopped");
        }
    });

    info!(addr = %local_addr, "Webserver listening");
    Some(RunningServer {
        handle: WebServer::new(local_addr),
        task,
    })
}

async fn webhook_handler(
    State(state): State<ServerState>,
    Json(payload): Json<serde_json::Value>,
) -> Response {
    match state.controller.handle_webhook(payload).await {
        Ok(Some(body)) => Json(body).into_response(),
        Ok(None) => StatusCode::OK.into_response(),
        Err(e) => {
            log_error(&e, "Error handling webhook");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn oauth_handler(
    State(state): State<ServerState>,
    Query(callback): Query<OAuthCallback>,
) -> Response {
    match state.controller.complete_oauth(callback).await {
        Ok(()) => match &state.success_redirect_uri {
            Some(uri) => Redirect::to(uri).into_response(),
            None => (
                StatusCode::OK,
                Json(serde_json::json!({ "message": "Success!" })),
            )
                .into_response(),
        },
        Err(e) => {
            log_error(&e, "Error in OAuth authentication.");
            match &state.error_redirect_uri {
                Some(uri) => Redirect::to(uri).into_response(),
                None => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({
                        "message": "Error authenticating. Please try again."
                    })),
                )
                    .into_response(),
            }
        }
    }
}
