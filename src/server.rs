//! HTTP surface: `GET /` health and `POST /postMessage` webhook.

use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::extract::{ConnectInfo, State};
use axum::http::header::{HeaderName, REFERER, USER_AGENT};
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tower_http::LatencyUnit;
use tracing::{error, info, warn, Level, Span};

use crate::bridge::IssueBridge;
use crate::config::Settings;
use crate::error::{BridgeError, Result};
use crate::validate::{self, Violation};

#[derive(Serialize)]
struct StatusBody {
    status: &'static str,
    #[serde(rename = "statusCode")]
    status_code: u16,
}

#[derive(Serialize)]
struct ReplyBody {
    #[serde(rename = "StatusCode")]
    status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    assignees: Option<Vec<String>>,
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<Vec<Violation>>,
}

/// Terminal outcomes of a `POST /postMessage` call.
enum Reply {
    Created(Vec<String>),
    BadRequest(Vec<Violation>),
    Internal,
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Reply::Created(assignees) => (
                StatusCode::OK,
                ReplyBody {
                    status_code: 200,
                    assignees: Some(assignees),
                    message: "RequestCreated",
                    error: None,
                },
            ),
            Reply::BadRequest(violations) => (
                StatusCode::BAD_REQUEST,
                ReplyBody {
                    status_code: 400,
                    assignees: None,
                    message: "BadRequest",
                    error: Some(violations),
                },
            ),
            Reply::Internal => (StatusCode::INTERNAL_SERVER_ERROR, internal_body()),
        };

        (status, Json(body)).into_response()
    }
}

fn internal_body() -> ReplyBody {
    ReplyBody {
        status_code: 500,
        assignees: None,
        message: "InternalServerError",
        error: None,
    }
}

pub fn router(bridge: Arc<IssueBridge>) -> Router {
    Router::new()
        .route("/", get(status))
        .route("/postMessage", post(post_message))
        .with_state(bridge)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(request_span)
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(LatencyUnit::Millis),
                ),
        )
}

/// Bind and serve until Ctrl-C.
pub async fn serve(settings: &Settings) -> Result<()> {
    let bridge = Arc::new(IssueBridge::from_settings(settings));
    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| BridgeError::Bind {
            addr: addr.to_string(),
            source: e,
        })?;

    info!(
        %addr,
        repo = %bridge.repository(),
        api_url = %settings.api_url,
        "Server is running"
    );

    axum::serve(
        listener,
        router(bridge).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

async fn status() -> Json<StatusBody> {
    Json(StatusBody {
        status: "running",
        status_code: 200,
    })
}

async fn post_message(State(bridge): State<Arc<IssueBridge>>, body: Bytes) -> Reply {
    let request = match validate::parse_post_message(&body) {
        Ok(request) => request,
        Err(violations) => {
            warn!(violations = violations.len(), "Rejected malformed request body");
            return Reply::BadRequest(violations);
        }
    };

    let Some(attachment) = request.attachment() else {
        return Reply::BadRequest(Vec::new());
    };

    match bridge.open_issue(attachment).await {
        Ok(opened) => {
            info!(issue = ?opened.number, "Request handled");
            Reply::Created(opened.assignees)
        }
        Err(e) => {
            error!(error = %e, "Failed to create issue");
            Reply::Internal
        }
    }
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("<non-string panic payload>");
    error!(panic = detail, "Handler panicked");

    (StatusCode::INTERNAL_SERVER_ERROR, Json(internal_body())).into_response()
}

fn request_span(request: &Request<Body>) -> Span {
    let remote_addr = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.to_string())
        .unwrap_or_else(|| "-".to_string());

    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        version = ?request.version(),
        remote_addr = %remote_addr,
        user_agent = header_str(request, USER_AGENT),
        referrer = header_str(request, REFERER),
    )
}

fn header_str(request: &Request<Body>, name: HeaderName) -> &str {
    request
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
}
