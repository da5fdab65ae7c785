mod device;
mod error;
mod in_app;
mod interstitial;
mod link;
mod redirect;
mod request;

use std::any::Any;

use axum::{
    Json, Router,
    body::Body,
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::{error, info};

use crate::{
    error::RedirectError,
    request::{RedirectRequest, RedirectResponse},
};

const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<RedirectError> for ApiError {
    fn from(error: RedirectError) -> Self {
        error!("Error in redirect handler: {error}");
        Self::internal(INTERNAL_ERROR_MESSAGE)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "yt_redirect=info,tower_http=info".to_string()),
        )
        .init();

    if let Err(error) = run().await {
        eprintln!("Server error: {}", error.message);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), ApiError> {
    let addr = resolve_bind_addr();
    let listener = TcpListener::bind(&addr).await.map_err(|error| {
        ApiError::internal(format!("Could not bind {addr}: {error}"))
    })?;

    info!("Redirector listening on http://{addr}");

    axum::serve(listener, app())
        .await
        .map_err(|error| ApiError::internal(format!("HTTP server error: {error}")))
}

fn app() -> Router {
    with_host_layers(Router::new().fallback(handle_redirect))
}

fn with_host_layers(router: Router) -> Router {
    router
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handle_panic))
}

async fn handle_redirect(uri: Uri, headers: HeaderMap) -> Result<Response, ApiError> {
    let mut request = RedirectRequest::new(uri.path(), uri.query().unwrap_or_default());
    for (name, value) in &headers {
        request.insert_header(
            name.as_str(),
            String::from_utf8_lossy(value.as_bytes()).into_owned(),
        );
    }

    let response = redirect::resolve(&request)?;
    Ok(into_http_response(response)?)
}

fn into_http_response(response: RedirectResponse) -> Result<Response, RedirectError> {
    let mut headers = HeaderMap::new();
    for (name, value) in response.headers {
        let header_name = HeaderName::from_static(name);
        let header_value = HeaderValue::from_str(&value)
            .map_err(|source| RedirectError::Header { name, source })?;
        headers.insert(header_name, header_value);
    }

    let status =
        StatusCode::from_u16(response.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = response.body.map(Body::from).unwrap_or_else(Body::empty);
    Ok((status, headers, body).into_response())
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    error!("Panic in redirect handler: {detail}");
    ApiError::internal(INTERNAL_ERROR_MESSAGE).into_response()
}

fn resolve_bind_addr() -> String {
    if let Some(configured) = std::env::var("APP_ADDR")
        .ok()
        .and_then(|value| non_empty(&value).map(ToString::to_string))
    {
        return configured;
    }

    if let Some(port) = std::env::var("PORT")
        .ok()
        .and_then(|value| value.trim().parse::<u16>().ok())
    {
        return format!("0.0.0.0:{port}");
    }

    "127.0.0.1:8787".to_string()
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}
