//! Edge rewrite middleware.
//!
//! Runs before every route. Paths matching a rewrite rule are forwarded to the
//! upstream URL and answered with the upstream response; everything else
//! continues to the local router unchanged.

use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{HeaderMap, HeaderName, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use tracing::{debug, info, warn};

use playground_logging::redact_sensitive_data;
use playground_routing::RewriteDecision;

use crate::server::GatewayState;

/// Largest request body forwarded upstream.
const MAX_FORWARD_BODY_BYTES: usize = 64 * 1024 * 1024;

/// Headers that describe a single connection and must not be forwarded.
fn is_hop_by_hop(name: &HeaderName) -> bool {
    matches!(
        name.as_str(),
        "connection"
            | "host"
            | "content-length"
            | "transfer-encoding"
            | "te"
            | "trailer"
            | "upgrade"
            | "keep-alive"
            | "proxy-authorization"
            | "proxy-authenticate"
    )
}

fn forwardable(headers: &HeaderMap) -> HeaderMap {
    headers
        .iter()
        .filter(|(name, _)| !is_hop_by_hop(name))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

/// Middleware applying the path rewrite table to each inbound request.
pub async fn rewrite_middleware(
    State(state): State<GatewayState>,
    req: Request,
    next: Next,
) -> Response {
    let decision = state.rewriter.rewrite(req.uri().path());

    match decision {
        RewriteDecision::PassThrough => {
            debug!(path = %req.uri().path(), "Passing request through");
            next.run(req).await
        }
        RewriteDecision::Rewrite { target, .. } => {
            let target = match req.uri().query() {
                Some(query) => format!("{target}?{query}"),
                None => target,
            };
            forward(&state.client, req, &target).await
        }
    }
}

async fn forward(client: &reqwest::Client, req: Request, target: &str) -> Response {
    let (parts, body) = req.into_parts();
    let logged_target = redact_sensitive_data(target);

    let body = match to_bytes(body, MAX_FORWARD_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(target = %logged_target, error = %e, "Failed to read request body");
            return (
                StatusCode::PAYLOAD_TOO_LARGE,
                Json(json!({ "error": "request body could not be read" })),
            )
                .into_response();
        }
    };

    info!(method = %parts.method, target = %logged_target, "Forwarding rewritten request");
    let upstream = client
        .request(parts.method, target)
        .headers(forwardable(&parts.headers))
        .body(body)
        .send()
        .await;

    let upstream = match upstream {
        Ok(response) => response,
        Err(e) => {
            warn!(target = %logged_target, error = %e, "Upstream request failed");
            return (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": "upstream unavailable" })),
            )
                .into_response();
        }
    };

    let status = upstream.status();
    let headers = forwardable(upstream.headers());
    let bytes = match upstream.bytes().await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(target = %logged_target, error = %e, "Failed to read upstream body");
            return (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": "upstream response interrupted" })),
            )
                .into_response();
        }
    };

    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}
