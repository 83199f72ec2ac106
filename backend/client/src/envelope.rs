//! Response envelope of the dev server API.
//!
//! Every endpoint answers `{"status": "ok" | "fail", "data": ..., "message": ...}`.
//! Bodies are validated into typed records here so nothing untyped leaks
//! into the store.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use playground_core::{PlaygroundError, Result};

const STATUS_OK: &str = "ok";

#[derive(Deserialize)]
struct Envelope {
    status: String,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    message: Option<String>,
}

/// Decode a raw HTTP response into `T`.
///
/// - non-2xx status → `Remote` carrying the JSON body when there is one
/// - body that is not an envelope, or `data` of the wrong shape → `MalformedPayload`
/// - envelope with a non-`ok` status → `Remote`
pub fn decode_envelope<T: DeserializeOwned>(endpoint: &str, status: u16, body: &str) -> Result<T> {
    if !(200..300).contains(&status) {
        let payload = serde_json::from_str::<Value>(body).ok();
        let message = payload
            .as_ref()
            .and_then(|p| p.get("message"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| {
                if body.is_empty() {
                    format!("{endpoint} returned {status}")
                } else {
                    body.to_string()
                }
            });
        return Err(PlaygroundError::Remote {
            status,
            message,
            payload,
        });
    }

    let raw: Value = serde_json::from_str(body).map_err(|e| PlaygroundError::MalformedPayload {
        endpoint: endpoint.to_string(),
        reason: e.to_string(),
    })?;
    let envelope: Envelope =
        serde_json::from_value(raw.clone()).map_err(|e| PlaygroundError::MalformedPayload {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })?;

    if envelope.status != STATUS_OK {
        return Err(PlaygroundError::Remote {
            status,
            message: envelope
                .message
                .unwrap_or_else(|| format!("{endpoint} reported status {}", envelope.status)),
            payload: Some(raw),
        });
    }

    serde_json::from_value(envelope.data).map_err(|e| PlaygroundError::MalformedPayload {
        endpoint: endpoint.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use playground_core::{Graph, GraphSummary};
    use serde_json::json;

    #[test]
    fn decodes_graph_list() {
        let body =
            r#"{"status":"ok","data":[{"id":"va_openai","auto_start":true},{"id":"camera"}]}"#;
        let graphs: Vec<GraphSummary> = decode_envelope("GET /v1/graphs", 200, body).unwrap();
        let ids: Vec<_> = graphs.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, ["va_openai", "camera"]);
        assert_eq!(graphs[0].auto_start, Some(true));
    }

    #[test]
    fn unit_responses_accept_missing_data() {
        let body = r#"{"status":"ok"}"#;
        let () = decode_envelope("POST /v1/packages/reload", 200, body).unwrap();
    }

    #[test]
    fn fail_envelope_is_a_remote_error_with_payload() {
        let body = r#"{"status":"fail","message":"graph not found"}"#;
        let err = decode_envelope::<Graph>("GET /v1/graphs/x", 200, body).unwrap_err();
        match err {
            PlaygroundError::Remote { message, payload, .. } => {
                assert_eq!(message, "graph not found");
                assert_eq!(payload.unwrap()["status"], "fail");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn http_error_keeps_json_body() {
        let body = r#"{"status":"fail","message":"invalid node"}"#;
        let err = decode_envelope::<()>("PUT /v1/graphs/x", 400, body).unwrap_err();
        assert_eq!(err.payload(), Some(&json!({"status": "fail", "message": "invalid node"})));
        assert!(err.to_string().contains("invalid node"));
    }

    #[test]
    fn http_error_without_body_names_the_endpoint() {
        let err = decode_envelope::<()>("PUT /v1/property", 503, "").unwrap_err();
        assert_eq!(err.to_string(), "remote error (503): PUT /v1/property returned 503");
        assert!(err.payload().is_none());
    }

    #[test]
    fn wrong_data_shape_is_malformed() {
        let body = r#"{"status":"ok","data":{"id":"not-a-list"}}"#;
        let err = decode_envelope::<Vec<GraphSummary>>("GET /v1/graphs", 200, body).unwrap_err();
        assert!(matches!(err, PlaygroundError::MalformedPayload { .. }));
    }

    #[test]
    fn non_json_body_is_malformed() {
        let err = decode_envelope::<()>("GET /v1/graphs", 200, "<html>").unwrap_err();
        assert!(matches!(err, PlaygroundError::MalformedPayload { .. }));
    }
}
