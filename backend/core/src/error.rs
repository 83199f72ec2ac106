use serde_json::Value;
use thiserror::Error;

/// Top-level error type for the playground session runtime.
#[derive(Debug, Error)]
pub enum PlaygroundError {
    #[error("transport error: {0}")]
    Transport(String),

    /// The remote answered, but with a failure status or a `fail` envelope.
    #[error("remote error ({status}): {message}")]
    Remote {
        status: u16,
        message: String,
        /// JSON body returned by the remote, when it sent one.
        payload: Option<Value>,
    },

    #[error("malformed payload from {endpoint}: {reason}")]
    MalformedPayload { endpoint: String, reason: String },

    #[error("storage error: {0}")]
    Storage(String),

    #[error("{context}: {source}")]
    Workflow {
        context: &'static str,
        #[source]
        source: Box<PlaygroundError>,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

impl PlaygroundError {
    /// Wrap this error with a workflow-level context message.
    pub fn within(self, context: &'static str) -> Self {
        PlaygroundError::Workflow {
            context,
            source: Box::new(self),
        }
    }

    /// The remote error body, if the failure carried one.
    pub fn payload(&self) -> Option<&Value> {
        match self {
            PlaygroundError::Remote { payload, .. } => payload.as_ref(),
            PlaygroundError::Workflow { source, .. } => source.payload(),
            _ => None,
        }
    }
}

pub type Result<T, E = PlaygroundError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn workflow_message_prefixes_context() {
        let err = PlaygroundError::Transport("connection refused".into())
            .within("failed to fetch graphs");
        assert_eq!(
            err.to_string(),
            "failed to fetch graphs: transport error: connection refused"
        );
    }

    #[test]
    fn payload_is_reachable_through_workflow_wrapper() {
        let err = PlaygroundError::Remote {
            status: 400,
            message: "bad graph".into(),
            payload: Some(json!({"status": "fail"})),
        }
        .within("failed to fetch addons");
        assert_eq!(err.payload(), Some(&json!({"status": "fail"})));
        assert!(PlaygroundError::Storage("disk".into()).payload().is_none());
    }
}
