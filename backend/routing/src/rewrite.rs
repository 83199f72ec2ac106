//! Path rewriter: maps an inbound request path to an upstream backend URL.
//!
//! Rules are checked in table order and the first matching prefix wins. Paths
//! that match no rule are passed through to the local application untouched.

use serde::Serialize;
use tracing::{debug, info};

use playground_config::BackendUrls;

// ---------------------------------------------------------------------------
// Rule table
// ---------------------------------------------------------------------------

/// Which configured backend a rule targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Upstream {
    AgentServer,
    DevServer,
}

/// A prefix rewrite: `prefix` is replaced by `replacement` and the result is
/// appended to the upstream base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RewriteRule {
    pub prefix: &'static str,
    pub replacement: &'static str,
    pub upstream: Upstream,
}

pub const REWRITE_RULES: &[RewriteRule] = &[
    RewriteRule {
        prefix: "/api/agents/",
        replacement: "/",
        upstream: Upstream::AgentServer,
    },
    RewriteRule {
        prefix: "/api/vector/",
        replacement: "/vector/",
        upstream: Upstream::AgentServer,
    },
    RewriteRule {
        prefix: "/api/token/",
        replacement: "/token/",
        upstream: Upstream::AgentServer,
    },
    RewriteRule {
        prefix: "/api/dev/",
        replacement: "/api/playground/",
        upstream: Upstream::DevServer,
    },
];

// ---------------------------------------------------------------------------
// Decision
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum RewriteDecision {
    /// Forward the request to an absolute upstream URL.
    Rewrite {
        target: String,
        rule: &'static RewriteRule,
    },
    /// Leave the request unmodified.
    PassThrough,
}

impl RewriteDecision {
    pub fn target(&self) -> Option<&str> {
        match self {
            RewriteDecision::Rewrite { target, .. } => Some(target),
            RewriteDecision::PassThrough => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Rewriter
// ---------------------------------------------------------------------------

/// Stateless rewriter over base URLs resolved once at startup.
#[derive(Debug, Clone)]
pub struct PathRewriter {
    backends: BackendUrls,
}

impl PathRewriter {
    pub fn new(backends: BackendUrls) -> Self {
        info!(
            agent_server = %backends.agent_server,
            dev_server = %backends.dev_server,
            "[Rewrite] Initialized upstreams"
        );
        Self { backends }
    }

    pub fn backends(&self) -> &BackendUrls {
        &self.backends
    }

    fn base_url(&self, upstream: Upstream) -> &str {
        match upstream {
            Upstream::AgentServer => &self.backends.agent_server,
            Upstream::DevServer => &self.backends.dev_server,
        }
    }

    /// Decide how to route `path`. The base URL is concatenated as-is; the
    /// resulting URL is not validated.
    pub fn rewrite(&self, path: &str) -> RewriteDecision {
        debug!("[Rewrite] Processing request for path: {}", path);

        for rule in REWRITE_RULES {
            if let Some(rest) = path.strip_prefix(rule.prefix) {
                let base = self.base_url(rule.upstream);
                let target = format!("{}{}{}", base, rule.replacement, rest);
                info!("[Rewrite] {} → {}", path, target);
                return RewriteDecision::Rewrite { target, rule };
            }
        }

        RewriteDecision::PassThrough
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_rewriter() -> PathRewriter {
        PathRewriter::new(BackendUrls::default())
    }

    #[test]
    fn agents_prefix_collapses_to_root() {
        let decision = default_rewriter().rewrite("/api/agents/start");
        assert_eq!(decision.target(), Some("http://localhost:8080/start"));
    }

    #[test]
    fn vector_prefix_keeps_vector_segment() {
        let decision = default_rewriter().rewrite("/api/vector/document/upload");
        assert_eq!(decision.target(), Some("http://localhost:8080/vector/document/upload"));
    }

    #[test]
    fn token_prefix_keeps_token_segment() {
        let decision = default_rewriter().rewrite("/api/token/generate");
        assert_eq!(decision.target(), Some("http://localhost:8080/token/generate"));
    }

    #[test]
    fn dev_prefix_targets_playground_api_on_dev_server() {
        let decision = default_rewriter().rewrite("/api/dev/v1/graphs");
        assert_eq!(decision.target(), Some("http://localhost:49483/api/playground/v1/graphs"));
        match decision {
            RewriteDecision::Rewrite { rule, .. } => assert_eq!(rule.upstream, Upstream::DevServer),
            RewriteDecision::PassThrough => panic!("expected rewrite"),
        }
    }

    #[test]
    fn configured_base_urls_are_used_verbatim() {
        let rewriter = PathRewriter::new(BackendUrls {
            agent_server: "https://agents.internal:9443".into(),
            dev_server: "http://designer".into(),
        });
        assert_eq!(
            rewriter.rewrite("/api/agents/stop").target(),
            Some("https://agents.internal:9443/stop")
        );
        assert_eq!(
            rewriter.rewrite("/api/dev/v1/packages/reload").target(),
            Some("http://designer/api/playground/v1/packages/reload")
        );
    }

    #[test]
    fn bare_prefix_is_rewritten_with_empty_suffix() {
        assert_eq!(
            default_rewriter().rewrite("/api/agents/").target(),
            Some("http://localhost:8080/")
        );
    }

    #[test]
    fn non_matching_paths_pass_through() {
        let rewriter = default_rewriter();
        for path in ["/", "/api/agents", "/api/health", "/home/api/agents/x", "/api/devices/1"] {
            assert_eq!(rewriter.rewrite(path), RewriteDecision::PassThrough, "{path}");
        }
    }

    #[test]
    fn only_the_leading_prefix_is_replaced() {
        assert_eq!(
            default_rewriter().rewrite("/api/dev/api/dev/x").target(),
            Some("http://localhost:49483/api/playground/api/dev/x")
        );
    }
}
