pub mod rewrite;

pub use rewrite::{PathRewriter, RewriteDecision, RewriteRule, Upstream, REWRITE_RULES};
