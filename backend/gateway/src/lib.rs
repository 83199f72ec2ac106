//! Playground HTTP edge.
//!
//! Applies the path rewrite table to every inbound request, forwards rewritten
//! requests to the agent and dev servers, and serves a local health endpoint.

pub mod proxy;
pub mod server;

pub use proxy::rewrite_middleware;
pub use server::{build_router, start_server, GatewayState};
