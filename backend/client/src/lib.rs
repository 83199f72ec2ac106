//! Remote graph API clients.
//!
//! `HttpGraphApi` talks to the dev server through the edge; `MockGraphApi` is
//! an in-memory stand-in for tests and offline runs.

pub mod envelope;
pub mod http;
pub mod mock;

pub use envelope::decode_envelope;
pub use http::HttpGraphApi;
pub use mock::{MockCall, MockGraphApi};
