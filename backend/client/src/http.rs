use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use playground_core::{
    AddonModule, Graph, GraphApi, GraphPatch, GraphSummary, PlaygroundError, Result,
};

use crate::envelope::decode_envelope;

/// Dev server graph API over HTTP.
///
/// `base_url` is the API root the playground sees, normally the edge's
/// `/api/dev` prefix, e.g. `http://localhost:3000/api/dev`.
pub struct HttpGraphApi {
    client: Client,
    base_url: String,
}

impl HttpGraphApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: trim_base(base_url.into()),
        }
    }

    /// Client whose requests fail with a transport error after `timeout`.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PlaygroundError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: trim_base(base_url.into()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `{base}/v1/graphs/{graph_id}` with the id percent-encoded as one segment.
    fn graph_url(&self, graph_id: &str) -> Result<Url> {
        let mut url = Url::parse(&self.url("/v1/graphs")).map_err(|e| {
            PlaygroundError::Config(format!("invalid API base URL {}: {e}", self.base_url))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                PlaygroundError::Config(format!(
                    "API base URL cannot hold a path: {}",
                    self.base_url
                ))
            })?
            .push(graph_id);
        Ok(url)
    }

    async fn call<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: RequestBuilder,
    ) -> Result<T> {
        debug!(endpoint, "Sending request to dev server");

        let response = request
            .send()
            .await
            .map_err(|e| PlaygroundError::Transport(format!("{endpoint}: {e}")))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| PlaygroundError::Transport(format!("{endpoint}: {e}")))?;

        decode_envelope(endpoint, status, &body)
    }
}

fn trim_base(base_url: String) -> String {
    base_url.trim_end_matches('/').to_string()
}

#[async_trait]
impl GraphApi for HttpGraphApi {
    async fn reload_package(&self) -> Result<()> {
        self.call("POST /v1/packages/reload", self.client.post(self.url("/v1/packages/reload")))
            .await
    }

    async fn fetch_graphs(&self) -> Result<Vec<GraphSummary>> {
        self.call("GET /v1/graphs", self.client.get(self.url("/v1/graphs")))
            .await
    }

    async fn fetch_installed_addons(&self) -> Result<Vec<AddonModule>> {
        self.call(
            "GET /v1/addons/extensions",
            self.client.get(self.url("/v1/addons/extensions")),
        )
        .await
    }

    async fn fetch_graph_details(&self, graph_id: &str) -> Result<Graph> {
        let url = self.graph_url(graph_id)?;
        self.call("GET /v1/graphs/{id}", self.client.get(url)).await
    }

    async fn update_graph(&self, graph_id: &str, updates: &GraphPatch) -> Result<()> {
        let url = self.graph_url(graph_id)?;
        self.call("PUT /v1/graphs/{id}", self.client.put(url).json(updates))
            .await
    }

    async fn save_property(&self) -> Result<()> {
        self.call("PUT /v1/property", self.client.put(self.url("/v1/property")))
            .await
    }
}
