use std::collections::HashSet;
use std::fmt;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;

use playground_core::{
    AddonModule, Graph, GraphApi, GraphPatch, GraphSummary, PlaygroundError, Result,
};

/// A call made against [`MockGraphApi`], recorded in order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MockCall {
    ReloadPackage,
    FetchGraphs,
    FetchInstalledAddons,
    FetchGraphDetails(String),
    UpdateGraph(String),
    SaveProperty,
}

impl MockCall {
    fn kind(&self) -> &'static str {
        match self {
            MockCall::ReloadPackage => "reload_package",
            MockCall::FetchGraphs => "fetch_graphs",
            MockCall::FetchInstalledAddons => "fetch_installed_addons",
            MockCall::FetchGraphDetails(_) => "fetch_graph_details",
            MockCall::UpdateGraph(_) => "update_graph",
            MockCall::SaveProperty => "save_property",
        }
    }
}

impl fmt::Display for MockCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind())
    }
}

#[derive(Default)]
struct MockInner {
    graphs: Vec<Graph>,
    addons: Vec<AddonModule>,
    failing: HashSet<&'static str>,
    calls: Vec<MockCall>,
}

/// In-memory dev server with canned graphs and addons.
///
/// Updates are applied to the stored graph so a re-fetch observes them.
#[derive(Default)]
pub struct MockGraphApi {
    inner: Mutex<MockInner>,
}

impl MockGraphApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_graph(self, graph: Graph) -> Self {
        self.lock().graphs.push(graph);
        self
    }

    pub fn with_addon(self, addon: AddonModule) -> Self {
        self.lock().addons.push(addon);
        self
    }

    /// Make every call of the same kind as `call` fail with a remote error.
    pub fn failing(self, call: MockCall) -> Self {
        self.lock().failing.insert(call.kind());
        self
    }

    /// Calls received so far, in arrival order.
    pub fn calls(&self) -> Vec<MockCall> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Record the call and fail it if it was scripted to fail.
    fn enter(&self, call: MockCall) -> Result<std::sync::MutexGuard<'_, MockInner>> {
        let mut inner = self.lock();
        let kind = call.kind();
        inner.calls.push(call);
        if inner.failing.contains(kind) {
            let message = format!("mock failure: {kind}");
            return Err(PlaygroundError::Remote {
                status: 500,
                payload: Some(json!({ "status": "fail", "message": message })),
                message,
            });
        }
        Ok(inner)
    }
}

fn not_found(graph_id: &str) -> PlaygroundError {
    let message = format!("graph {graph_id} not found");
    PlaygroundError::Remote {
        status: 404,
        payload: Some(json!({ "status": "fail", "message": message })),
        message,
    }
}

#[async_trait]
impl GraphApi for MockGraphApi {
    async fn reload_package(&self) -> Result<()> {
        self.enter(MockCall::ReloadPackage).map(|_| ())
    }

    async fn fetch_graphs(&self) -> Result<Vec<GraphSummary>> {
        let inner = self.enter(MockCall::FetchGraphs)?;
        Ok(inner
            .graphs
            .iter()
            .map(|g| GraphSummary {
                id: g.id.clone(),
                name: None,
                auto_start: None,
            })
            .collect())
    }

    async fn fetch_installed_addons(&self) -> Result<Vec<AddonModule>> {
        let inner = self.enter(MockCall::FetchInstalledAddons)?;
        Ok(inner.addons.clone())
    }

    async fn fetch_graph_details(&self, graph_id: &str) -> Result<Graph> {
        let inner = self.enter(MockCall::FetchGraphDetails(graph_id.to_string()))?;
        inner
            .graphs
            .iter()
            .find(|g| g.id == graph_id)
            .cloned()
            .ok_or_else(|| not_found(graph_id))
    }

    async fn update_graph(&self, graph_id: &str, updates: &GraphPatch) -> Result<()> {
        let mut inner = self.enter(MockCall::UpdateGraph(graph_id.to_string()))?;
        let graph = inner
            .graphs
            .iter_mut()
            .find(|g| g.id == graph_id)
            .ok_or_else(|| not_found(graph_id))?;
        if let Some(nodes) = &updates.nodes {
            graph.nodes = nodes.clone();
        }
        if let Some(connections) = &updates.connections {
            graph.connections = connections.clone();
        }
        Ok(())
    }

    async fn save_property(&self) -> Result<()> {
        self.enter(MockCall::SaveProperty).map(|_| ())
    }
}
