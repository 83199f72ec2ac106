//! Asynchronous workflows that load remote graph data into the store.
//!
//! Workflows never hold the state lock across a remote call; each result is
//! applied with a single dispatch. Overlapping runs are not deduplicated and
//! the last one to finish wins.

use std::fmt;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{error, info, warn};

use playground_core::{Graph, GraphApi, GraphPatch, PlaygroundError, Result};

use crate::action::Action;
use crate::store::Store;

/// Load the graph list and installed addons.
///
/// A failed package reload is logged and ignored. A failed graph or addon
/// fetch aborts the workflow with a wrapped error.
pub async fn initialize_graph_data(store: &Store, api: &dyn GraphApi) -> Result<()> {
    info!("Starting to fetch graphs");

    match api.reload_package().await {
        Ok(()) => info!("Package reload finished"),
        Err(e) => warn!(error = %e, "Package reload failed; continuing"),
    }

    let graphs = api.fetch_graphs().await.map_err(|e| {
        error!(error = %e, "Error fetching graphs");
        e.within("failed to fetch graphs")
    })?;
    info!(count = graphs.len(), "Fetched graphs");
    store.dispatch(Action::SetGraphList(
        graphs.into_iter().map(|graph| graph.id).collect(),
    ))?;

    let modules = api.fetch_installed_addons().await.map_err(|e| {
        error!(error = %e, "Error fetching addons");
        e.within("failed to fetch addons")
    })?;
    info!(count = modules.len(), "Fetched addon modules");
    store.dispatch(Action::SetAddonModules(modules))?;

    Ok(())
}

/// Fetch one graph's details into the graph map.
pub async fn fetch_graph_details(
    store: &Store,
    api: &dyn GraphApi,
    graph_id: &str,
) -> Result<()> {
    let graph = api.fetch_graph_details(graph_id).await?;
    store.dispatch(Action::SetGraph(graph))
}

/// Step of [`update_graph`] that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateStep {
    UpdateGraph,
    SaveProperty,
    FetchGraphDetails,
}

impl fmt::Display for UpdateStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UpdateStep::UpdateGraph => "update graph",
            UpdateStep::SaveProperty => "save property",
            UpdateStep::FetchGraphDetails => "fetch graph details",
        };
        f.write_str(name)
    }
}

/// Structured failure of [`update_graph`], for the caller to branch on.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[error("graph update failed at {step}: {message}")]
pub struct RejectedUpdate {
    pub step: UpdateStep,
    pub message: String,
    /// Error body sent by the remote, when it answered with one.
    pub payload: Option<Value>,
}

impl RejectedUpdate {
    fn at(step: UpdateStep, err: PlaygroundError) -> Self {
        Self {
            step,
            payload: err.payload().cloned(),
            message: err.to_string(),
        }
    }
}

/// Update a graph remotely, save the property document, and refresh the
/// local copy. The first failing step ends the workflow; nothing is rolled
/// back, so a failure after the remote update leaves the local copy stale.
pub async fn update_graph(
    store: &Store,
    api: &dyn GraphApi,
    graph_id: &str,
    updates: &GraphPatch,
) -> std::result::Result<Graph, RejectedUpdate> {
    let outcome: std::result::Result<Graph, RejectedUpdate> = async {
        api.update_graph(graph_id, updates)
            .await
            .map_err(|e| RejectedUpdate::at(UpdateStep::UpdateGraph, e))?;
        api.save_property()
            .await
            .map_err(|e| RejectedUpdate::at(UpdateStep::SaveProperty, e))?;
        let graph = api
            .fetch_graph_details(graph_id)
            .await
            .map_err(|e| RejectedUpdate::at(UpdateStep::FetchGraphDetails, e))?;
        if let Err(e) = store.dispatch(Action::SetGraph(graph.clone())) {
            warn!(graph_id, error = %e, "Failed to apply updated graph");
        }
        Ok(graph)
    }
    .await;

    if let Err(rejected) = &outcome {
        error!(
            graph_id,
            step = %rejected.step,
            "Error updating graph: {}",
            rejected.message
        );
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use playground_client::{MockCall, MockGraphApi};
    use playground_core::{AddonModule, GraphNode};

    use crate::state::SessionState;
    use crate::storage::MemoryOptionsStorage;
    use crate::theme::StyleProperties;

    fn store() -> Store {
        Store::new(Arc::new(MemoryOptionsStorage::new()), Arc::new(StyleProperties::new()))
    }

    fn api() -> MockGraphApi {
        MockGraphApi::new()
            .with_graph(Graph::new("va_openai_azure"))
            .with_graph(Graph::new("camera_va_openai_azure"))
            .with_addon(AddonModule::named("openai_chatgpt_python"))
    }

    fn node(name: &str) -> GraphNode {
        GraphNode {
            name: name.into(),
            addon: "polly_tts".into(),
            extension_group: Some("tts".into()),
            app: None,
            property: None,
        }
    }

    #[tokio::test]
    async fn initialize_loads_graph_list_in_server_order_and_addons() {
        let store = store();
        let api = api();
        initialize_graph_data(&store, &api).await.unwrap();

        let state = store.state();
        assert_eq!(state.graph_list, vec!["va_openai_azure", "camera_va_openai_azure"]);
        assert_eq!(state.addon_modules, vec![AddonModule::named("openai_chatgpt_python")]);
        assert_eq!(
            api.calls(),
            vec![MockCall::ReloadPackage, MockCall::FetchGraphs, MockCall::FetchInstalledAddons]
        );
    }

    #[tokio::test]
    async fn initialize_continues_past_a_failed_reload() {
        let store = store();
        let api = api().failing(MockCall::ReloadPackage);
        initialize_graph_data(&store, &api).await.unwrap();
        assert_eq!(store.state().graph_list.len(), 2);
    }

    #[tokio::test]
    async fn initialize_aborts_when_the_graph_list_fails() {
        let store = store();
        let api = api().failing(MockCall::FetchGraphs);
        let err = initialize_graph_data(&store, &api).await.unwrap_err();

        assert!(err.to_string().starts_with("failed to fetch graphs: "), "{err}");
        assert!(!api.calls().contains(&MockCall::FetchInstalledAddons));
        assert_eq!(store.state(), SessionState::default());
    }

    #[tokio::test]
    async fn initialize_keeps_the_graph_list_when_addons_fail() {
        let store = store();
        let api = api().failing(MockCall::FetchInstalledAddons);
        let err = initialize_graph_data(&store, &api).await.unwrap_err();

        assert!(err.to_string().starts_with("failed to fetch addons: "), "{err}");
        let state = store.state();
        assert_eq!(state.graph_list.len(), 2);
        assert!(state.addon_modules.is_empty());
    }

    #[tokio::test]
    async fn fetch_details_stores_the_graph() {
        let store = store();
        fetch_graph_details(&store, &api(), "va_openai_azure").await.unwrap();
        assert_eq!(store.state().graph_map["va_openai_azure"], Graph::new("va_openai_azure"));
    }

    #[tokio::test]
    async fn fetch_details_failure_is_not_wrapped() {
        let store = store();
        let err = fetch_graph_details(&store, &api(), "missing").await.unwrap_err();
        assert!(matches!(err, PlaygroundError::Remote { status: 404, .. }));
        assert!(store.state().graph_map.is_empty());
    }

    #[tokio::test]
    async fn update_runs_all_steps_and_refreshes_the_graph() {
        let store = store();
        let api = api();
        let patch = GraphPatch {
            nodes: Some(vec![node("tts")]),
            connections: None,
        };

        let graph = update_graph(&store, &api, "va_openai_azure", &patch).await.unwrap();
        assert_eq!(graph.nodes, vec![node("tts")]);
        assert_eq!(store.state().graph_map["va_openai_azure"], graph);
        assert_eq!(
            api.calls(),
            vec![
                MockCall::UpdateGraph("va_openai_azure".into()),
                MockCall::SaveProperty,
                MockCall::FetchGraphDetails("va_openai_azure".into()),
            ]
        );
    }

    #[tokio::test]
    async fn update_failure_returns_a_value_and_changes_nothing() {
        let store = store();
        let api = api().failing(MockCall::UpdateGraph(String::new()));
        let before = store.state();

        let rejected = update_graph(&store, &api, "va_openai_azure", &GraphPatch::default())
            .await
            .unwrap_err();
        assert_eq!(rejected.step, UpdateStep::UpdateGraph);
        assert_eq!(rejected.payload.as_ref().unwrap()["status"], "fail");
        assert_eq!(store.state(), before);
        assert_eq!(api.calls(), vec![MockCall::UpdateGraph("va_openai_azure".into())]);
    }

    #[tokio::test]
    async fn save_property_failure_is_reported_by_step() {
        let store = store();
        let api = api().failing(MockCall::SaveProperty);

        let rejected = update_graph(&store, &api, "va_openai_azure", &GraphPatch::default())
            .await
            .unwrap_err();
        assert_eq!(rejected.step, UpdateStep::SaveProperty);
        assert!(!api.calls().contains(&MockCall::FetchGraphDetails("va_openai_azure".into())));

        let json = serde_json::to_value(&rejected).unwrap();
        assert_eq!(json["step"], "save_property");
        assert!(store.state().graph_map.is_empty());
    }

    #[tokio::test]
    async fn failed_refetch_leaves_the_local_copy_stale() {
        let store = store();
        let api = api().failing(MockCall::FetchGraphDetails(String::new()));
        let patch = GraphPatch {
            nodes: Some(vec![node("tts")]),
            connections: None,
        };

        let rejected = update_graph(&store, &api, "va_openai_azure", &patch).await.unwrap_err();
        assert_eq!(rejected.step, UpdateStep::FetchGraphDetails);
        assert!(store.state().graph_map.is_empty());
    }
}
