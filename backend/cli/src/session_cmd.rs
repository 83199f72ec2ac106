//! Session commands: drive the store against a live dev server.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::json;
use tracing::warn;

use playground_client::HttpGraphApi;
use playground_config::PlaygroundConfig;
use playground_core::{GraphApi, GraphPatch};
use playground_store::{
    bootstrap, fetch_graph_details, initialize_graph_data, update_graph, FileOptionsStorage,
    Store, StyleProperties,
};

fn open_store(config: &PlaygroundConfig) -> Arc<Store> {
    Arc::new(Store::new(
        Arc::new(FileOptionsStorage::in_dir(&config.state_dir)),
        Arc::new(StyleProperties::new()),
    ))
}

fn open_api(config: &PlaygroundConfig) -> Result<Arc<HttpGraphApi>> {
    let api = HttpGraphApi::with_timeout(&config.api_base_url, config.http_timeout)?;
    Ok(Arc::new(api))
}

pub async fn run_graphs(config: &PlaygroundConfig, details: Option<&str>) -> Result<()> {
    let store = open_store(config);
    let api = open_api(config)?;

    initialize_graph_data(&store, api.as_ref())
        .await
        .context("Failed to initialize graph data")?;
    if let Some(graph_id) = details {
        fetch_graph_details(&store, api.as_ref(), graph_id)
            .await
            .with_context(|| format!("Failed to fetch graph {graph_id}"))?;
    }

    let state = store.state();
    let output = json!({
        "graphs": state.graph_list,
        "addons": state.addon_modules,
        "details": state.graph_map,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub async fn run_session(config: &PlaygroundConfig, wait_secs: u64) -> Result<()> {
    let store = open_store(config);
    let api: Arc<dyn GraphApi> = open_api(config)?;

    let tasks = bootstrap(Arc::clone(&store), api)?;
    let mut rx = store.subscribe();
    let ready = tokio::time::timeout(Duration::from_secs(wait_secs), async {
        loop {
            {
                let state = rx.borrow_and_update();
                if state.selected_graph().is_some() {
                    return;
                }
            }
            if rx.changed().await.is_err() {
                return;
            }
        }
    })
    .await;
    if ready.is_err() {
        warn!(wait_secs, "Selected graph details did not arrive in time");
    }
    tasks.abort();

    println!("{}", serde_json::to_string_pretty(&store.state())?);
    Ok(())
}

pub async fn run_update_graph(
    config: &PlaygroundConfig,
    graph_id: &str,
    patch_path: &Path,
) -> Result<()> {
    let raw = tokio::fs::read_to_string(patch_path)
        .await
        .with_context(|| format!("Failed to read {}", patch_path.display()))?;
    let patch: GraphPatch = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse graph patch at {}", patch_path.display()))?;

    let store = open_store(config);
    let api = open_api(config)?;

    match update_graph(&store, api.as_ref(), graph_id, &patch).await {
        Ok(graph) => {
            println!("{}", serde_json::to_string_pretty(&graph)?);
            Ok(())
        }
        Err(rejected) => {
            println!("{}", serde_json::to_string_pretty(&rejected)?);
            Err(rejected).context("Graph update rejected")
        }
    }
}
