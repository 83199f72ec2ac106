//! Session bootstrap: restore options, load graph data, keep the selected
//! graph's details fresh.

use std::sync::{Arc, Weak};

use rand::Rng;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use playground_core::{GraphApi, OptionsPatch, Result};

use crate::action::Action;
use crate::store::Store;
use crate::workflows::{fetch_graph_details, initialize_graph_data};

const CHANNEL_PREFIX: &str = "nyra_";
const CHANNEL_SUFFIX_LEN: usize = 6;
const CHANNEL_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Random channel name, e.g. `nyra_k3x9q1`.
pub fn random_channel() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..CHANNEL_SUFFIX_LEN)
        .map(|_| CHANNEL_CHARSET[rng.gen_range(0..CHANNEL_CHARSET.len())] as char)
        .collect();
    format!("{CHANNEL_PREFIX}{suffix}")
}

/// Random six-digit user id.
pub fn random_user_id() -> String {
    rand::thread_rng().gen_range(100_000..=199_999).to_string()
}

/// Reset the store, then apply stored options when they name a channel, or
/// fresh random channel and user id otherwise.
pub fn restore_options(store: &Store) -> Result<()> {
    let stored = match store.load_persisted_options() {
        Ok(stored) => stored,
        Err(e) => {
            warn!(error = %e, "Stored options unreadable; starting a new session");
            None
        }
    };

    store.reset()?;
    match stored {
        Some(options) if !options.channel.is_empty() => {
            info!(channel = %options.channel, "Restoring stored session options");
            store.set_options(options.into())
        }
        _ => {
            let patch = OptionsPatch {
                channel: Some(random_channel()),
                user_id: Some(random_user_id()),
                ..OptionsPatch::default()
            };
            info!(channel = ?patch.channel, "Starting a new session");
            store.set_options(patch)
        }
    }
}

/// Background tasks started by [`bootstrap`].
pub struct SessionTasks {
    pub initialize: JoinHandle<()>,
    pub graph_sync: JoinHandle<()>,
}

impl SessionTasks {
    pub fn abort(&self) {
        self.initialize.abort();
        self.graph_sync.abort();
    }
}

/// Start a session: restore options, load graph data in the background, and
/// keep the selected graph in sync.
pub fn bootstrap(store: Arc<Store>, api: Arc<dyn GraphApi>) -> Result<SessionTasks> {
    info!("Starting initialization");
    restore_options(&store)?;

    let initialize = {
        let store = Arc::clone(&store);
        let api = Arc::clone(&api);
        tokio::spawn(async move {
            if let Err(e) = initialize_graph_data(&store, api.as_ref()).await {
                error!(error = %e, "Initialization failed");
            }
        })
    };
    let graph_sync = spawn_graph_sync(&store, api);

    Ok(SessionTasks {
        initialize,
        graph_sync,
    })
}

/// Watch the store and
/// - select the first graph once a list arrives and nothing is selected;
/// - fetch details whenever the selection changes to a graph id.
///
/// The task ends when the store is dropped.
pub fn spawn_graph_sync(store: &Arc<Store>, api: Arc<dyn GraphApi>) -> JoinHandle<()> {
    let mut rx = store.subscribe();
    let store: Weak<Store> = Arc::downgrade(store);

    tokio::spawn(async move {
        let mut last_selected = String::new();
        loop {
            let (first_graph, selected) = {
                let state = rx.borrow_and_update();
                (state.graph_list.first().cloned(), state.selected_graph_id.clone())
            };

            let Some(store_ref) = store.upgrade() else { break };
            if selected.is_empty() {
                last_selected.clear();
                if let Some(first) = first_graph {
                    info!(graph_id = %first, "Selecting first available graph");
                    if let Err(e) = store_ref.dispatch(Action::SetSelectedGraphId(first)) {
                        error!(error = %e, "Failed to select graph");
                    }
                }
            } else if selected != last_selected {
                last_selected = selected.clone();
                let api = Arc::clone(&api);
                let store_ref = Arc::clone(&store_ref);
                tokio::spawn(async move {
                    if let Err(e) = fetch_graph_details(&store_ref, api.as_ref(), &selected).await {
                        error!(graph_id = %selected, error = %e, "Failed to fetch graph details");
                    }
                });
            }
            drop(store_ref);

            if rx.changed().await.is_err() {
                break;
            }
        }
    })
}
