//! `playground-store`: session state for the playground client.
//!
//! State changes go through [`Store::dispatch`] with an [`Action`]; the
//! reducer is pure and returns [`Effect`]s that the store runs through the
//! injected storage and theme ports. Remote graph data is loaded by the
//! workflows in [`workflows`], and [`bootstrap`] wires everything up at
//! session start.

pub mod action;
pub mod bootstrap;
pub mod reducer;
pub mod state;
pub mod storage;
pub mod store;
pub mod theme;
pub mod workflows;

pub use action::{Action, Effect};
pub use bootstrap::{
    bootstrap, random_channel, random_user_id, restore_options, spawn_graph_sync, SessionTasks,
};
pub use reducer::{add_chat_item, reduce, ChatMerge};
pub use state::{GraphMap, SessionState};
pub use storage::{FileOptionsStorage, MemoryOptionsStorage, OPTIONS_KEY};
pub use store::Store;
pub use theme::StyleProperties;
pub use workflows::{
    fetch_graph_details, initialize_graph_data, update_graph, RejectedUpdate, UpdateStep,
};
