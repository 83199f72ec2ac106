use async_trait::async_trait;

use crate::error::Result;
use crate::types::{AddonModule, Graph, GraphPatch, GraphSummary, Options};

/// Remote API surface of the dev server that owns graphs and addons.
#[async_trait]
pub trait GraphApi: Send + Sync {
    /// Ask the dev server to reload installed packages from disk.
    async fn reload_package(&self) -> Result<()>;

    /// List graphs in server order.
    async fn fetch_graphs(&self) -> Result<Vec<GraphSummary>>;

    /// List installed extension addons.
    async fn fetch_installed_addons(&self) -> Result<Vec<AddonModule>>;

    async fn fetch_graph_details(&self, graph_id: &str) -> Result<Graph>;

    async fn update_graph(&self, graph_id: &str, updates: &GraphPatch) -> Result<()>;

    /// Persist the current property document on the dev server.
    async fn save_property(&self) -> Result<()>;
}

/// Local persistent key-value mirror of the session options.
pub trait OptionsStorage: Send + Sync {
    /// Stored options, or `None` when nothing has been saved yet.
    fn load_options(&self) -> Result<Option<Options>>;

    fn save_options(&self, options: &Options) -> Result<()>;
}

/// Rendering surface that exposes global style properties.
pub trait ThemeSurface: Send + Sync {
    fn set_property(&self, name: &str, value: &str);
}
