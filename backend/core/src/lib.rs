//! `playground-core`: shared model for the playground session runtime.
//!
//! Provides:
//! - Session data records (options, chat items, graphs, addons)
//! - The `PlaygroundError` taxonomy
//! - Collaborator traits: remote graph API, options storage, theme surface

pub mod error;
pub mod traits;
pub mod types;

pub use error::{PlaygroundError, Result};
pub use traits::{GraphApi, OptionsStorage, ThemeSurface};
pub use types::{
    default_theme_color, AddonModule, ChatItem, ChatItemKind, Graph, GraphConnection, GraphId,
    GraphNode, GraphPatch, GraphSummary, Language, MobileActiveTab, Options, OptionsPatch,
    ThemeColor, VoiceType, COLOR_LIST, THEME_COLOR_PROPERTY,
};
