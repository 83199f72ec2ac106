//! Session state document held by the store.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use playground_core::{
    default_theme_color, AddonModule, ChatItem, Graph, GraphId, Language, MobileActiveTab,
    Options, VoiceType,
};

/// Graph details keyed by graph id.
pub type GraphMap = BTreeMap<GraphId, Graph>;

/// UI/session state of one playground client.
///
/// Cloning is cheap for the graph map, which is shared between snapshots and
/// replaced wholesale on every write.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionState {
    pub options: Options,
    pub room_connected: bool,
    pub agent_connected: bool,
    pub rtm_connected: bool,
    pub theme_color: String,
    pub language: Language,
    pub voice_type: VoiceType,
    /// Transcript, sorted ascending by time.
    pub chat_items: Vec<ChatItem>,
    pub selected_graph_id: GraphId,
    /// Graph ids in server order.
    pub graph_list: Vec<GraphId>,
    pub graph_map: Arc<GraphMap>,
    pub addon_modules: Vec<AddonModule>,
    pub mobile_active_tab: MobileActiveTab,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            options: Options::default(),
            room_connected: false,
            agent_connected: false,
            rtm_connected: false,
            theme_color: default_theme_color(),
            language: Language::default(),
            voice_type: VoiceType::default(),
            chat_items: Vec::new(),
            selected_graph_id: GraphId::new(),
            graph_list: Vec::new(),
            graph_map: Arc::new(GraphMap::new()),
            addon_modules: Vec::new(),
            mobile_active_tab: MobileActiveTab::default(),
        }
    }
}

impl SessionState {
    /// Details of the currently selected graph, once fetched.
    pub fn selected_graph(&self) -> Option<&Graph> {
        self.graph_map.get(&self.selected_graph_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_a_fresh_session() {
        let state = SessionState::default();
        assert_eq!(state.theme_color, "#0888FF");
        assert_eq!(state.language, Language::EnUs);
        assert_eq!(state.voice_type, VoiceType::Male);
        assert_eq!(state.mobile_active_tab, MobileActiveTab::Agent);
        assert!(!state.room_connected && !state.agent_connected && !state.rtm_connected);
        assert!(state.selected_graph_id.is_empty());
        assert!(state.graph_map.is_empty());
    }

    #[test]
    fn selected_graph_looks_up_the_map() {
        let mut state = SessionState::default();
        let mut map = GraphMap::new();
        map.insert("a".into(), Graph::new("a"));
        state.graph_map = Arc::new(map);
        assert!(state.selected_graph().is_none());
        state.selected_graph_id = "a".into();
        assert_eq!(state.selected_graph().map(|g| g.id.as_str()), Some("a"));
    }
}
