use playground_core::{
    AddonModule, ChatItem, Graph, GraphId, Language, MobileActiveTab, Options, OptionsPatch,
    VoiceType,
};

/// A state mutation. Each action is applied as one atomic transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetOptions(OptionsPatch),
    SetThemeColor(String),
    SetRoomConnected(bool),
    SetRtmConnected(bool),
    SetAgentConnected(bool),
    SetLanguage(Language),
    SetVoiceType(VoiceType),
    SetMobileActiveTab(MobileActiveTab),
    SetSelectedGraphId(GraphId),
    SetGraphList(Vec<GraphId>),
    SetGraph(Graph),
    /// Owned copy of the modules; the store never shares the caller's data.
    SetAddonModules(Vec<AddonModule>),
    AddChatItem(ChatItem),
    Reset,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::SetOptions(_) => "set_options",
            Action::SetThemeColor(_) => "set_theme_color",
            Action::SetRoomConnected(_) => "set_room_connected",
            Action::SetRtmConnected(_) => "set_rtm_connected",
            Action::SetAgentConnected(_) => "set_agent_connected",
            Action::SetLanguage(_) => "set_language",
            Action::SetVoiceType(_) => "set_voice_type",
            Action::SetMobileActiveTab(_) => "set_mobile_active_tab",
            Action::SetSelectedGraphId(_) => "set_selected_graph_id",
            Action::SetGraphList(_) => "set_graph_list",
            Action::SetGraph(_) => "set_graph",
            Action::SetAddonModules(_) => "set_addon_modules",
            Action::AddChatItem(_) => "add_chat_item",
            Action::Reset => "reset",
        }
    }
}

/// Side effect requested by a transition, executed by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Mirror the merged options to local storage.
    PersistOptions(Options),
    /// Set the theme color property on the rendering surface.
    ApplyThemeColor(String),
}
