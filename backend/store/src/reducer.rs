//! Pure state transitions: `(state, action) -> effects`.

use std::sync::Arc;

use tracing::debug;

use playground_core::{default_theme_color, ChatItem, Graph};

use crate::action::{Action, Effect};
use crate::state::SessionState;

/// Outcome of merging one transcript segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatMerge {
    /// A final segment of the same user at or after this time already exists.
    Discarded,
    /// Overwrote the user's latest interim segment.
    Replaced,
    Appended,
}

pub fn reduce(state: &mut SessionState, action: Action) -> Vec<Effect> {
    match action {
        Action::SetOptions(patch) => {
            state.options = state.options.merged(&patch);
            vec![Effect::PersistOptions(state.options.clone())]
        }
        Action::SetThemeColor(color) => {
            state.theme_color = color.clone();
            vec![Effect::ApplyThemeColor(color)]
        }
        Action::SetRoomConnected(connected) => {
            state.room_connected = connected;
            Vec::new()
        }
        Action::SetRtmConnected(connected) => {
            state.rtm_connected = connected;
            Vec::new()
        }
        Action::SetAgentConnected(connected) => {
            state.agent_connected = connected;
            Vec::new()
        }
        Action::SetLanguage(language) => {
            state.language = language;
            Vec::new()
        }
        Action::SetVoiceType(voice_type) => {
            state.voice_type = voice_type;
            Vec::new()
        }
        Action::SetMobileActiveTab(tab) => {
            state.mobile_active_tab = tab;
            Vec::new()
        }
        Action::SetSelectedGraphId(graph_id) => {
            state.selected_graph_id = graph_id;
            Vec::new()
        }
        Action::SetGraphList(graph_ids) => {
            state.graph_list = graph_ids;
            Vec::new()
        }
        Action::SetGraph(graph) => {
            upsert_graph(state, graph);
            Vec::new()
        }
        Action::SetAddonModules(modules) => {
            state.addon_modules = modules;
            Vec::new()
        }
        Action::AddChatItem(item) => {
            add_chat_item(&mut state.chat_items, item);
            Vec::new()
        }
        Action::Reset => {
            *state = SessionState::default();
            vec![Effect::ApplyThemeColor(default_theme_color())]
        }
    }
}

/// Insert or replace one graph. The map is copied first so snapshots taken
/// before the call keep the map they saw.
fn upsert_graph(state: &mut SessionState, graph: Graph) {
    let mut graph_map = (*state.graph_map).clone();
    graph_map.insert(graph.id.clone(), graph);
    state.graph_map = Arc::new(graph_map);
}

/// Merge an incoming transcript segment into `items`.
///
/// Interim (non-final) segments of a speaker replace each other until a final
/// one arrives; late segments not newer than the speaker's last final segment
/// are dropped. "Last" is by position in the sequence, not by time.
pub fn add_chat_item(items: &mut Vec<ChatItem>, item: ChatItem) -> ChatMerge {
    let last_final = items
        .iter()
        .rposition(|el| el.user_id == item.user_id && el.is_final);
    let last_non_final = items
        .iter()
        .rposition(|el| el.user_id == item.user_id && !el.is_final);

    if let Some(index) = last_final {
        if item.time <= items[index].time {
            debug!(
                user_id = %item.user_id,
                is_final = item.is_final,
                kind = ?item.kind,
                "[Chat] Discarding item not newer than last final: {}",
                item.text
            );
            return ChatMerge::Discarded;
        }
    }

    let outcome = match last_non_final {
        Some(index) => {
            debug!(
                user_id = %item.user_id,
                is_final = item.is_final,
                kind = ?item.kind,
                "[Chat] Updating last non-final item: {}",
                item.text
            );
            items[index] = item;
            ChatMerge::Replaced
        }
        None => {
            debug!(
                user_id = %item.user_id,
                is_final = item.is_final,
                kind = ?item.kind,
                "[Chat] Adding new item: {}",
                item.text
            );
            items.push(item);
            ChatMerge::Appended
        }
    };

    items.sort_by_key(|el| el.time);
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use playground_core::{ChatItemKind, Language, OptionsPatch};

    fn item(user: &str, text: &str, is_final: bool, time: i64) -> ChatItem {
        ChatItem::new(user, text, is_final, ChatItemKind::User, time)
    }

    fn times(items: &[ChatItem]) -> Vec<i64> {
        items.iter().map(|i| i.time).collect()
    }

    #[test]
    fn items_of_distinct_users_are_sorted_by_time() {
        let mut items = Vec::new();
        add_chat_item(&mut items, item("a", "first", true, 5));
        add_chat_item(&mut items, item("b", "second", true, 3));
        add_chat_item(&mut items, item("c", "third", true, 8));
        assert_eq!(times(&items), vec![3, 5, 8]);
    }

    #[test]
    fn stale_item_after_final_is_discarded() {
        let mut items = vec![item("u", "done", true, 10)];
        let before = items.clone();
        assert_eq!(add_chat_item(&mut items, item("u", "late", false, 7)), ChatMerge::Discarded);
        assert_eq!(items, before);
    }

    #[test]
    fn item_at_same_time_as_final_is_discarded() {
        let mut items = vec![item("u", "done", true, 10)];
        assert_eq!(add_chat_item(&mut items, item("u", "dup", true, 10)), ChatMerge::Discarded);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].text, "done");
    }

    #[test]
    fn interim_item_replaces_previous_interim() {
        let mut items = vec![item("u", "hel", false, 5)];
        assert_eq!(add_chat_item(&mut items, item("u", "hello", false, 9)), ChatMerge::Replaced);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].text, "hello");
        assert_eq!(items[0].time, 9);
    }

    #[test]
    fn final_item_settles_the_interim_one() {
        let mut items = vec![item("u", "hel", false, 5)];
        assert_eq!(add_chat_item(&mut items, item("u", "hello.", true, 6)), ChatMerge::Replaced);
        assert_eq!(items, vec![item("u", "hello.", true, 6)]);
    }

    #[test]
    fn newer_item_after_final_starts_a_new_utterance() {
        let mut items = vec![item("u", "one.", true, 10)];
        assert_eq!(add_chat_item(&mut items, item("u", "tw", false, 12)), ChatMerge::Appended);
        assert_eq!(times(&items), vec![10, 12]);
    }

    #[test]
    fn other_speakers_do_not_interfere() {
        let mut items = vec![item("agent", "hi there.", true, 20), item("u", "he", false, 5)];
        add_chat_item(&mut items, item("u", "hey", false, 6));
        assert_eq!(items.len(), 2);
        // The agent's final item at 20 does not discard the user's item at 6.
        assert_eq!(items[0].text, "hey");
        assert_eq!(items[1].text, "hi there.");
    }

    #[test]
    fn replaced_item_moves_to_its_new_time_slot() {
        let mut items = vec![item("u", "so", false, 1), item("agent", "ok.", true, 4)];
        add_chat_item(&mut items, item("u", "so then", false, 7));
        assert_eq!(
            items.iter().map(|i| i.text.as_str()).collect::<Vec<_>>(),
            vec!["ok.", "so then"]
        );
    }

    #[test]
    fn last_final_is_found_by_position_not_time() {
        // Delivered out of order: the final at position 1 is older than the
        // one at position 0, and it is the one compared against.
        let mut items = vec![item("u", "later.", true, 10), item("u", "earlier.", true, 4)];
        assert_eq!(add_chat_item(&mut items, item("u", "mid", false, 7)), ChatMerge::Appended);
        assert_eq!(times(&items), vec![4, 7, 10]);
    }

    #[test]
    fn set_options_merges_and_requests_persistence() {
        let mut state = SessionState::default();
        reduce(
            &mut state,
            Action::SetOptions(OptionsPatch {
                channel: Some("room".into()),
                ..OptionsPatch::default()
            }),
        );
        let effects = reduce(
            &mut state,
            Action::SetOptions(OptionsPatch {
                user_id: Some("123456".into()),
                ..OptionsPatch::default()
            }),
        );
        assert_eq!(state.options.channel, "room");
        assert_eq!(state.options.user_id, "123456");
        assert_eq!(effects, vec![Effect::PersistOptions(state.options.clone())]);
    }

    #[test]
    fn set_graph_replaces_one_entry_in_a_new_map() {
        let mut state = SessionState::default();
        reduce(&mut state, Action::SetGraph(Graph::new("a")));
        reduce(&mut state, Action::SetGraph(Graph::new("b")));
        let before = Arc::clone(&state.graph_map);

        let mut replacement = Graph::new("a");
        replacement.nodes.push(playground_core::GraphNode {
            name: "stt".into(),
            addon: "deepgram_asr_python".into(),
            extension_group: None,
            app: None,
            property: None,
        });
        reduce(&mut state, Action::SetGraph(replacement.clone()));

        assert!(!Arc::ptr_eq(&before, &state.graph_map));
        assert_eq!(state.graph_map["a"], replacement);
        assert_eq!(state.graph_map["b"], before["b"]);
        // The earlier snapshot still sees the old entry.
        assert!(before["a"].nodes.is_empty());
    }

    #[test]
    fn reset_restores_defaults_and_reapplies_theme() {
        let mut state = SessionState::default();
        reduce(&mut state, Action::SetThemeColor("#563FD8".into()));
        reduce(&mut state, Action::SetLanguage(Language::JaJp));
        reduce(&mut state, Action::SetRoomConnected(true));
        reduce(&mut state, Action::SetGraphList(vec!["a".into()]));
        reduce(&mut state, Action::AddChatItem(item("u", "x", true, 1)));

        let effects = reduce(&mut state, Action::Reset);
        assert_eq!(state, SessionState::default());
        assert_eq!(effects, vec![Effect::ApplyThemeColor("#0888FF".into())]);
    }

    #[test]
    fn connection_flags_are_independent() {
        let mut state = SessionState::default();
        reduce(&mut state, Action::SetAgentConnected(true));
        assert!(state.agent_connected);
        assert!(!state.room_connected);
        assert!(!state.rtm_connected);
        reduce(&mut state, Action::SetRtmConnected(true));
        reduce(&mut state, Action::SetAgentConnected(false));
        assert!(state.rtm_connected);
        assert!(!state.agent_connected);
    }
}
