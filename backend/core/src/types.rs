use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Color palette entry: the color used while active and the dimmed default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeColor {
    pub active: &'static str,
    pub default: &'static str,
}

/// Theme palette offered by the UI. The first entry is the default theme.
pub const COLOR_LIST: &[ThemeColor] = &[
    ThemeColor { active: "#0888FF", default: "#143354" },
    ThemeColor { active: "#563FD8", default: "#2C2553" },
    ThemeColor { active: "#18A957", default: "#173526" },
    ThemeColor { active: "#FFAB08", default: "#423115" },
    ThemeColor { active: "#FD5C63", default: "#462629" },
    ThemeColor { active: "#E225B2", default: "#481C3F" },
];

/// CSS custom property that carries the theme color on the rendering surface.
pub const THEME_COLOR_PROPERTY: &str = "--theme-color";

pub fn default_theme_color() -> String {
    COLOR_LIST[0].active.to_string()
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Session options mirrored to local storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Options {
    pub channel: String,
    pub user_id: String,
    pub user_name: String,
    pub app_id: String,
    pub token: String,
}

/// Partial update for [`Options`]. `None` fields leave the current value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OptionsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Options {
    /// Merge a patch over these options, returning the merged value.
    pub fn merged(&self, patch: &OptionsPatch) -> Options {
        Options {
            channel: patch.channel.clone().unwrap_or_else(|| self.channel.clone()),
            user_id: patch.user_id.clone().unwrap_or_else(|| self.user_id.clone()),
            user_name: patch.user_name.clone().unwrap_or_else(|| self.user_name.clone()),
            app_id: patch.app_id.clone().unwrap_or_else(|| self.app_id.clone()),
            token: patch.token.clone().unwrap_or_else(|| self.token.clone()),
        }
    }
}

impl From<Options> for OptionsPatch {
    fn from(options: Options) -> Self {
        Self {
            channel: Some(options.channel),
            user_id: Some(options.user_id),
            user_name: Some(options.user_name),
            app_id: Some(options.app_id),
            token: Some(options.token),
        }
    }
}

// ---------------------------------------------------------------------------
// UI enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en-US")]
    EnUs,
    #[serde(rename = "zh-CN")]
    ZhCn,
    #[serde(rename = "ja-JP")]
    JaJp,
    #[serde(rename = "ko-KR")]
    KoKr,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Language::EnUs => "en-US",
            Language::ZhCn => "zh-CN",
            Language::JaJp => "ja-JP",
            Language::KoKr => "ko-KR",
        };
        f.write_str(code)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceType {
    #[default]
    Male,
    Female,
}

/// Which panel is visible on narrow (mobile) layouts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MobileActiveTab {
    #[default]
    Agent,
    Chat,
}

// ---------------------------------------------------------------------------
// Chat transcript
// ---------------------------------------------------------------------------

/// Who produced a transcript segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatItemKind {
    Agent,
    User,
}

/// A speech-to-text transcript segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatItem {
    pub user_id: String,
    pub text: String,
    pub is_final: bool,
    #[serde(rename = "type")]
    pub kind: ChatItemKind,
    /// Milliseconds since the Unix epoch.
    pub time: i64,
}

impl ChatItem {
    pub fn new(
        user_id: impl Into<String>,
        text: impl Into<String>,
        is_final: bool,
        kind: ChatItemKind,
        time: i64,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            text: text.into(),
            is_final,
            kind,
            time,
        }
    }

    /// A segment stamped with the current wall-clock time.
    pub fn now(
        user_id: impl Into<String>,
        text: impl Into<String>,
        is_final: bool,
        kind: ChatItemKind,
    ) -> Self {
        Self::new(user_id, text, is_final, kind, chrono::Utc::now().timestamp_millis())
    }
}

// ---------------------------------------------------------------------------
// Graphs and addons
// ---------------------------------------------------------------------------

pub type GraphId = String;

/// Entry of the graph list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSummary {
    pub id: GraphId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_start: Option<bool>,
}

/// An extension instance inside a graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub name: String,
    pub addon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<Value>,
}

/// Message routes leaving one extension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphConnection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app: Option<String>,
    pub extension: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cmd: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_frame: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_frame: Option<Vec<Value>>,
}

/// Full detail record of a processing-pipeline graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub id: GraphId,
    #[serde(default)]
    pub nodes: Vec<GraphNode>,
    #[serde(default)]
    pub connections: Vec<GraphConnection>,
}

impl Graph {
    pub fn new(id: impl Into<GraphId>) -> Self {
        Self {
            id: id.into(),
            nodes: Vec::new(),
            connections: Vec::new(),
        }
    }
}

/// Partial update sent to the graph update endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodes: Option<Vec<GraphNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connections: Option<Vec<GraphConnection>>,
}

/// Server-registered extension descriptor. Everything besides the name is kept
/// as delivered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddonModule {
    pub name: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl AddonModule {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Map::new(),
        }
    }
}
