use std::collections::BTreeMap;
use std::sync::RwLock;

use tracing::debug;

use playground_core::ThemeSurface;

/// Global style properties of the rendering surface, kept in memory.
#[derive(Default)]
pub struct StyleProperties {
    properties: RwLock<BTreeMap<String, String>>,
}

impl StyleProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.properties
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(name)
            .cloned()
    }
}

impl ThemeSurface for StyleProperties {
    fn set_property(&self, name: &str, value: &str) {
        debug!(name, value, "Setting style property");
        self.properties
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(name.to_string(), value.to_string());
    }
}
