use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::menu::item::MenuItem;
use crate::menu::state::MenuState;

/// Data-only menu definition, loadable from JSON. Covers everything a
/// `MenuState` can hold except callbacks: shop inventories, option lists
/// and the like are authored as files and attached to behavior in code.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MenuDef {
    pub title: String,
    #[serde(default)]
    pub aux: Vec<String>,
    pub items: Vec<ItemDef>,
    #[serde(default = "default_cancellable")]
    pub cancellable: bool,
    #[serde(default)]
    pub multi_select: bool,
    #[serde(default)]
    pub max_selections: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ItemDef {
    pub label: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub value: Option<String>,
}

fn default_cancellable() -> bool {
    true
}

fn default_enabled() -> bool {
    true
}

impl MenuDef {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn into_state(self) -> MenuState {
        let mut state = MenuState::new(self.title);
        state.aux_lines = self.aux;
        state.cancellable = self.cancellable;
        state.multi_select = self.multi_select;
        state.max_selections = self.max_selections;
        for def in self.items {
            let mut item = MenuItem::data(def.label, def.description);
            if let Some(value) = def.value {
                item = item.with_value(value);
            }
            if !def.enabled {
                item = item.disabled();
            }
            state.items.push(item);
        }
        state
    }
}
