use std::fs;

use rust_embed::Embed;
use serde::{Deserialize, Serialize};

use crate::input::Token;

#[derive(Embed)]
#[folder = "assets/keymaps/"]
struct KeymapAssets;

/// Named binding table from token specs to semantic actions. Digits are not
/// listed here: they are reserved for direct numeric selection and the
/// mapper resolves them before consulting the keymap.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Keymap {
    pub up: Vec<String>,
    pub down: Vec<String>,
    pub left: Vec<String>,
    pub right: Vec<String>,
    pub select: Vec<String>,
    pub cancel: Vec<String>,
    pub toggle: Vec<String>,
    pub info: Vec<String>,
}

impl Keymap {
    pub fn load(name: &str) -> Option<Self> {
        // Try user keymaps dir
        if let Some(config_dir) = dirs::config_dir() {
            let user_path = config_dir
                .join("pickr")
                .join("keymaps")
                .join(format!("{name}.toml"));
            if let Ok(content) = fs::read_to_string(&user_path) {
                if let Ok(keymap) = toml::from_str::<Keymap>(&content) {
                    return Some(keymap);
                }
            }
        }

        // Try bundled presets
        let filename = format!("{name}.toml");
        if let Some(file) = KeymapAssets::get(&filename) {
            if let Ok(content) = std::str::from_utf8(file.data.as_ref()) {
                if let Ok(keymap) = toml::from_str::<Keymap>(content) {
                    return Some(keymap);
                }
            }
        }

        None
    }

    pub fn available_keymaps() -> Vec<String> {
        KeymapAssets::iter()
            .filter_map(|f| f.strip_suffix(".toml").map(|n| n.to_string()))
            .collect()
    }

    /// Resolve one binding list into tokens, dropping unparsable specs.
    pub(crate) fn tokens(specs: &[String]) -> Vec<Token> {
        specs.iter().filter_map(|s| Token::parse(s)).collect()
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::load("default").unwrap_or_else(|| Self {
            up: vec!["up".into(), "k".into()],
            down: vec!["down".into(), "j".into()],
            left: vec!["left".into()],
            right: vec!["right".into()],
            select: vec!["enter".into()],
            cancel: vec!["esc".into(), "q".into()],
            toggle: vec!["space".into(), "t".into()],
            info: vec!["i".into()],
        })
    }
}
