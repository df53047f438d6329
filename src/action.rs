use std::collections::HashMap;

use crate::input::Token;
use crate::keymap::Keymap;

/// Semantic input signal, independent of the originating device.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    Select,
    Cancel,
    Toggle,
    Info,
    /// Direct numeric selection of the item at this index.
    JumpTo(usize),
}

/// Translates raw tokens into actions. Built once per engine from a keymap;
/// knows nothing about the token's source, and never special-cases devices.
pub struct ActionMapper {
    bindings: HashMap<Token, Action>,
}

impl ActionMapper {
    pub fn new(keymap: &Keymap) -> Self {
        let mut bindings = HashMap::new();
        let table: [(&[String], Action); 8] = [
            (&keymap.up, Action::Up),
            (&keymap.down, Action::Down),
            (&keymap.left, Action::Left),
            (&keymap.right, Action::Right),
            (&keymap.select, Action::Select),
            (&keymap.cancel, Action::Cancel),
            (&keymap.toggle, Action::Toggle),
            (&keymap.info, Action::Info),
        ];
        for (specs, action) in table {
            for token in Keymap::tokens(specs) {
                bindings.entry(token).or_insert(action);
            }
        }
        Self { bindings }
    }

    /// Unrecognized tokens map to `None` and are ignored upstream. Digits
    /// always win over keymap bindings: '1'..'9' jump to items 0..8 and '0'
    /// to item 9.
    pub fn map(&self, token: Token) -> Option<Action> {
        if let Token::Char(ch) = token {
            if ch.is_ascii_digit() {
                let index = match ch {
                    '0' => 9,
                    _ => (ch as usize) - ('1' as usize),
                };
                return Some(Action::JumpTo(index));
            }
        }
        self.bindings.get(&token).copied()
    }
}

impl Default for ActionMapper {
    fn default() -> Self {
        Self::new(&Keymap::default())
    }
}
