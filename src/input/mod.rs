pub mod keyboard;
pub mod queue;
pub mod scripted;

use std::io;
use std::time::Duration;

use thiserror::Error;

pub use keyboard::{KeyboardSource, LineFallbackSource};
pub use queue::{PairedSource, QueuedSource, TokenSender};
pub use scripted::ScriptedSource;

/// Raw input unit shared by every adapter. Keyboard and device pollers emit
/// the same alphabet, so nothing downstream knows where a token came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Token {
    Char(char),
    Up,
    Down,
    Left,
    Right,
    Enter,
    Esc,
    Tab,
    Backspace,
    Button(u8),
}

impl Token {
    /// Parse a token spec as written in keymap files: named keys, single
    /// characters, or `btn:N` device button codes.
    pub fn parse(spec: &str) -> Option<Token> {
        match spec {
            "up" => return Some(Token::Up),
            "down" => return Some(Token::Down),
            "left" => return Some(Token::Left),
            "right" => return Some(Token::Right),
            "enter" | "return" => return Some(Token::Enter),
            "esc" | "escape" => return Some(Token::Esc),
            "tab" => return Some(Token::Tab),
            "backspace" => return Some(Token::Backspace),
            "space" => return Some(Token::Char(' ')),
            _ => {}
        }
        if let Some(code) = spec.strip_prefix("btn:") {
            return code.parse::<u8>().ok().map(Token::Button);
        }
        let mut chars = spec.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Some(Token::Char(ch)),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("no usable input device")]
    Unavailable,
    #[error("input source closed")]
    Closed,
    #[error("terminal input error: {0}")]
    Io(#[from] io::Error),
}

/// A blocking token producer. Adapters differ only in where tokens come
/// from; the engine consumes them through this interface alone.
pub trait InputSource {
    /// Block until the next token arrives.
    fn next_token(&mut self) -> Result<Token, InputError>;

    /// Discard whatever is sitting in the device's pending buffer. Called at
    /// session open and right after a debounce suppression fires.
    fn drain_pending(&mut self);
}

/// Open the best available real input source: the raw-mode keyboard reader,
/// or the line-buffered fallback when no interactive device exists.
pub fn open_default(poll_interval: Duration) -> Box<dyn InputSource> {
    match KeyboardSource::open(poll_interval) {
        Ok(kb) => Box::new(kb),
        Err(err) => {
            tracing::warn!("keyboard input unavailable ({err}), using line-buffered fallback");
            Box::new(LineFallbackSource::new())
        }
    }
}
