use std::io::{self, BufRead};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::tty::IsTty;

use crate::input::{InputError, InputSource, Token};

/// Raw-mode keyboard reader on top of the crossterm event stream.
pub struct KeyboardSource {
    pub(crate) poll_interval: Duration,
}

impl KeyboardSource {
    pub fn open(poll_interval: Duration) -> Result<Self, InputError> {
        if !io::stdin().is_tty() {
            return Err(InputError::Unavailable);
        }
        Ok(Self { poll_interval })
    }

    /// Wait up to `timeout` for a key press and translate it. Returns
    /// `Ok(None)` on timeout or on events that carry no token (releases,
    /// repeats, resizes).
    pub(crate) fn try_read(&mut self, timeout: Duration) -> Result<Option<Token>, InputError> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        match event::read()? {
            Event::Key(key) => Ok(Self::token_from(key)),
            _ => Ok(None),
        }
    }

    fn token_from(key: KeyEvent) -> Option<Token> {
        // Press only. Repeat would inflate held-key movement and Release
        // arrives twice on enhanced-mode terminals.
        if key.kind != KeyEventKind::Press {
            return None;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Token::Esc);
        }
        match key.code {
            KeyCode::Char(ch) => Some(Token::Char(ch)),
            KeyCode::Up => Some(Token::Up),
            KeyCode::Down => Some(Token::Down),
            KeyCode::Left => Some(Token::Left),
            KeyCode::Right => Some(Token::Right),
            KeyCode::Enter => Some(Token::Enter),
            KeyCode::Esc => Some(Token::Esc),
            KeyCode::Tab => Some(Token::Tab),
            KeyCode::Backspace => Some(Token::Backspace),
            _ => None,
        }
    }
}

impl InputSource for KeyboardSource {
    fn next_token(&mut self) -> Result<Token, InputError> {
        loop {
            if let Some(token) = self.try_read(self.poll_interval)? {
                return Ok(token);
            }
        }
    }

    fn drain_pending(&mut self) {
        while event::poll(Duration::ZERO).unwrap_or(false) {
            let _ = event::read();
        }
    }
}

/// Degraded reader for hosts without an interactive terminal: one token per
/// line of stdin. Accepts the keymap token-spec words as well as bare
/// characters, so `up<newline>` and `k<newline>` both work.
pub struct LineFallbackSource {
    stdin: io::Stdin,
}

impl LineFallbackSource {
    pub fn new() -> Self {
        Self { stdin: io::stdin() }
    }

    fn token_from_line(line: &str) -> Option<Token> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Some(Token::Enter);
        }
        Token::parse(trimmed).or_else(|| trimmed.chars().next().map(Token::Char))
    }
}

impl Default for LineFallbackSource {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSource for LineFallbackSource {
    fn next_token(&mut self) -> Result<Token, InputError> {
        loop {
            let mut line = String::new();
            if self.stdin.lock().read_line(&mut line)? == 0 {
                return Err(InputError::Closed);
            }
            if let Some(token) = Self::token_from_line(&line) {
                return Ok(token);
            }
        }
    }

    fn drain_pending(&mut self) {
        // Line-buffered input has no key-ahead buffer worth flushing.
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_line_parsing() {
        assert_eq!(LineFallbackSource::token_from_line("\n"), Some(Token::Enter));
        assert_eq!(LineFallbackSource::token_from_line("up\n"), Some(Token::Up));
        assert_eq!(LineFallbackSource::token_from_line("  esc \n"), Some(Token::Esc));
        assert_eq!(LineFallbackSource::token_from_line("3\n"), Some(Token::Char('3')));
        // Multi-char garbage degrades to its first character.
        assert_eq!(
            LineFallbackSource::token_from_line("yes\n"),
            Some(Token::Char('y'))
        );
    }
}
