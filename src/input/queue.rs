use std::sync::mpsc;

use crate::input::keyboard::KeyboardSource;
use crate::input::{InputError, InputSource, Token};

/// Producer half of a device queue. Adapters that sample hardware on their
/// own thread (gamepad pollers and the like) clone one of these and push
/// already-translated tokens through it.
#[derive(Clone)]
pub struct TokenSender {
    tx: mpsc::Sender<Token>,
}

impl TokenSender {
    /// Returns false once the consuming side has been dropped, so poller
    /// threads know when to exit.
    pub fn send(&self, token: Token) -> bool {
        self.tx.send(token).is_ok()
    }
}

/// Consumer half: a FIFO of tokens pushed by a background poller.
pub struct QueuedSource {
    rx: mpsc::Receiver<Token>,
}

pub fn channel() -> (TokenSender, QueuedSource) {
    let (tx, rx) = mpsc::channel();
    (TokenSender { tx }, QueuedSource { rx })
}

impl QueuedSource {
    pub(crate) fn try_next(&mut self) -> Option<Token> {
        self.rx.try_recv().ok()
    }
}

impl InputSource for QueuedSource {
    fn next_token(&mut self) -> Result<Token, InputError> {
        self.rx.recv().map_err(|_| InputError::Closed)
    }

    fn drain_pending(&mut self) {
        while self.rx.try_recv().is_ok() {}
    }
}

/// Keyboard plus device queue. Each iteration polls the keyboard with a
/// short timeout, then drains one token from the device queue. No fairness
/// guarantee between simultaneously ready sources is made or honored; the
/// keyboard-first order here is an implementation detail.
pub struct PairedSource {
    keyboard: KeyboardSource,
    device: QueuedSource,
}

impl PairedSource {
    pub fn new(keyboard: KeyboardSource, device: QueuedSource) -> Self {
        Self { keyboard, device }
    }
}

impl InputSource for PairedSource {
    fn next_token(&mut self) -> Result<Token, InputError> {
        loop {
            let timeout = self.keyboard.poll_interval;
            if let Some(token) = self.keyboard.try_read(timeout)? {
                return Ok(token);
            }
            if let Some(token) = self.device.try_next() {
                return Ok(token);
            }
        }
    }

    fn drain_pending(&mut self) {
        self.keyboard.drain_pending();
        self.device.drain_pending();
    }
}
