use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::action::Action;

static MENU_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Process-wide ownership token for the terminal. At most one menu session
/// holds it at any instant. Acquisition preempts a stale holder instead of
/// waiting: nested menus are synchronous recursive calls on the same logical
/// thread, so the outer claim can never be serviced concurrently.
pub struct SessionGuard {
    _priv: (),
}

impl SessionGuard {
    pub fn acquire() -> Self {
        if MENU_ACTIVE.swap(true, Ordering::AcqRel) {
            debug!("preempting stale menu session claim");
        }
        Self { _priv: () }
    }

    pub fn is_active() -> bool {
        MENU_ACTIVE.load(Ordering::Acquire)
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        MENU_ACTIVE.store(false, Ordering::Release);
    }
}

/// One-shot filter for keystrokes carried over from a menu that closed in
/// the same input cycle. Inside the grace interval the first confirm-key
/// Select and the first Cancel are each suppressed once; everything else
/// passes through. Numeric jumps are deliberate and never suppressed.
pub struct DebounceWindow {
    expires_at: Instant,
    select_used: bool,
    cancel_used: bool,
}

impl DebounceWindow {
    pub fn open(grace: Duration) -> Self {
        Self {
            expires_at: Instant::now() + grace,
            select_used: false,
            cancel_used: false,
        }
    }

    /// Returns true when `action` should be dropped. The caller drains the
    /// input source's pending buffer after every suppression.
    pub fn suppress(&mut self, action: Action, now: Instant) -> bool {
        if now >= self.expires_at {
            return false;
        }
        match action {
            Action::Select if !self.select_used => {
                self.select_used = true;
                true
            }
            Action::Cancel if !self.cancel_used => {
                self.cancel_used = true;
                true
            }
            _ => false,
        }
    }
}
