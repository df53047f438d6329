use std::collections::BTreeSet;
use std::io;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, warn};

use crate::action::{Action, ActionMapper};
use crate::config::Config;
use crate::input::{self, InputError, InputSource};
use crate::keymap::Keymap;
use crate::menu::item::ItemKind;
use crate::menu::state::{MenuState, ToggleOutcome};
use crate::render::{
    RenderCapability, RenderTier, Renderer, compose, compose_info, compose_move_summary,
};
use crate::session::{DebounceWindow, SessionGuard};
use crate::sound::{Cue, NullSound, SoundHook};

/// Terminal result of one menu session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MenuOutcome {
    Selected(usize),
    SelectedMany(BTreeSet<usize>),
    Cancelled,
    /// Override produced by an action item's callback.
    Value(String),
}

/// Internal failure taxonomy. Never escapes `run()`: every variant resolves
/// to a degraded continuation or, at worst, a `Cancelled` result.
#[derive(Debug, Error)]
enum MenuError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("render failed at minimal tier: {0}")]
    Render(#[from] io::Error),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Ack {
    Accepted,
    Rejected,
    Ignored,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Redraw {
    None,
    /// Cursor or selection changed: minimal tier prints a summary line.
    Update,
    Full,
}

struct Applied {
    ack: Ack,
    redraw: Redraw,
    outcome: Option<MenuOutcome>,
}

fn moved(changed: bool) -> Applied {
    Applied {
        ack: if changed { Ack::Accepted } else { Ack::Ignored },
        redraw: if changed { Redraw::Update } else { Redraw::None },
        outcome: None,
    }
}

fn rejected() -> Applied {
    Applied {
        ack: Ack::Rejected,
        redraw: Redraw::None,
        outcome: None,
    }
}

fn ignored() -> Applied {
    Applied {
        ack: Ack::Ignored,
        redraw: Redraw::None,
        outcome: None,
    }
}

fn finish(outcome: MenuOutcome) -> Applied {
    Applied {
        ack: Ack::Accepted,
        redraw: Redraw::None,
        outcome: Some(outcome),
    }
}

/// Cue selection is a pure function of the action and how it was received.
/// Ignored input (boundary no-op moves, unrecognized jumps) stays silent;
/// phantom feedback at list edges is worse than none.
fn cue_for(action: Action, ack: Ack) -> Option<Cue> {
    match ack {
        Ack::Ignored => None,
        Ack::Rejected => Some(Cue::Error),
        Ack::Accepted => match action {
            Action::Up | Action::Down | Action::Left | Action::Right => Some(Cue::Move),
            Action::Cancel => Some(Cue::Cancel),
            _ => Some(Cue::Confirm),
        },
    }
}

/// The menu state machine. Owns its collaborators for the life of the
/// process; each `run` call is one session over a caller-provided state.
pub struct Engine {
    input: Box<dyn InputSource>,
    sound: Box<dyn SoundHook>,
    renderer: Renderer,
    mapper: ActionMapper,
    grace: Duration,
}

impl Engine {
    pub fn new(
        input: Box<dyn InputSource>,
        sound: Box<dyn SoundHook>,
        renderer: Renderer,
        mapper: ActionMapper,
        grace: Duration,
    ) -> Self {
        Self {
            input,
            sound,
            renderer,
            mapper,
            grace,
        }
    }

    /// Wire up the default collaborators: keyboard input (line-buffered
    /// fallback when no terminal is available), the configured keymap, the
    /// cue player when audio works, and a stdout renderer over the detected
    /// capability. Collaborators are chosen here, once, and never re-probed
    /// inside the loop.
    pub fn from_config(config: &Config) -> Self {
        let input = input::open_default(Duration::from_millis(config.poll_interval_ms));
        let caps = RenderCapability::resolve(config.render_override(), config.compact);
        let keymap = Keymap::load(&config.keymap).unwrap_or_else(|| {
            warn!("keymap '{}' not found, using default", config.keymap);
            Keymap::default()
        });
        Self::new(
            input,
            default_sound(config),
            Renderer::stdout(caps),
            ActionMapper::new(&keymap),
            Duration::from_millis(config.grace_millis),
        )
    }

    /// Run one session to its terminal result. Infallible by contract: an
    /// internal error is logged, reported best-effort, and resolved as
    /// `Cancelled`. A defect here may only fail to look good.
    pub fn run(&mut self, state: &mut MenuState) -> MenuOutcome {
        let _guard = SessionGuard::acquire();
        match self.run_inner(state) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!("menu session '{}' aborted: {err}", state.title);
                let _ = self.renderer.show_message("(menu closed)");
                MenuOutcome::Cancelled
            }
        }
    }

    fn run_inner(&mut self, state: &mut MenuState) -> Result<MenuOutcome, MenuError> {
        if state.is_empty() {
            warn!("menu '{}' opened with no items", state.title);
            return Ok(MenuOutcome::Cancelled);
        }
        state.clamp_cursor();
        self.renderer.begin_session();
        self.input.drain_pending();
        let mut debounce = DebounceWindow::open(self.grace);
        self.draw_full(state)?;

        loop {
            let token = self.input.next_token()?;
            let Some(action) = self.mapper.map(token) else {
                continue;
            };
            if debounce.suppress(action, Instant::now()) {
                debug!("suppressed carried-over {action:?}");
                self.input.drain_pending();
                continue;
            }
            // Defends against item lists mutated behind the session's back.
            state.clamp_cursor();

            let applied = self.apply(state, action)?;
            if let Some(cue) = cue_for(action, applied.ack) {
                self.sound.fire(cue);
            }
            if let Some(outcome) = applied.outcome {
                if self.renderer.tier() == RenderTier::MinimalDiff {
                    self.draw_full(state)?;
                }
                return Ok(outcome);
            }
            match applied.redraw {
                Redraw::None => {}
                Redraw::Update => self.draw_update(state)?,
                Redraw::Full => self.draw_full(state)?,
            }
        }
    }

    fn apply(&mut self, state: &mut MenuState, action: Action) -> Result<Applied, MenuError> {
        match action {
            Action::Up | Action::Left => Ok(moved(state.move_by(-1))),
            Action::Down | Action::Right => Ok(moved(state.move_by(1))),
            Action::Select => self.select(state),
            Action::JumpTo(index) => self.jump_to(state, index),
            Action::Toggle => Ok(toggle_current(state)),
            Action::Cancel => Ok(cancel(state)),
            Action::Info => {
                let caps = self.renderer.capability();
                self.renderer.draw_frame(&compose_info(state, &caps))?;
                let _ = self.input.next_token()?;
                Ok(Applied {
                    ack: Ack::Accepted,
                    redraw: Redraw::Full,
                    outcome: None,
                })
            }
        }
    }

    fn select(&mut self, state: &mut MenuState) -> Result<Applied, MenuError> {
        if state.multi_select {
            if state.selected.is_empty() {
                return Ok(rejected());
            }
            return Ok(finish(MenuOutcome::SelectedMany(state.selected.clone())));
        }
        let index = state.cursor;
        let Some(item) = state.items.get_mut(index) else {
            return Ok(rejected());
        };
        if !item.enabled {
            return Ok(rejected());
        }
        let outcome = match &mut item.kind {
            ItemKind::Action { callback } => match callback(self) {
                Some(value) => MenuOutcome::Value(value),
                None => MenuOutcome::Selected(index),
            },
            ItemKind::Data { .. } => MenuOutcome::Selected(index),
        };
        Ok(finish(outcome))
    }

    fn jump_to(&mut self, state: &mut MenuState, index: usize) -> Result<Applied, MenuError> {
        if index >= state.len() {
            return Ok(ignored());
        }
        if !state.items[index].enabled {
            return Ok(rejected());
        }
        state.cursor = index;
        if state.multi_select {
            // Direct selection toggles the target instead of committing.
            return Ok(match state.toggle(index) {
                ToggleOutcome::Added { reached_cap: true } => {
                    finish(MenuOutcome::SelectedMany(state.selected.clone()))
                }
                ToggleOutcome::Added { .. } | ToggleOutcome::Removed => Applied {
                    ack: Ack::Accepted,
                    redraw: Redraw::Update,
                    outcome: None,
                },
                ToggleOutcome::Rejected => Applied {
                    ack: Ack::Rejected,
                    redraw: Redraw::Update,
                    outcome: None,
                },
            });
        }
        self.select(state)
    }

    fn draw_full(&mut self, state: &MenuState) -> io::Result<()> {
        let caps = self.renderer.capability();
        self.renderer.draw_frame(&compose(state, &caps))
    }

    fn draw_update(&mut self, state: &MenuState) -> io::Result<()> {
        let caps = self.renderer.capability();
        let lines = compose(state, &caps);
        self.renderer.draw_update(&lines, &compose_move_summary(state))
    }
}

fn toggle_current(state: &mut MenuState) -> Applied {
    if !state.multi_select {
        return ignored();
    }
    match state.toggle(state.cursor) {
        ToggleOutcome::Added { reached_cap: true } => {
            finish(MenuOutcome::SelectedMany(state.selected.clone()))
        }
        ToggleOutcome::Added { .. } | ToggleOutcome::Removed => Applied {
            ack: Ack::Accepted,
            redraw: Redraw::Update,
            outcome: None,
        },
        ToggleOutcome::Rejected => rejected(),
    }
}

fn cancel(state: &MenuState) -> Applied {
    if state.cancellable {
        finish(MenuOutcome::Cancelled)
    } else {
        rejected()
    }
}

fn default_sound(config: &Config) -> Box<dyn SoundHook> {
    if !config.sound {
        return Box::new(NullSound);
    }
    #[cfg(feature = "sound")]
    {
        match crate::sound::CuePlayer::new(config.volume) {
            Ok(player) => return Box::new(player),
            Err(err) => warn!("audio unavailable ({err}), cues disabled"),
        }
    }
    Box::new(NullSound)
}
