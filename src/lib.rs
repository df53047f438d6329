//! Interactive terminal menu engine. One `Engine` session turns a
//! `MenuState` into a `MenuOutcome`, driving heterogeneous input devices
//! through a single semantic action stream and rendering across terminals
//! of very different capability. The binary target (main.rs) is a
//! demonstration driver; this module tree is the product.

pub mod action;
pub mod config;
pub mod input;
pub mod keymap;
pub mod menu;
pub mod render;
pub mod session;
pub mod sound;

pub use action::{Action, ActionMapper};
pub use config::Config;
pub use menu::{Engine, MenuItem, MenuOutcome, MenuState};
pub use render::{RenderCapability, RenderTier, Renderer};
pub use sound::{Cue, NullSound, SoundHook};
