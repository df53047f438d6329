pub mod engine;
pub mod item;
pub mod schema;
pub mod state;

pub use engine::{Engine, MenuOutcome};
pub use item::{Callback, ItemKind, MenuItem};
pub use schema::{ItemDef, MenuDef};
pub use state::{MenuState, ToggleOutcome};
