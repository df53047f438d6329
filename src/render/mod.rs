pub mod capability;
pub mod compose;
pub mod renderer;

pub use capability::{RenderCapability, RenderTier};
pub use compose::{compose, compose_info, compose_move_summary};
pub use renderer::Renderer;
