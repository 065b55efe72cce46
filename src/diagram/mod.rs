pub mod dot;
pub mod render;

pub use dot::{to_dot, write_dot};
pub use render::render_png;
