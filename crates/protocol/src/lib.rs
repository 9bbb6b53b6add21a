pub mod commands;
pub mod types;

pub use commands::ViewportCommand;
pub use types::{Color, Point, Rect, Transform};
