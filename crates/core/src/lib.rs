//! Viewport engine for interactive profile flame-graph figures.
//!
//! A [`Figure`] owns the zoom state of one diagram. Every operation returns
//! the [`ViewportCommand`]s the host must apply to its document; animations
//! advance through [`Figure::tick`].

pub mod config;
pub mod interaction;
pub mod label;
pub mod model;
pub mod scene;
pub mod viewport;

pub use config::{AnchorMode, ViewerConfig, ZoomStep};
pub use interaction::{Gesture, PointerMapping, Response};
pub use label::{LabelMetrics, fit_label};
pub use model::{Figure, FigureError, FigureSource};
pub use profile_svg_protocol::ViewportCommand;
pub use scene::SceneState;
pub use viewport::ViewState;
