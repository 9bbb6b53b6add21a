pub mod figure;
pub mod source;

pub use figure::{DetailsPanel, Figure, RectEntry};
pub use source::{
    DetailsSource, FigureError, FigureSource, MetricsSource, RectSource, SampleTiming,
};
