use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ViewerConfig;
use crate::label::LabelMetrics;

#[derive(Debug, Error)]
pub enum FigureError {
    #[error("figure {id}: background must have a positive size, got {width}x{height}")]
    InvalidExtent { id: String, width: f64, height: f64 },
    #[error("figure {id}: clip width must be positive, got {clip_width}")]
    InvalidClip { id: String, clip_width: f64 },
    #[error("figure {id}: margin {margin} leaves no room in a figure {width} wide")]
    MarginTooWide { id: String, margin: f64, width: f64 },
    #[error("rect {index}: width must be positive and finite, got {width}")]
    InvalidRect { index: usize, width: f64 },
    #[error("rect {0} has no paired label")]
    MissingLabel(usize),
    #[error("no rect at index {0}")]
    UnknownRect(usize),
    #[error("invalid character metrics: {0:?}")]
    InvalidMetrics(LabelMetrics),
    #[error("details panel needs a text height; supply glyph samples or details.text_height")]
    MissingTextHeight,
    #[error("timing x_step must be positive, got {0}")]
    InvalidTiming(f64),
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
    #[error("invalid figure description: {0}")]
    Json(#[from] serde_json::Error),
}

/// How the host measured label text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum MetricsSource {
    /// A single constant width per character.
    Average { char_width: f64 },
    /// Bounding boxes of [`crate::label::WIDE_SAMPLE`] and
    /// [`crate::label::NARROW_SAMPLE`] rendered in the label font.
    Glyphs {
        wide_sample_width: f64,
        narrow_sample_width: f64,
        text_height: f64,
    },
}

impl MetricsSource {
    pub fn resolve(self) -> LabelMetrics {
        match self {
            MetricsSource::Average { char_width } => LabelMetrics::Average { char_width },
            MetricsSource::Glyphs {
                wide_sample_width,
                narrow_sample_width,
                text_height,
            } => LabelMetrics::from_glyph_samples(
                wide_sample_width,
                narrow_sample_width,
                text_height,
            ),
        }
    }
}

/// One frame rectangle as found in the document, with its paired label text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectSource {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Full text of the adjacent label (`"<function> in <file:line>"`).
    /// `None` when the rectangle has no label sibling.
    #[serde(default)]
    pub short_info: Option<String>,
    /// Directory part of the source location (`data-dinfo`).
    #[serde(default)]
    pub dir_info: Option<String>,
}

/// Sample-to-time conversion read from the viewport group
/// (`data-xstep`, `data-delay`, `data-tunit`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleTiming {
    /// Width of one sample in unscaled pixels.
    pub x_step: f64,
    /// Sampling interval in seconds.
    pub delay: f64,
    /// Display unit: `s`, `ms`, `us`/`μs`, or anything else for raw counts.
    pub unit: String,
}

/// What the host knows about the details panel styling.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetailsSource {
    /// Computed fill of the details text, e.g. `rgb(0, 0, 0)`.
    #[serde(default)]
    pub text_fill: Option<String>,
    /// Computed fill of the background band.
    #[serde(default)]
    pub background_fill: Option<String>,
    /// Used when metrics carry no text height.
    #[serde(default)]
    pub text_height: Option<f64>,
}

/// Everything the engine needs from the document to build a figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FigureSource {
    pub id: String,
    /// Background rectangle size.
    pub width: f64,
    pub height: f64,
    /// Width of the clip rectangle when the figure clips instead of resizing.
    #[serde(default)]
    pub clip_width: Option<f64>,
    pub rects: Vec<RectSource>,
    /// Labels are rendered with zero stroke opacity; never show them.
    #[serde(default)]
    pub labels_transparent: bool,
    /// Corner radius of the first rectangle; zero for path rectangles.
    #[serde(default)]
    pub corner_radius: f64,
    pub metrics: MetricsSource,
    #[serde(default)]
    pub timing: Option<SampleTiming>,
    #[serde(default)]
    pub details: Option<DetailsSource>,
    #[serde(default)]
    pub config: ViewerConfig,
}

impl FigureSource {
    pub fn from_json(data: &[u8]) -> Result<Self, FigureError> {
        Ok(serde_json::from_slice(data)?)
    }
}
