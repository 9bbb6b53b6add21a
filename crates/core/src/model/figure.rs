use profile_svg_protocol::{Color, Point, Rect, Transform, ViewportCommand};
use tracing::{debug, warn};

use super::source::{DetailsSource, FigureError, FigureSource, SampleTiming};
use crate::config::{AnchorMode, ViewerConfig};
use crate::interaction::WheelThrottle;
use crate::label::LabelMetrics;
use crate::viewport::{Transition, ViewState};

/// One profile frame: bounds in unscaled space plus its hover strings.
#[derive(Debug, Clone, PartialEq)]
pub struct RectEntry {
    pub bounds: Rect,
    /// Full, untruncated label text.
    pub short_info: String,
    pub dir_info: Option<String>,
}

/// Where the hover details go, resolved once when the figure is built.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailsPanel {
    pub details_at: Point,
    pub time_at: Point,
    pub background: Rect,
    pub background_fill: Option<Color>,
}

impl DetailsPanel {
    fn layout(
        width: f64,
        height: f64,
        char_width: f64,
        text_height: f64,
        source: &DetailsSource,
    ) -> Self {
        let baseline = height - text_height * 0.75;
        Self {
            details_at: Point::new(char_width, baseline),
            time_at: Point::new(width - char_width * 10.0, baseline),
            background: Rect::new(0.0, height - text_height * 2.0, width, text_height * 2.0),
            background_fill: contrasting_fill(source),
        }
    }

    pub fn place_command(&self) -> ViewportCommand {
        ViewportCommand::PlaceDetails {
            details_at: self.details_at,
            time_at: self.time_at,
            background: self.background,
            background_fill: self.background_fill,
        }
    }
}

/// A background the stylesheet left transparent gets white behind dark text
/// and black behind light text.
fn contrasting_fill(source: &DetailsSource) -> Option<Color> {
    if let Some(raw) = &source.background_fill {
        match Color::parse_css(raw) {
            Some(color) if color.is_transparent() => {}
            Some(_) => return None,
            None => {
                debug!(fill = %raw, "unrecognized background fill, treating as opaque");
                return None;
            }
        }
    }
    let text = source.text_fill.as_deref().and_then(Color::parse_css);
    if text.is_none() {
        warn!(fill = ?source.text_fill, "details text fill unknown, assuming dark text");
    }
    let dark_text = text.is_none_or(|c| c.is_dark());
    Some(if dark_text { Color::WHITE } else { Color::BLACK })
}

/// One interactive viewport bound to a profile diagram.
#[derive(Debug)]
pub struct Figure {
    pub(crate) id: String,
    pub(crate) width: f64,
    pub(crate) height: f64,
    pub(crate) visible_width: f64,
    pub(crate) center_x: f64,
    pub(crate) state: ViewState,
    pub(crate) rendered: ViewState,
    pub(crate) rects: Vec<RectEntry>,
    pub(crate) metrics: LabelMetrics,
    pub(crate) corner_radius: f64,
    pub(crate) has_visible_labels: bool,
    pub(crate) timing: Option<SampleTiming>,
    pub(crate) details: Option<DetailsPanel>,
    pub(crate) config: ViewerConfig,
    pub(crate) transition: Option<Transition>,
    pub(crate) wheel: WheelThrottle,
}

impl Figure {
    /// Build a figure from a scanned document and start the initial
    /// fit-to-frame transition.
    ///
    /// The returned commands hide every label, place the details panel and
    /// begin the reset animation; drive it with [`Figure::tick`].
    pub fn initialize(
        source: FigureSource,
        now_ms: f64,
    ) -> Result<(Self, Vec<ViewportCommand>), FigureError> {
        let FigureSource {
            id,
            width,
            height,
            clip_width,
            rects,
            labels_transparent,
            corner_radius,
            metrics,
            timing,
            details,
            config,
        } = source;

        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(FigureError::InvalidExtent { id, width, height });
        }
        config.validate()?;
        if width - config.margin_x <= 0.0 {
            return Err(FigureError::MarginTooWide {
                id,
                margin: config.margin_x,
                width,
            });
        }
        let visible_width = match clip_width {
            Some(clip) if !(clip.is_finite() && clip > 0.0) => {
                return Err(FigureError::InvalidClip {
                    id,
                    clip_width: clip,
                });
            }
            Some(clip) => clip,
            None => width,
        };
        let metrics = metrics.resolve();
        if !metrics.is_valid() {
            return Err(FigureError::InvalidMetrics(metrics));
        }
        if let Some(t) = &timing
            && !(t.x_step.is_finite() && t.x_step > 0.0)
        {
            return Err(FigureError::InvalidTiming(t.x_step));
        }

        let rects = rects
            .into_iter()
            .enumerate()
            .map(|(index, rect)| {
                if !(rect.width.is_finite() && rect.width > 0.0) {
                    return Err(FigureError::InvalidRect {
                        index,
                        width: rect.width,
                    });
                }
                let short_info = rect.short_info.ok_or(FigureError::MissingLabel(index))?;
                Ok(RectEntry {
                    bounds: Rect::new(rect.x, rect.y, rect.width, rect.height),
                    short_info,
                    dir_info: rect.dir_info,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let details = match details {
            Some(src) => {
                let text_height = metrics
                    .text_height()
                    .or(src.text_height)
                    .ok_or(FigureError::MissingTextHeight)?;
                Some(DetailsPanel::layout(
                    width,
                    height,
                    metrics.floor_width(),
                    text_height,
                    &src,
                ))
            }
            None => None,
        };

        let center_x = visible_width / 2.0;
        let state = match config.anchor {
            AnchorMode::Center => ViewState::new(center_x, 1.0),
            AnchorMode::ScaleOrigin => ViewState::with_origin(center_x, 1.0, center_x),
        };
        let wheel = WheelThrottle::new(config.wheel_throttle_ms, now_ms);

        let mut figure = Figure {
            id,
            width,
            height,
            visible_width,
            center_x,
            state,
            rendered: state,
            rects,
            metrics,
            corner_radius: corner_radius.max(0.0),
            has_visible_labels: !labels_transparent,
            timing,
            details,
            config,
            transition: None,
            wheel,
        };
        debug!(
            figure = %figure.id,
            rects = figure.rects.len(),
            width,
            visible_width,
            labels = figure.has_visible_labels,
            "initialized figure"
        );

        let mut commands = Vec::new();
        if figure.has_visible_labels && !figure.rects.is_empty() {
            commands.push(ViewportCommand::SetLabelsDisplay { visible: false });
        }
        if let Some(panel) = &figure.details {
            commands.push(panel.place_command());
        }
        let hide = ViewportCommand::SetLabelsDisplay { visible: false };
        commands.extend(figure.reset().into_iter().filter(|c| *c != hide));
        Ok((figure, commands))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Width of the visible window (the clip width, if any).
    pub fn visible_width(&self) -> f64 {
        self.visible_width
    }

    pub fn center_x(&self) -> f64 {
        self.center_x
    }

    /// Target state of the latest gesture.
    pub fn state(&self) -> ViewState {
        self.state
    }

    /// State of the last rendered frame.
    pub fn rendered_state(&self) -> ViewState {
        self.rendered
    }

    pub fn rendered_transform(&self) -> Transform {
        self.rendered.transform(self.center_x)
    }

    pub fn rects(&self) -> &[RectEntry] {
        &self.rects
    }

    pub fn rect(&self, index: usize) -> Result<&RectEntry, FigureError> {
        self.rects.get(index).ok_or(FigureError::UnknownRect(index))
    }

    pub fn details(&self) -> Option<&DetailsPanel> {
        self.details.as_ref()
    }
}
