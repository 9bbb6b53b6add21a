//! Turns raw pointer gestures into viewport operations.
//!
//! Hosts translate their native events into [`Gesture`]s, feed them to
//! [`Figure::handle`], and apply the returned commands.

pub mod hover;
pub mod throttle;

pub use throttle::WheelThrottle;

use profile_svg_protocol::{Point, Transform, ViewportCommand};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::model::{Figure, FigureError};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "gesture", rename_all = "snake_case")]
pub enum Gesture {
    /// A wheel notch. `pointer_x` is already in figure coordinates
    /// (see [`PointerMapping`]).
    Wheel { delta_y: f64, pointer_x: f64 },
    DoubleClickRect { index: usize },
    DoubleClickBackground,
    HoverEnter { index: usize },
    HoverLeave { index: usize },
}

/// What the host should do in reaction to a gesture.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Response {
    pub commands: Vec<ViewportCommand>,
    /// Suppress the browser's default action (page scroll for wheel events).
    pub prevent_default: bool,
}

impl Response {
    fn new(commands: Vec<ViewportCommand>) -> Self {
        Self {
            commands,
            prevent_default: false,
        }
    }
}

/// Scale a raw `deltaY` into whole wheel steps; only the sign matters
/// downstream, but sub-pixel trackpad deltas round to zero.
pub fn normalize_wheel(delta_y: f64) -> f64 {
    (delta_y * 100.0).round()
}

/// Maps client coordinates into the figure's own coordinate space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerMapping {
    /// Left edge of the SVG element in client coordinates.
    pub svg_left: f64,
    /// The SVG's current transformation matrix, when the host can read one.
    pub ctm: Option<Transform>,
}

impl PointerMapping {
    pub fn to_figure_x(&self, client_x: f64) -> f64 {
        let x = client_x - self.svg_left;
        self.ctm.map_or(x, |m| m.invert_x(x))
    }
}

impl Figure {
    pub fn handle(&mut self, gesture: Gesture, now_ms: f64) -> Result<Response, FigureError> {
        let response = match gesture {
            Gesture::Wheel { delta_y, pointer_x } => {
                let commands = if self.wheel.admit(now_ms) {
                    self.zoom_at_point(pointer_x, normalize_wheel(delta_y))
                } else {
                    trace!(figure = %self.id, now_ms, "wheel event throttled");
                    Vec::new()
                };
                Response {
                    commands,
                    prevent_default: true,
                }
            }
            Gesture::DoubleClickRect { index } => Response::new(self.zoom_to_rect(index)?),
            Gesture::DoubleClickBackground => Response::new(self.reset()),
            Gesture::HoverEnter { index } => Response::new(self.hover_enter(index)?),
            Gesture::HoverLeave { index } => Response::new(self.hover_leave(index)?),
        };
        Ok(response)
    }

    /// Highlight a label and fill the details panel with its rectangle's
    /// function, location and time.
    pub fn hover_enter(&self, index: usize) -> Result<Vec<ViewportCommand>, FigureError> {
        let rect = self.rect(index)?;
        let mut commands = vec![ViewportCommand::SetLabelHighlight {
            index,
            highlighted: true,
        }];
        if self.details.is_some() {
            commands.push(ViewportCommand::ShowDetails {
                details: hover::details_text(rect),
                time: self
                    .timing
                    .as_ref()
                    .map(|t| hover::time_text(rect.bounds.w, t)),
            });
        }
        Ok(commands)
    }

    pub fn hover_leave(&self, index: usize) -> Result<Vec<ViewportCommand>, FigureError> {
        self.rect(index)?;
        let mut commands = vec![ViewportCommand::SetLabelHighlight {
            index,
            highlighted: false,
        }];
        if self.details.is_some() {
            commands.push(ViewportCommand::HideDetails);
        }
        Ok(commands)
    }

    /// Topmost rectangle under a point in figure coordinates, as currently
    /// rendered.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<usize> {
        let transform = self.rendered_transform();
        let p = Point::new(transform.invert_x(x), y);
        self.rects.iter().rposition(|r| r.bounds.contains(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::test_support::{figure_with, sample_source};
    use crate::model::{DetailsSource, SampleTiming};

    fn with_details() -> Figure {
        let mut source = sample_source();
        source.timing = Some(SampleTiming {
            x_step: 2.0,
            delay: 0.001,
            unit: "ms".into(),
        });
        source.details = Some(DetailsSource {
            text_height: Some(12.0),
            ..DetailsSource::default()
        });
        source.rects[2].dir_info = Some("src/".into());
        figure_with(source)
    }

    #[test]
    fn wheel_is_throttled_and_always_prevents_default() {
        let mut fig = figure_with(sample_source());
        let wheel = Gesture::Wheel {
            delta_y: -1.0,
            pointer_x: 300.0,
        };
        let first = fig.handle(wheel, 1_000.0).unwrap();
        assert!(first.prevent_default);
        assert!(!first.commands.is_empty());
        let scale = fig.state().scale_x;

        let dropped = fig.handle(wheel, 1_200.0).unwrap();
        assert!(dropped.prevent_default);
        assert!(dropped.commands.is_empty());
        assert_eq!(fig.state().scale_x, scale);

        let next = fig.handle(wheel, 1_400.0).unwrap();
        assert!(next.prevent_default);
        assert!(fig.state().scale_x > scale);
    }

    #[test]
    fn wheel_right_after_creation_is_dropped() {
        let mut fig = figure_with(sample_source());
        let response = fig
            .handle(
                Gesture::Wheel {
                    delta_y: 1.0,
                    pointer_x: 300.0,
                },
                100.0,
            )
            .unwrap();
        assert!(response.commands.is_empty());
        assert!(response.prevent_default);
    }

    #[test]
    fn tiny_trackpad_delta_rounds_to_nothing() {
        assert_eq!(normalize_wheel(0.004), 0.0);
        assert_eq!(normalize_wheel(-0.03), -3.0);
        let mut fig = figure_with(sample_source());
        let before = fig.state();
        let response = fig
            .handle(
                Gesture::Wheel {
                    delta_y: 0.001,
                    pointer_x: 300.0,
                },
                5_000.0,
            )
            .unwrap();
        assert!(response.commands.is_empty());
        assert_eq!(fig.state(), before);
    }

    #[test]
    fn double_clicks_zoom_and_reset() {
        let mut fig = figure_with(sample_source());
        fig.handle(Gesture::DoubleClickRect { index: 2 }, 0.0).unwrap();
        assert_eq!(fig.state().focus_x, 125.0);
        fig.handle(Gesture::DoubleClickBackground, 0.0).unwrap();
        assert_eq!(fig.state(), {
            let (focus, scale) = fig.reset_target();
            crate::viewport::ViewState::new(focus, scale)
        });
        assert!(matches!(
            fig.handle(Gesture::DoubleClickRect { index: 40 }, 0.0),
            Err(FigureError::UnknownRect(40))
        ));
    }

    #[test]
    fn hover_shows_and_hides_details() {
        let fig = with_details();
        let enter = fig.hover_enter(2).unwrap();
        assert_eq!(
            enter,
            vec![
                ViewportCommand::SetLabelHighlight {
                    index: 2,
                    highlighted: true
                },
                ViewportCommand::ShowDetails {
                    details: "Function: parse_header in src/parser.rs:310".into(),
                    time: Some("Time: 25 ms".into()),
                },
            ]
        );
        let leave = fig.hover_leave(2).unwrap();
        assert_eq!(
            leave,
            vec![
                ViewportCommand::SetLabelHighlight {
                    index: 2,
                    highlighted: false
                },
                ViewportCommand::HideDetails,
            ]
        );
    }

    #[test]
    fn hover_without_panel_only_highlights() {
        let fig = figure_with(sample_source());
        assert_eq!(fig.hover_enter(0).unwrap().len(), 1);
        assert_eq!(fig.hover_leave(0).unwrap().len(), 1);
        assert!(fig.hover_enter(9).is_err());
    }

    #[test]
    fn pointer_mapping_inverts_ctm() {
        let plain = PointerMapping {
            svg_left: 40.0,
            ctm: None,
        };
        assert_eq!(plain.to_figure_x(140.0), 100.0);
        let scaled = PointerMapping {
            svg_left: 40.0,
            ctm: Some(Transform::new(2.0, 2.0, 0.0, 0.0)),
        };
        assert_eq!(scaled.to_figure_x(140.0), 50.0);
    }

    #[test]
    fn hit_test_follows_rendered_transform() {
        let mut fig = figure_with(sample_source());
        fig.move_and_zoom(500.0, 1.0, None, 0.0);
        // row of rect 2 (depth 2): y in [152, 167)
        assert_eq!(fig.hit_test(120.0, 160.0), Some(2));
        assert_eq!(fig.hit_test(120.0, 184.0), Some(0));
        assert_eq!(fig.hit_test(5.0, 184.0), None);

        fig.move_and_zoom(125.0, 2.0, None, 0.0);
        // screen 500 is the focus, data x 125
        assert_eq!(fig.hit_test(500.0, 160.0), Some(2));
    }
}
