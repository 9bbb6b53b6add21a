//! The viewport state machine: target state, transitions, and label refresh.

pub mod state;
pub mod transition;

pub use state::ViewState;
pub use transition::Transition;

use profile_svg_protocol::{Rect, ViewportCommand};
use tracing::{debug, trace};

use crate::config::AnchorMode;
use crate::label::fit_label;
use crate::model::{Figure, FigureError};

impl Figure {
    /// Move to a new focus and scale.
    ///
    /// The figure's state becomes the target immediately; the returned
    /// commands either render the target at once (`duration_ms == 0`) or hide
    /// labels and leave the animation to [`Figure::tick`]. A NaN duration
    /// counts as zero. Callers clamp `target_scale_x`.
    pub fn move_and_zoom(
        &mut self,
        target_focus_x: f64,
        target_scale_x: f64,
        scale_origin_x: Option<f64>,
        duration_ms: f64,
    ) -> Vec<ViewportCommand> {
        let from = if self.config.restart_from_rendered {
            self.rendered
        } else {
            self.state
        };
        let to = match self.config.anchor {
            AnchorMode::Center => ViewState::new(target_focus_x, target_scale_x),
            AnchorMode::ScaleOrigin => ViewState::with_origin(
                target_focus_x,
                target_scale_x,
                scale_origin_x.unwrap_or(target_focus_x),
            ),
        };
        debug!(
            figure = %self.id,
            focus = to.focus_x,
            scale = to.scale_x,
            duration_ms,
            "move and zoom"
        );
        self.state = to;

        if duration_ms.is_nan() || duration_ms <= 0.0 {
            self.transition = None;
            let mut commands = self.frame_commands(&to);
            commands.extend(self.refresh_labels());
            return commands;
        }

        self.transition = Some(Transition::new(from, to, duration_ms));
        if self.has_visible_labels {
            vec![ViewportCommand::SetLabelsDisplay { visible: false }]
        } else {
            Vec::new()
        }
    }

    /// Fit the whole figure, less the margin, into the viewport.
    pub fn reset(&mut self) -> Vec<ViewportCommand> {
        let (focus, scale) = self.reset_target();
        self.move_and_zoom(focus, scale, Some(focus), self.config.transition_ms)
    }

    /// Focus and scale that [`Figure::reset`] moves to.
    pub fn reset_target(&self) -> (f64, f64) {
        let fitted = self.width - self.config.margin_x;
        let scale = self.visible_width / fitted * self.config.viewport_scale;
        (self.width / 2.0, scale)
    }

    /// Zoom so that rectangle `index` fills the viewport, less the margin.
    pub fn zoom_to_rect(&mut self, index: usize) -> Result<Vec<ViewportCommand>, FigureError> {
        let bounds = self.rect(index)?.bounds;
        Ok(self.zoom_to_bounds(bounds))
    }

    /// Zoom so that `bounds` fills the viewport, less the margin. `bounds`
    /// must have a positive width, as every validated rect does.
    pub(crate) fn zoom_to_bounds(&mut self, bounds: Rect) -> Vec<ViewportCommand> {
        let focus = bounds.center_x();
        let scale = self.visible_width / bounds.w * self.config.viewport_scale;
        self.move_and_zoom(focus, scale, Some(focus), self.config.transition_ms)
    }

    /// Zoom one wheel notch about `pointer_x` (figure coordinates), keeping
    /// the data point under the pointer fixed on screen. Negative deltas zoom
    /// in; a zero delta does nothing.
    pub fn zoom_at_point(&mut self, pointer_x: f64, wheel_delta: f64) -> Vec<ViewportCommand> {
        if wheel_delta == 0.0 || wheel_delta.is_nan() {
            return Vec::new();
        }
        let old = self.state;
        let data_x = old.to_data_x(pointer_x, self.center_x);
        let target_scale = self
            .config
            .zoom_step
            .apply(old.scale_x, wheel_delta)
            .max(self.config.min_scale);

        let (focus, origin) = match self.config.anchor {
            AnchorMode::Center => {
                let focus = old.scale_x / target_scale * (old.focus_x - data_x) + data_x;
                (focus, None)
            }
            AnchorMode::ScaleOrigin => (data_x + self.center_x - pointer_x, Some(data_x)),
        };
        trace!(pointer_x, data_x, target_scale, "wheel zoom");
        self.move_and_zoom(focus, target_scale, origin, self.config.wheel_transition_ms)
    }

    /// Advance the running transition to `now_ms`.
    ///
    /// Returns the frame's commands; on the final frame the labels are
    /// refreshed and shown again. Without a transition this is a no-op.
    pub fn tick(&mut self, now_ms: f64) -> Vec<ViewportCommand> {
        let Some(transition) = self.transition.as_mut() else {
            return Vec::new();
        };
        let (view, done) = transition.sample(now_ms);
        let mut commands = self.frame_commands(&view);
        if done {
            self.transition = None;
            commands.extend(self.refresh_labels());
            debug!(figure = %self.id, scale = view.scale_x, "transition finished");
        }
        commands
    }

    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    fn frame_commands(&mut self, view: &ViewState) -> Vec<ViewportCommand> {
        self.rendered = *view;
        let mut commands = vec![ViewportCommand::SetViewportTransform {
            transform: view.transform(self.center_x),
        }];
        if self.corner_radius > 0.0 {
            commands.push(ViewportCommand::SetCornerRadius {
                rx: state::corner_radius(self.corner_radius, view.scale_x),
                ry: state::corner_radius(self.corner_radius, 1.0),
            });
        }
        commands
    }

    /// Re-fit every label from its full short info at the target scale, then
    /// show them again.
    fn refresh_labels(&self) -> Vec<ViewportCommand> {
        if !self.has_visible_labels {
            return Vec::new();
        }
        let scale = self.state.scale_x;
        self.rects
            .iter()
            .enumerate()
            .map(|(index, rect)| ViewportCommand::SetLabel {
                index,
                text: fit_label(&rect.short_info, rect.bounds.w * scale, &self.metrics),
                transform: state::label_transform(rect.bounds.x, scale),
            })
            .chain(std::iter::once(ViewportCommand::SetLabelsDisplay { visible: true }))
            .collect()
    }
}
