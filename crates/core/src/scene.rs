//! An in-memory stand-in for the document a figure drives.
//!
//! [`SceneState`] applies [`ViewportCommand`]s the way a browser host would
//! apply them to SVG nodes, so native hosts and tests can render or inspect
//! the result without a DOM.

use profile_svg_protocol::{Color, Point, Rect, Transform, ViewportCommand};
use tracing::warn;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelState {
    pub text: String,
    pub transform: Transform,
    /// Per-label visibility; a label is drawn only when this and the
    /// scene-wide flag are both set.
    pub visible: bool,
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailsState {
    pub details_at: Point,
    pub time_at: Point,
    pub background: Rect,
    pub background_fill: Option<Color>,
    pub details: String,
    pub time: Option<String>,
    pub shown: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneState {
    pub viewport: Transform,
    pub corner_radius: Option<(f64, f64)>,
    pub labels_visible: bool,
    pub labels: Vec<LabelState>,
    pub details: Option<DetailsState>,
}

impl SceneState {
    pub fn new(label_count: usize) -> Self {
        Self {
            viewport: Transform::IDENTITY,
            corner_radius: None,
            labels_visible: true,
            labels: vec![LabelState::default(); label_count],
            details: None,
        }
    }

    pub fn apply(&mut self, commands: &[ViewportCommand]) {
        for command in commands {
            self.apply_one(command);
        }
    }

    fn apply_one(&mut self, command: &ViewportCommand) {
        match command {
            ViewportCommand::SetViewportTransform { transform } => self.viewport = *transform,
            ViewportCommand::SetCornerRadius { rx, ry } => self.corner_radius = Some((*rx, *ry)),
            ViewportCommand::SetLabelsDisplay { visible } => self.labels_visible = *visible,
            ViewportCommand::SetLabel {
                index,
                text,
                transform,
            } => match self.labels.get_mut(*index) {
                Some(label) => {
                    label.text.clone_from(text);
                    label.transform = *transform;
                    label.visible = true;
                }
                None => warn!(index, "label command for unknown index"),
            },
            ViewportCommand::SetLabelHighlight { index, highlighted } => {
                match self.labels.get_mut(*index) {
                    Some(label) => label.highlighted = *highlighted,
                    None => warn!(index, "highlight for unknown label"),
                }
            }
            ViewportCommand::PlaceDetails {
                details_at,
                time_at,
                background,
                background_fill,
            } => {
                self.details = Some(DetailsState {
                    details_at: *details_at,
                    time_at: *time_at,
                    background: *background,
                    background_fill: *background_fill,
                    details: String::new(),
                    time: None,
                    shown: false,
                });
            }
            ViewportCommand::ShowDetails { details, time } => {
                if let Some(panel) = self.details.as_mut() {
                    panel.details.clone_from(details);
                    panel.time.clone_from(time);
                    panel.shown = true;
                }
            }
            ViewportCommand::HideDetails => {
                if let Some(panel) = self.details.as_mut() {
                    panel.shown = false;
                }
            }
        }
    }

    /// Labels currently drawn, with their index.
    pub fn drawn_labels(&self) -> impl Iterator<Item = (usize, &LabelState)> {
        self.labels
            .iter()
            .enumerate()
            .filter(move |(_, l)| self.labels_visible && l.visible && !l.text.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_follow_global_and_per_label_visibility() {
        let mut scene = SceneState::new(2);
        assert_eq!(scene.drawn_labels().count(), 0);
        scene.apply(&[ViewportCommand::SetLabel {
            index: 1,
            text: "main".into(),
            transform: Transform::IDENTITY,
        }]);
        assert_eq!(scene.drawn_labels().map(|(i, _)| i).collect::<Vec<_>>(), vec![1]);

        scene.apply(&[ViewportCommand::SetLabelsDisplay { visible: false }]);
        assert_eq!(scene.drawn_labels().count(), 0);
        assert_eq!(scene.labels[1].text, "main");
    }

    #[test]
    fn details_need_placement_first() {
        let mut scene = SceneState::new(0);
        scene.apply(&[ViewportCommand::ShowDetails {
            details: "x".into(),
            time: None,
        }]);
        assert!(scene.details.is_none());

        scene.apply(&[
            ViewportCommand::PlaceDetails {
                details_at: Point::new(8.0, 191.0),
                time_at: Point::new(920.0, 191.0),
                background: Rect::new(0.0, 176.0, 1000.0, 24.0),
                background_fill: None,
            },
            ViewportCommand::ShowDetails {
                details: "Function: main".into(),
                time: Some("Time: 3 ms".into()),
            },
        ]);
        let panel = scene.details.clone().unwrap();
        assert!(panel.shown);
        assert_eq!(panel.details, "Function: main");

        scene.apply(&[ViewportCommand::HideDetails]);
        assert!(!scene.details.unwrap().shown);
    }

    #[test]
    fn out_of_range_label_is_ignored() {
        let mut scene = SceneState::new(1);
        scene.apply(&[ViewportCommand::SetLabelHighlight {
            index: 3,
            highlighted: true,
        }]);
        assert!(!scene.labels[0].highlighted);
    }
}
