use serde::{Deserialize, Serialize};

use crate::types::{Color, Point, Rect, Transform};

/// A single, stateless document mutation.
///
/// The viewport engine emits a `Vec<ViewportCommand>` for every gesture and
/// every animation frame. Hosts apply the list in order to the figure's
/// elements; each command carries all the data it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViewportCommand {
    /// Replace the transform of the viewport group holding every rectangle
    /// and label.
    SetViewportTransform { transform: Transform },

    /// Set `rx`/`ry` on every rounded rectangle.
    SetCornerRadius { rx: f64, ry: f64 },

    /// Show or hide every label at once.
    SetLabelsDisplay { visible: bool },

    /// Rewrite one label: its text, its own transform, and make it visible.
    SetLabel {
        index: usize,
        text: String,
        transform: Transform,
    },

    /// Toggle the hover outline (stroke width) of one label.
    SetLabelHighlight { index: usize, highlighted: bool },

    /// Position the details panel. Emitted once at initialization.
    PlaceDetails {
        details_at: Point,
        time_at: Point,
        background: Rect,
        /// Fill to force on the background band, when the stylesheet leaves
        /// it transparent.
        background_fill: Option<Color>,
    },

    /// Show the details band with the given texts.
    ShowDetails {
        details: String,
        time: Option<String>,
    },

    /// Hide the details text, time text and background band.
    HideDetails,
}

impl ViewportCommand {
    /// Whether this command only touches label nodes.
    pub fn is_label_update(&self) -> bool {
        matches!(
            self,
            ViewportCommand::SetLabel { .. }
                | ViewportCommand::SetLabelsDisplay { .. }
                | ViewportCommand::SetLabelHighlight { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_kind_tag() {
        let cmd = ViewportCommand::SetLabelsDisplay { visible: false };
        let json = serde_json::to_string(&cmd).unwrap();
        assert_eq!(json, r#"{"kind":"set_labels_display","visible":false}"#);
    }

    #[test]
    fn label_commands_are_classified() {
        let label = ViewportCommand::SetLabel {
            index: 0,
            text: "main".into(),
            transform: Transform::IDENTITY,
        };
        assert!(label.is_label_update());
        assert!(!ViewportCommand::HideDetails.is_label_update());
    }
}
