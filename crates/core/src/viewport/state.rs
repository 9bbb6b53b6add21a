use profile_svg_protocol::Transform;
use serde::{Deserialize, Serialize};

/// Horizontal view of a figure: which unscaled x sits at the viewport center
/// and how far it is stretched.
///
/// `scale_origin_x` is only set when the figure scales about an independent
/// origin ([`crate::config::AnchorMode::ScaleOrigin`]). In that case
/// `focus_x` is a pan in unscaled pixels and the mapping is
/// `screen = center - focus + origin + scale * (x - origin)`. With
/// `origin == focus` both forms agree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub focus_x: f64,
    pub scale_x: f64,
    pub scale_origin_x: Option<f64>,
}

impl ViewState {
    pub fn new(focus_x: f64, scale_x: f64) -> Self {
        Self {
            focus_x,
            scale_x,
            scale_origin_x: None,
        }
    }

    pub fn with_origin(focus_x: f64, scale_x: f64, scale_origin_x: f64) -> Self {
        Self {
            focus_x,
            scale_x,
            scale_origin_x: Some(scale_origin_x),
        }
    }

    /// Linear interpolation towards `to`. `step` is clamped to `[0, 1]`.
    pub fn lerp(&self, to: &ViewState, step: f64) -> ViewState {
        let step = step.clamp(0.0, 1.0);
        if step >= 1.0 {
            return *to;
        }
        let mix = |a: f64, b: f64| a + (b - a) * step;
        let scale_origin_x = match (self.scale_origin_x, to.scale_origin_x) {
            (Some(a), Some(b)) => Some(mix(a, b)),
            (None, Some(b)) => Some(mix(self.focus_x, b)),
            (_, None) => None,
        };
        ViewState {
            focus_x: mix(self.focus_x, to.focus_x),
            scale_x: mix(self.scale_x, to.scale_x),
            scale_origin_x,
        }
    }

    /// Transform of the viewport group for a viewport centred at `center_x`.
    /// The vertical axis never zooms.
    pub fn transform(&self, center_x: f64) -> Transform {
        let translate_x = match self.scale_origin_x {
            None => center_x - self.scale_x * self.focus_x,
            Some(origin) => center_x - self.focus_x + origin * (1.0 - self.scale_x),
        };
        Transform::new(self.scale_x, 1.0, translate_x, 0.0)
    }

    /// Unscaled x rendered at `screen_x` under this state.
    pub fn to_data_x(&self, screen_x: f64, center_x: f64) -> f64 {
        self.transform(center_x).invert_x(screen_x)
    }
}

/// Transform for a label so that, inside a viewport scaled by `scale_x`, it
/// keeps its natural width and stays pinned to `anchor_x`.
pub fn label_transform(anchor_x: f64, scale_x: f64) -> Transform {
    let inverse = 1.0 / scale_x;
    Transform::new(inverse, 1.0, (1.0 - inverse) * anchor_x, 0.0)
}

/// Corner radius that renders as `base` pixels after a stretch of `scale`.
pub fn corner_radius(base: f64, scale: f64) -> f64 {
    (base / scale).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_maps_to_center() {
        let state = ViewState::new(125.0, 18.0);
        let t = state.transform(500.0);
        assert!((t.apply_x(125.0) - 500.0).abs() < 1e-9);
        assert_eq!(t.scale_y, 1.0);
        assert_eq!(t.translate_y, 0.0);
    }

    #[test]
    fn origin_equal_to_focus_matches_center_anchor() {
        let centered = ViewState::new(300.0, 2.5).transform(400.0);
        let origin = ViewState::with_origin(300.0, 2.5, 300.0).transform(400.0);
        assert!((centered.translate_x - origin.translate_x).abs() < 1e-9);
    }

    #[test]
    fn scale_origin_stays_fixed_while_scaling() {
        let a = ViewState::with_origin(500.0, 1.0, 200.0);
        let b = ViewState::with_origin(500.0, 4.0, 200.0);
        let before = a.transform(500.0).apply_x(200.0);
        let after = b.transform(500.0).apply_x(200.0);
        assert!((before - after).abs() < 1e-9);
    }

    #[test]
    fn lerp_endpoints() {
        let a = ViewState::new(100.0, 1.0);
        let b = ViewState::new(300.0, 5.0);
        assert_eq!(a.lerp(&b, 0.0), a);
        assert_eq!(a.lerp(&b, 1.0), b);
        assert_eq!(a.lerp(&b, 2.0), b);
        let mid = a.lerp(&b, 0.5);
        assert_eq!(mid.focus_x, 200.0);
        assert_eq!(mid.scale_x, 3.0);
    }

    #[test]
    fn label_stays_pinned_to_rect_edge() {
        let scale = 7.5;
        let viewport = ViewState::new(130.0, scale).transform(500.0);
        let label = label_transform(100.0, scale);
        let pinned = viewport.apply_x(label.apply_x(100.0));
        assert!((pinned - viewport.apply_x(100.0)).abs() < 1e-9);
        // One unscaled label pixel renders as one screen pixel.
        let width = viewport.apply_x(label.apply_x(101.0)) - pinned;
        assert!((width - 1.0).abs() < 1e-9);
    }

    #[test]
    fn corner_radius_is_inverse_to_scale() {
        assert_eq!(corner_radius(3.0, 2.0), 1.5);
        assert_eq!(corner_radius(0.0, 2.0), 0.0);
    }
}
