use serde::{Deserialize, Serialize};

use crate::model::FigureError;

/// How a wheel notch changes the horizontal scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoomStep {
    /// Multiply (zoom in) or divide (zoom out) the scale by this factor.
    Multiplicative(f64),
    /// Add (zoom in) or subtract (zoom out) this amount.
    Additive(f64),
}

impl ZoomStep {
    /// Scale after one notch in the direction given by the sign of `delta`.
    /// Negative deltas (wheel up) zoom in.
    pub fn apply(self, scale: f64, delta: f64) -> f64 {
        let zoom_in = delta < 0.0;
        match self {
            ZoomStep::Multiplicative(factor) if zoom_in => scale * factor,
            ZoomStep::Multiplicative(factor) => scale / factor,
            ZoomStep::Additive(amount) if zoom_in => scale + amount,
            ZoomStep::Additive(amount) => scale - amount,
        }
    }
}

impl Default for ZoomStep {
    fn default() -> Self {
        ZoomStep::Multiplicative(1.4)
    }
}

/// Which point stays fixed on screen while the scale changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorMode {
    /// The focus is always rendered at the horizontal center of the viewport.
    #[default]
    Center,
    /// Scaling happens about an independent origin; the focus is a shift in
    /// unscaled pixels.
    ScaleOrigin,
}

/// Tunables for one figure.
///
/// Every field has a default, so a figure description may omit the whole
/// block or any subset of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Duration of reset and double-click transitions.
    pub transition_ms: f64,
    /// Duration of wheel-zoom transitions.
    pub wheel_transition_ms: f64,
    /// Minimum spacing between processed wheel events.
    pub wheel_throttle_ms: f64,
    pub zoom_step: ZoomStep,
    /// Fraction of the viewport that zoomed content fills.
    pub viewport_scale: f64,
    /// Horizontal margin subtracted from the figure width when fitting it.
    pub margin_x: f64,
    /// Lower bound applied to every wheel-driven scale.
    pub min_scale: f64,
    pub anchor: AnchorMode,
    /// Start a transition from the currently rendered state instead of the
    /// previous target.
    pub restart_from_rendered: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            transition_ms: 300.0,
            wheel_transition_ms: 400.0,
            wheel_throttle_ms: 400.0,
            zoom_step: ZoomStep::default(),
            viewport_scale: 0.9,
            margin_x: 20.0,
            min_scale: 0.01,
            anchor: AnchorMode::default(),
            restart_from_rendered: false,
        }
    }
}

impl ViewerConfig {
    pub fn validate(&self) -> Result<(), FigureError> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.min_scale) {
            return Err(FigureError::InvalidConfig("min_scale must be positive"));
        }
        if !positive(self.viewport_scale) {
            return Err(FigureError::InvalidConfig(
                "viewport_scale must be positive",
            ));
        }
        match self.zoom_step {
            ZoomStep::Multiplicative(f) if !positive(f) => {
                return Err(FigureError::InvalidConfig(
                    "multiplicative zoom step must be positive",
                ));
            }
            ZoomStep::Additive(a) if !a.is_finite() => {
                return Err(FigureError::InvalidConfig("additive zoom step must be finite"));
            }
            _ => {}
        }
        if self.transition_ms < 0.0 || self.wheel_transition_ms < 0.0 {
            return Err(FigureError::InvalidConfig(
                "transition durations must not be negative",
            ));
        }
        Ok(())
    }
}
