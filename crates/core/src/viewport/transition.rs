use super::state::ViewState;

/// A linear animation between two view states.
///
/// The clock starts on the first [`Transition::progress`] call, so the host
/// can schedule frames with whatever timestamp source it has.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub from: ViewState,
    pub to: ViewState,
    pub duration_ms: f64,
    started_at_ms: Option<f64>,
}

impl Transition {
    pub fn new(from: ViewState, to: ViewState, duration_ms: f64) -> Self {
        Self {
            from,
            to,
            duration_ms,
            started_at_ms: None,
        }
    }

    /// Fraction of the transition elapsed at `now_ms`, in `[0, 1]`.
    ///
    /// A duration that is not a positive finite number finishes at once, and
    /// so does a NaN timestamp.
    pub fn progress(&mut self, now_ms: f64) -> f64 {
        let started = *self.started_at_ms.get_or_insert(now_ms);
        if !(self.duration_ms.is_finite() && self.duration_ms > 0.0) {
            return 1.0;
        }
        let step = (now_ms - started) / self.duration_ms;
        if step.is_nan() {
            return 1.0;
        }
        step.clamp(0.0, 1.0)
    }

    /// View state at `now_ms`, together with whether the transition is over.
    pub fn sample(&mut self, now_ms: f64) -> (ViewState, bool) {
        let step = self.progress(now_ms);
        (self.from.lerp(&self.to, step), step >= 1.0)
    }
}
