/// Lets one event through per `delay_ms`; everything in between is dropped.
///
/// The window opens when the throttle is created, so an event arriving right
/// after initialization is dropped too.
#[derive(Debug, Clone, PartialEq)]
pub struct WheelThrottle {
    delay_ms: f64,
    previous_call_ms: f64,
}

impl WheelThrottle {
    pub fn new(delay_ms: f64, now_ms: f64) -> Self {
        Self {
            delay_ms,
            previous_call_ms: now_ms,
        }
    }

    /// Whether an event at `now_ms` should be processed. Admitting an event
    /// restarts the window.
    pub fn admit(&mut self, now_ms: f64) -> bool {
        if now_ms - self.previous_call_ms >= self.delay_ms {
            self.previous_call_ms = now_ms;
            true
        } else {
            false
        }
    }
}
