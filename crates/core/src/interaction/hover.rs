use crate::model::{RectEntry, SampleTiming};

const LOCATION_SEPARATOR: &str = " in ";

/// `"Function: <func> in <dir><file>"` for a rectangle's hover line.
///
/// The directory is spliced between the function and the file part of the
/// short info. Short info without `" in "` is shown whole.
pub fn details_text(rect: &RectEntry) -> String {
    let dir = rect.dir_info.as_deref().unwrap_or("");
    let (func, file) = match rect.short_info.find(LOCATION_SEPARATOR) {
        Some(i) => rect.short_info.split_at(i + LOCATION_SEPARATOR.len()),
        None => (rect.short_info.as_str(), ""),
    };
    format!("Function: {func}{dir}{file}")
}

/// `"Time: <t> <unit>"` for a rectangle `width` pixels wide. Units other than
/// seconds, milliseconds and microseconds count raw samples.
pub fn time_text(width: f64, timing: &SampleTiming) -> String {
    let count = (width / timing.x_step).round();
    let factor = match timing.unit.as_str() {
        "s" => timing.delay,
        "ms" => timing.delay * 1e3,
        "us" | "μs" | "µs" => timing.delay * 1e6,
        _ => 1.0,
    };
    let t = (count * factor * 1000.0).round() / 1000.0;
    format!("Time: {t} {}", timing.unit)
}
