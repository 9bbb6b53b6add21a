//! Label fitting: how much of a rectangle's short info fits at the current scale.

use serde::{Deserialize, Serialize};

/// Text used to measure the wide glyph width (width / 3).
pub const WIDE_SAMPLE: &str = "MOw";
/// Text used to measure the narrow glyph width (width / 5).
pub const NARROW_SAMPLE: &str = "night";

const ELLIPSIS: &str = "..";
const MIN_VISIBLE_CHARS: f64 = 3.0;

/// Character-width model used to estimate how many characters fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum LabelMetrics {
    /// Every character is assumed to be `char_width` pixels wide.
    Average { char_width: f64 },
    /// Widths measured from rendered narrow and wide samples.
    Measured { narrow: f64, wide: f64, height: f64 },
}

impl LabelMetrics {
    /// Derive measured metrics from the bounding boxes of [`WIDE_SAMPLE`] and
    /// [`NARROW_SAMPLE`] rendered in the label font.
    pub fn from_glyph_samples(
        wide_sample_width: f64,
        narrow_sample_width: f64,
        text_height: f64,
    ) -> Self {
        LabelMetrics::Measured {
            narrow: narrow_sample_width / NARROW_SAMPLE.len() as f64,
            wide: wide_sample_width / WIDE_SAMPLE.len() as f64,
            height: text_height,
        }
    }

    /// Width of the widest character the model knows about. Labels narrower
    /// than three of these are not drawn.
    pub fn floor_width(&self) -> f64 {
        match *self {
            LabelMetrics::Average { char_width } => char_width,
            LabelMetrics::Measured { wide, .. } => wide,
        }
    }

    pub fn text_height(&self) -> Option<f64> {
        match *self {
            LabelMetrics::Average { .. } => None,
            LabelMetrics::Measured { height, .. } => Some(height),
        }
    }

    pub fn is_valid(&self) -> bool {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        match *self {
            LabelMetrics::Average { char_width } => positive(char_width),
            LabelMetrics::Measured {
                narrow,
                wide,
                height,
            } => positive(narrow) && positive(wide) && height.is_finite() && height >= 0.0,
        }
    }

    /// Estimated number of characters that fit in `available` pixels.
    pub fn max_chars(&self, available: f64) -> usize {
        let estimate = match *self {
            LabelMetrics::Average { char_width } => (available / char_width).round(),
            LabelMetrics::Measured { narrow, wide, .. } => {
                mixed_width_estimate(available, narrow, wide).ceil()
            }
        };
        if estimate.is_finite() && estimate > 0.0 {
            estimate as usize
        } else {
            0
        }
    }
}

/// Closed-form count of characters of mixed narrow (`n`) and wide (`m`)
/// widths that fit in `w` pixels. Reduces to `w / n` when `n == m` and is
/// non-decreasing in `w`.
fn mixed_width_estimate(w: f64, n: f64, m: f64) -> f64 {
    let n2 = n * n;
    let m2 = m * m;
    let root = (n2 + (4.0 * w - 2.0 * m) * n + m2).max(0.0).sqrt();
    ((n - m) * root + n2 + 2.0 * (w - m) * n + m2) / (2.0 * n2)
}

/// Return the part of `text` that fits in `available` pixels.
///
/// Text that fits is returned unchanged. Longer text is cut to
/// `max_chars - 2` characters followed by `..`. Below three character widths
/// the result is empty.
pub fn fit_label(text: &str, available: f64, metrics: &LabelMetrics) -> String {
    if available.is_nan() || available < MIN_VISIBLE_CHARS * metrics.floor_width() {
        return String::new();
    }
    let max_chars = metrics.max_chars(available);
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    if max_chars < ELLIPSIS.len() + 1 {
        return String::new();
    }
    let mut fitted: String = text.chars().take(max_chars - ELLIPSIS.len()).collect();
    fitted.push_str(ELLIPSIS);
    fitted
}
