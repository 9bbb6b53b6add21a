use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Horizontal midpoint of the rectangle.
    pub fn center_x(&self) -> f64 {
        self.x + self.w / 2.0
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    /// Half-open containment: the left and top edges are inside.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.y + self.h
    }
}

/// An axis-aligned affine transform, `matrix(scale_x 0 0 scale_y translate_x translate_y)`.
///
/// Figures only ever scale and translate, so the skew terms are always zero
/// and are not stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub scale_x: f64,
    pub scale_y: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        scale_x: 1.0,
        scale_y: 1.0,
        translate_x: 0.0,
        translate_y: 0.0,
    };

    pub fn new(scale_x: f64, scale_y: f64, translate_x: f64, translate_y: f64) -> Self {
        Self {
            scale_x,
            scale_y,
            translate_x,
            translate_y,
        }
    }

    /// Map an x coordinate from the transformed (data) space to the outer space.
    pub fn apply_x(&self, x: f64) -> f64 {
        self.scale_x * x + self.translate_x
    }

    /// Map an outer-space x coordinate back into the transformed space.
    ///
    /// A zero scale has no inverse; the input is returned unchanged.
    pub fn invert_x(&self, x: f64) -> f64 {
        if self.scale_x == 0.0 {
            return x;
        }
        (x - self.translate_x) / self.scale_x
    }

    /// Render as the value of an SVG `transform` attribute.
    pub fn to_svg(&self) -> String {
        format!(
            "matrix({} 0 0 {} {} {})",
            self.scale_x, self.scale_y, self.translate_x, self.translate_y
        )
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            1.0,
        )
    }

    /// Parse the computed-style forms browsers report for `fill`:
    /// `rgb(r, g, b)`, `rgba(r, g, b, a)` and `#rrggbb`.
    ///
    /// A fourth `rgba` component becomes the alpha channel; `transparent` is
    /// black with zero alpha.
    pub fn parse_css(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("transparent") {
            return Some(Self::rgba(0.0, 0.0, 0.0, 0.0));
        }
        if let Some(hex) = s.strip_prefix('#') {
            let channel = |i: usize| {
                hex.get(i..i + 2)
                    .and_then(|h| u8::from_str_radix(h, 16).ok())
            };
            return Some(Self::from_rgb8(channel(0)?, channel(2)?, channel(4)?));
        }
        let body = s
            .strip_prefix("rgba(")
            .or_else(|| s.strip_prefix("rgb("))?;
        let body = body.split(')').next().unwrap_or(body);
        let parts: Vec<&str> = body
            .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
            .filter(|p| !p.is_empty())
            .collect();
        let channel = |i: usize| parts.get(i).and_then(|p| p.parse::<u8>().ok());
        let mut color = Self::from_rgb8(channel(0)?, channel(1)?, channel(2)?);
        if let Some(alpha) = parts.get(3).and_then(|a| a.parse::<f32>().ok()) {
            color.a = alpha;
        }
        Some(color)
    }

    /// Whether the color is fully transparent.
    pub fn is_transparent(&self) -> bool {
        self.a == 0.0
    }

    /// Perceived-brightness test using the 299/587/114 luma weights.
    pub fn is_dark(&self) -> bool {
        let r = f64::from(self.r) * 255.0;
        let g = f64::from(self.g) * 255.0;
        let b = f64::from(self.b) * 255.0;
        r * 299.0 + g * 587.0 + b * 114.0 < 255.0 * 650.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_inverts_its_own_mapping() {
        let t = Transform::new(2.5, 1.0, -40.0, 0.0);
        let x = 123.0;
        assert!((t.invert_x(t.apply_x(x)) - x).abs() < 1e-9);
    }

    #[test]
    fn transform_svg_attribute() {
        let t = Transform::new(2.0, 1.0, -10.5, 0.0);
        assert_eq!(t.to_svg(), "matrix(2 0 0 1 -10.5 0)");
    }

    #[test]
    fn parses_computed_fill_forms() {
        let c = Color::parse_css("rgb(255, 255, 255)").unwrap();
        assert!(!c.is_dark());
        let c = Color::parse_css("rgba(0, 0, 0, 0)").unwrap();
        assert!(c.is_transparent());
        let c = Color::parse_css("#1A1A2E").unwrap();
        assert!(c.is_dark());
        assert!(Color::parse_css("transparent").unwrap().is_transparent());
        assert!(Color::parse_css("papayawhip").is_none());
    }

    #[test]
    fn mid_grey_is_dark() {
        // 128 * 1000 < 255 * 650
        assert!(Color::parse_css("#808080").unwrap().is_dark());
        assert!(!Color::parse_css("#c0c0c0").unwrap().is_dark());
    }
}
