//! Color model - parsing, distance and brightness

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// An sRGB color with a fractional alpha channel (0.0 - 1.0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    /// Create a new color from RGBA values.
    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Rgba { r, g, b, a }
    }

    /// Create a new color from RGB values (fully opaque).
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Rgba { r, g, b, a: 1.0 }
    }

    /// Create a color from a hex value (e.g., 0xFF0000 for red).
    pub const fn from_hex(hex: u32) -> Self {
        Rgba {
            r: ((hex >> 16) & 0xFF) as u8,
            g: ((hex >> 8) & 0xFF) as u8,
            b: (hex & 0xFF) as u8,
            a: 1.0,
        }
    }

    /// Same RGB channels with a different alpha.
    pub const fn with_alpha(self, a: f32) -> Self {
        Rgba { a, ..self }
    }

    /// Check if fully transparent.
    pub fn is_transparent(&self) -> bool {
        self.a <= 0.0
    }

    /// Check if fully opaque.
    pub fn is_opaque(&self) -> bool {
        self.a >= 1.0
    }

    /// Lowercase `#rrggbb`, alpha dropped.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Serialize the way a computed style reports colors.
    pub fn to_css(&self) -> String {
        format!("{}", self)
    }

    pub const TRANSPARENT: Rgba = Rgba::rgba(0, 0, 0, 0.0);
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
}

impl Default for Rgba {
    fn default() -> Self {
        Rgba::BLACK
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_opaque() {
            write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
        } else {
            write!(
                f,
                "rgba({}, {}, {}, {})",
                self.r,
                self.g,
                self.b,
                format_alpha(self.a)
            )
        }
    }
}

/// Alpha rounded to three decimals with trailing zeros dropped.
fn format_alpha(a: f32) -> String {
    let scaled = libm::roundf(a.clamp(0.0, 1.0) * 1000.0) as u32;
    let (whole, frac) = (scaled / 1000, scaled % 1000);
    if frac == 0 {
        return format!("{}", whole);
    }
    let digits = format!("{:03}", frac);
    format!("{}.{}", whole, digits.trim_end_matches('0'))
}

/// Parse `rgb()`, `rgba()`, `#rgb` or `#rrggbb`.
///
/// Returns `None` for `transparent`, `none`, empty input and every other
/// syntax; callers treat that as "leave the property unchanged".
pub fn parse_color(text: &str) -> Option<Rgba> {
    let s = text.trim();
    if s.is_empty() {
        return None;
    }

    let lower = s.to_ascii_lowercase();
    if let Some(hex) = lower.strip_prefix('#') {
        return parse_hex(hex);
    }

    let args = lower
        .strip_prefix("rgba(")
        .or_else(|| lower.strip_prefix("rgb("))?;
    parse_rgb_args(args.strip_suffix(')')?)
}

/// Resolve any color a stylesheet may carry, named colors and
/// `transparent` included.
pub fn resolve_css_color(text: &str) -> Option<Rgba> {
    parse_color(text).or_else(|| named_color(text.trim()))
}

/// Euclidean distance over the RGB channels. Alpha is ignored.
pub fn color_distance(a: &Rgba, b: &Rgba) -> f64 {
    let dr = a.r as f64 - b.r as f64;
    let dg = a.g as f64 - b.g as f64;
    let db = a.b as f64 - b.b as f64;
    libm::sqrt(dr * dr + dg * dg + db * db)
}

/// Weighted luminance in the 0-255 range.
pub fn brightness(c: &Rgba) -> f64 {
    0.299 * c.r as f64 + 0.587 * c.g as f64 + 0.114 * c.b as f64
}

fn parse_hex(s: &str) -> Option<Rgba> {
    if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    match s.len() {
        3 => {
            // #RGB
            let r = u8::from_str_radix(&s[0..1], 16).ok()?;
            let g = u8::from_str_radix(&s[1..2], 16).ok()?;
            let b = u8::from_str_radix(&s[2..3], 16).ok()?;
            Some(Rgba::rgb(r * 17, g * 17, b * 17))
        }
        6 => {
            // #RRGGBB
            let r = u8::from_str_radix(&s[0..2], 16).ok()?;
            let g = u8::from_str_radix(&s[2..4], 16).ok()?;
            let b = u8::from_str_radix(&s[4..6], 16).ok()?;
            Some(Rgba::rgb(r, g, b))
        }
        _ => None,
    }
}

fn parse_rgb_args(inner: &str) -> Option<Rgba> {
    // Legacy comma syntax and the space / slash syntax.
    let parts: Vec<&str> = inner
        .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .collect();

    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }

    let r = parse_channel(parts[0])?;
    let g = parse_channel(parts[1])?;
    let b = parse_channel(parts[2])?;
    let a = match parts.get(3) {
        Some(p) => parse_alpha(p)?,
        None => 1.0,
    };

    Some(Rgba::rgba(r, g, b, a))
}

fn parse_channel(s: &str) -> Option<u8> {
    let value = match s.strip_suffix('%') {
        Some(pct) => pct.parse::<f32>().ok()? * 2.55,
        None => s.parse::<f32>().ok()?,
    };
    if !value.is_finite() {
        return None;
    }
    Some(libm::roundf(value.clamp(0.0, 255.0)) as u8)
}

fn parse_alpha(s: &str) -> Option<f32> {
    let value = match s.strip_suffix('%') {
        Some(pct) => pct.parse::<f32>().ok()? / 100.0,
        None => s.parse::<f32>().ok()?,
    };
    if !value.is_finite() {
        return None;
    }
    Some(value.clamp(0.0, 1.0))
}

fn named_color(name: &str) -> Option<Rgba> {
    let color = match name.to_ascii_lowercase().as_str() {
        "transparent" => Rgba::TRANSPARENT,
        "black" => Rgba::BLACK,
        "white" => Rgba::WHITE,
        "red" => Rgba::rgb(255, 0, 0),
        "green" => Rgba::rgb(0, 128, 0),
        "blue" => Rgba::rgb(0, 0, 255),
        "yellow" => Rgba::rgb(255, 255, 0),
        "cyan" | "aqua" => Rgba::rgb(0, 255, 255),
        "magenta" | "fuchsia" => Rgba::rgb(255, 0, 255),
        "gray" | "grey" => Rgba::rgb(128, 128, 128),
        "silver" => Rgba::rgb(192, 192, 192),
        "maroon" => Rgba::rgb(128, 0, 0),
        "olive" => Rgba::rgb(128, 128, 0),
        "lime" => Rgba::rgb(0, 255, 0),
        "teal" => Rgba::rgb(0, 128, 128),
        "navy" => Rgba::rgb(0, 0, 128),
        "purple" => Rgba::rgb(128, 0, 128),
        "orange" => Rgba::rgb(255, 165, 0),
        "pink" => Rgba::rgb(255, 192, 203),
        _ => return None,
    };
    Some(color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_color("#ffffff"), Some(Rgba::WHITE));
        assert_eq!(parse_color("#0D6EFD"), Some(Rgba::rgb(13, 110, 253)));
        assert_eq!(parse_color("#fa0"), Some(Rgba::rgb(255, 170, 0)));
        assert_eq!(parse_color("#ffff"), None);
        assert_eq!(parse_color("#ggg"), None);
    }

    #[test]
    fn test_parse_rgb_functions() {
        assert_eq!(parse_color("rgb(1, 2, 3)"), Some(Rgba::rgb(1, 2, 3)));
        assert_eq!(
            parse_color("rgba(10, 20, 30, 0.5)"),
            Some(Rgba::rgba(10, 20, 30, 0.5))
        );
        assert_eq!(
            parse_color("rgb(10 20 30 / 25%)"),
            Some(Rgba::rgba(10, 20, 30, 0.25))
        );
        assert_eq!(parse_color("rgb(1, 2)"), None);
    }

    #[test]
    fn test_rejects_keywords() {
        assert_eq!(parse_color("transparent"), None);
        assert_eq!(parse_color("none"), None);
        assert_eq!(parse_color(""), None);
        assert_eq!(parse_color("red"), None);
        assert_eq!(resolve_css_color("red"), Some(Rgba::rgb(255, 0, 0)));
        assert_eq!(resolve_css_color("transparent"), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn test_css_serialization() {
        assert_eq!(Rgba::WHITE.to_css(), "rgb(255, 255, 255)");
        assert_eq!(Rgba::rgba(1, 2, 3, 0.5).to_css(), "rgba(1, 2, 3, 0.5)");
        assert_eq!(Rgba::TRANSPARENT.to_css(), "rgba(0, 0, 0, 0)");
        assert_eq!(Rgba::rgb(26, 26, 26).to_hex(), "#1a1a1a");
    }

    #[test]
    fn test_distance_and_brightness() {
        assert_eq!(color_distance(&Rgba::BLACK, &Rgba::BLACK), 0.0);
        let d = color_distance(&Rgba::rgb(0, 0, 0), &Rgba::rgb(3, 4, 0));
        assert!((d - 5.0).abs() < 1e-9);
        assert!((brightness(&Rgba::WHITE) - 255.0).abs() < 1e-9);
        assert_eq!(brightness(&Rgba::BLACK), 0.0);
    }
}
