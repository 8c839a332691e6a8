//! Palette conversion
//!
//! A [`ConversionTable`] maps a color onto a target list in two steps: the
//! nearest entry of the source list (by RGB distance) picks the target at
//! the same index, and colors too far from every reference fall back to
//! fixed brightness breakpoints. The breakpoints differ per direction and
//! are kept as literal constants.

use alloc::borrow::Cow;
use alloc::string::String;

use crate::color::{brightness, color_distance, parse_color, Rgba};
use crate::palette::{Palette, Role, DARK_REFERENCE, LIGHT_REFERENCE};

/// Largest RGB distance still treated as a reference match.
pub const MATCH_THRESHOLD: f64 = 30.0;

/// A brightness fallback rule selecting a slot of the target list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakpoint {
    /// Match brightness strictly above (`true`) or strictly below (`false`).
    pub above: bool,
    pub threshold: f64,
    pub slot: usize,
}

impl Breakpoint {
    pub const fn above(threshold: f64, slot: usize) -> Self {
        Breakpoint {
            above: true,
            threshold,
            slot,
        }
    }

    pub const fn below(threshold: f64, slot: usize) -> Self {
        Breakpoint {
            above: false,
            threshold,
            slot,
        }
    }

    fn matches(&self, value: f64) -> bool {
        if self.above {
            value > self.threshold
        } else {
            value < self.threshold
        }
    }
}

/// Light to dark fallback. Mid-tones between 100 and 160 are left alone.
pub const TO_DARK_BREAKPOINTS: [Breakpoint; 4] = [
    Breakpoint::above(230.0, 0),
    Breakpoint::above(200.0, 1),
    Breakpoint::above(160.0, 3),
    Breakpoint::below(100.0, 10),
];

/// Dark to light fallback.
pub const TO_LIGHT_BREAKPOINTS: [Breakpoint; 5] = [
    Breakpoint::below(40.0, 0),
    Breakpoint::below(70.0, 1),
    Breakpoint::below(110.0, 3),
    Breakpoint::above(200.0, 10),
    Breakpoint::above(170.0, 9),
];

/// Neutral palette to preset fallback, slots are role indices.
pub const PRESET_BREAKPOINTS: [Breakpoint; 4] = [
    Breakpoint::above(230.0, Role::Background.index()),
    Breakpoint::above(200.0, Role::Surface.index()),
    Breakpoint::above(160.0, Role::Border.index()),
    Breakpoint::below(100.0, Role::Text.index()),
];

/// Index-aligned source and target lists plus the brightness fallback.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionTable {
    source: Cow<'static, [Rgba]>,
    target: Cow<'static, [Rgba]>,
    breakpoints: &'static [Breakpoint],
}

impl ConversionTable {
    /// Create a table. Entries beyond the shorter list are ignored.
    pub fn new(
        source: Cow<'static, [Rgba]>,
        target: Cow<'static, [Rgba]>,
        breakpoints: &'static [Breakpoint],
    ) -> Self {
        ConversionTable {
            source,
            target,
            breakpoints,
        }
    }

    /// Light reference colors onto the dark ones.
    pub fn to_dark() -> Self {
        Self::new(
            Cow::Borrowed(&LIGHT_REFERENCE),
            Cow::Borrowed(&DARK_REFERENCE),
            &TO_DARK_BREAKPOINTS,
        )
    }

    /// Dark reference colors onto the light ones.
    pub fn to_light() -> Self {
        Self::new(
            Cow::Borrowed(&DARK_REFERENCE),
            Cow::Borrowed(&LIGHT_REFERENCE),
            &TO_LIGHT_BREAKPOINTS,
        )
    }

    /// Table for a light/dark direction.
    pub fn for_direction(to_dark: bool) -> Self {
        if to_dark {
            Self::to_dark()
        } else {
            Self::to_light()
        }
    }

    /// Role-by-role mapping from one palette onto another.
    pub fn between(from: &Palette, to: &Palette) -> Self {
        Self::new(
            Cow::Owned(from.colors().to_vec()),
            Cow::Owned(to.colors().to_vec()),
            &PRESET_BREAKPOINTS,
        )
    }

    /// Nearest source entry and its distance.
    pub fn nearest(&self, color: &Rgba) -> Option<(usize, f64)> {
        let len = self.source.len().min(self.target.len());
        self.source[..len]
            .iter()
            .enumerate()
            .map(|(i, reference)| (i, color_distance(color, reference)))
            .fold(None, |best, (i, d)| match best {
                Some((_, best_d)) if best_d <= d => best,
                _ => Some((i, d)),
            })
    }

    /// Convert a parsed color, keeping its alpha.
    pub fn convert_rgba(&self, color: Rgba) -> Option<Rgba> {
        if color.is_transparent() {
            return None;
        }

        let replacement = match self.nearest(&color) {
            Some((index, distance)) if distance <= MATCH_THRESHOLD => {
                self.target.get(index).copied()
            }
            _ => self.fallback(&color),
        }?;

        if color.is_opaque() {
            Some(replacement.with_alpha(1.0))
        } else {
            Some(replacement.with_alpha(color.a))
        }
    }

    /// Convert a color string. Opaque results come back as `#rrggbb`,
    /// translucent ones as `rgba()`.
    pub fn convert(&self, text: &str) -> Option<String> {
        let converted = self.convert_rgba(parse_color(text)?)?;
        if converted.is_opaque() {
            Some(converted.to_hex())
        } else {
            Some(converted.to_css())
        }
    }

    fn fallback(&self, color: &Rgba) -> Option<Rgba> {
        let value = brightness(color);
        self.breakpoints
            .iter()
            .find(|bp| bp.matches(value))
            .and_then(|bp| self.target.get(bp.slot).copied())
    }
}

/// Convert a color string between the light and dark reference palettes.
pub fn convert_color(text: &str, to_dark: bool) -> Option<String> {
    ConversionTable::for_direction(to_dark).convert(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_reference_match() {
        assert_eq!(convert_color("#ffffff", true).as_deref(), Some("#1a1a1a"));
        assert_eq!(convert_color("#1a1a1a", false).as_deref(), Some("#ffffff"));
        assert_eq!(
            convert_color("rgb(0, 0, 0)", true).as_deref(),
            Some("#e9ecef")
        );
    }

    #[test]
    fn test_near_match_within_threshold() {
        // #fdfdfd is within a few units of white
        assert_eq!(convert_color("#fdfdfd", true).as_deref(), Some("#1a1a1a"));
    }

    #[test]
    fn test_alpha_is_reapplied() {
        assert_eq!(
            convert_color("rgba(255, 255, 255, 0.5)", true).as_deref(),
            Some("rgba(26, 26, 26, 0.5)")
        );
    }

    #[test]
    fn test_transparent_is_left_alone() {
        assert_eq!(convert_color("transparent", true), None);
        assert_eq!(convert_color("rgba(0, 0, 0, 0)", true), None);
        assert_eq!(convert_color("none", false), None);
    }

    #[test]
    fn test_fallback_breakpoints() {
        let table = ConversionTable::to_dark();
        // Pale yellow: far from every reference, brightness above 230.
        assert_eq!(
            table.convert_rgba(Rgba::rgb(255, 250, 205)),
            Some(DARK_REFERENCE[0])
        );
        // Saturated mid-tone red has no breakpoint.
        assert_eq!(table.convert_rgba(Rgba::rgb(220, 53, 69)), None);
        // Deep navy falls in the dark bucket.
        assert_eq!(
            table.convert_rgba(Rgba::rgb(10, 20, 90)),
            Some(DARK_REFERENCE[10])
        );
    }

    #[test]
    fn test_between_palettes() {
        let night = Palette::neutral()
            .with(Role::Background, Rgba::from_hex(0x101820))
            .with(Role::Text, Rgba::from_hex(0xf2f2f2));
        let table = ConversionTable::between(&Palette::neutral(), &night);
        assert_eq!(table.convert("#ffffff").as_deref(), Some("#101820"));
        assert_eq!(table.convert("#212529").as_deref(), Some("#f2f2f2"));
    }
}
