//! Property tests for color parsing.

use proptest::prelude::*;
use retint_color::{parse_color, Rgba};

proptest! {
    #[test]
    fn hex_round_trips(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
        let text = format!("#{:02x}{:02x}{:02x}", r, g, b);
        let parsed = parse_color(&text).expect("valid hex");
        prop_assert_eq!((parsed.r, parsed.g, parsed.b), (r, g, b));
        prop_assert_eq!(parsed.a, 1.0);
        prop_assert_eq!(parsed.to_hex(), text);
    }

    #[test]
    fn rgb_round_trips(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
        let parsed = parse_color(&format!("rgb({}, {}, {})", r, g, b)).expect("valid rgb");
        prop_assert_eq!(parsed, Rgba::rgb(r, g, b));
    }

    #[test]
    fn rgba_keeps_channels_and_alpha(
        r in any::<u8>(),
        g in any::<u8>(),
        b in any::<u8>(),
        alpha in 0u32..=1000,
    ) {
        let a = alpha as f32 / 1000.0;
        let parsed = parse_color(&format!("rgba({}, {}, {}, {})", r, g, b, a)).expect("valid rgba");
        prop_assert_eq!((parsed.r, parsed.g, parsed.b), (r, g, b));
        prop_assert!((parsed.a - a).abs() < 1e-6);
    }

    #[test]
    fn garbage_never_panics(text in "\\PC*") {
        let _ = parse_color(&text);
    }
}
