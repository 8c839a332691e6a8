//! retint color - Color model and palette conversion
//!
//! This crate parses the color strings a computed style reports, measures
//! distance and brightness, and maps colors from one reference palette onto
//! another by index correspondence. It's designed to work in no_std
//! environments.

#![no_std]

extern crate alloc;

pub mod color;
pub mod convert;
pub mod gradient;
pub mod palette;


pub use color::{brightness, color_distance, parse_color, resolve_css_color, Rgba};
pub use convert::{convert_color, Breakpoint, ConversionTable, MATCH_THRESHOLD};
pub use gradient::{convert_gradient, convert_gradient_with, is_gradient};
pub use palette::{Palette, Role, DARK_REFERENCE, LIGHT_REFERENCE, ROLE_COUNT};

/// Prelude for common imports
pub mod prelude {
    pub use crate::{
        brightness, color_distance, convert_color, convert_gradient, parse_color, ConversionTable,
        Palette, Rgba, Role,
    };
}
