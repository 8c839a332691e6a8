//! Palettes - role assignments and the light/dark reference lists
//!
//! Conversion works by index correspondence: the color at index `i` of a
//! source list always maps to index `i` of the target list. Both the
//! light/dark reference lists and role-ordered palettes follow that rule.

use crate::color::Rgba;

/// Number of roles in a palette.
pub const ROLE_COUNT: usize = 12;

/// Color roles a palette assigns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    Background = 0,
    Surface = 1,
    Text = 2,
    Primary = 3,
    Secondary = 4,
    Accent = 5,
    Border = 6,
    Muted = 7,
    Link = 8,
    Highlight = 9,
    Shadow = 10,
    Overlay = 11,
}

impl Role {
    /// All roles in palette order.
    pub const ALL: [Role; ROLE_COUNT] = [
        Role::Background,
        Role::Surface,
        Role::Text,
        Role::Primary,
        Role::Secondary,
        Role::Accent,
        Role::Border,
        Role::Muted,
        Role::Link,
        Role::Highlight,
        Role::Shadow,
        Role::Overlay,
    ];

    /// Position of this role in a palette.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Role name as used in attributes and preset JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Background => "background",
            Role::Surface => "surface",
            Role::Text => "text",
            Role::Primary => "primary",
            Role::Secondary => "secondary",
            Role::Accent => "accent",
            Role::Border => "border",
            Role::Muted => "muted",
            Role::Link => "link",
            Role::Highlight => "highlight",
            Role::Shadow => "shadow",
            Role::Overlay => "overlay",
        }
    }

    /// Look a role up by name.
    pub fn from_name(name: &str) -> Option<Role> {
        Role::ALL
            .iter()
            .copied()
            .find(|r| r.as_str().eq_ignore_ascii_case(name.trim()))
    }
}

/// Light reference colors, index-aligned with [`DARK_REFERENCE`].
pub const LIGHT_REFERENCE: [Rgba; 12] = [
    Rgba::from_hex(0xffffff),
    Rgba::from_hex(0xf8f9fa),
    Rgba::from_hex(0xe9ecef),
    Rgba::from_hex(0xdee2e6),
    Rgba::from_hex(0xced4da),
    Rgba::from_hex(0xadb5bd),
    Rgba::from_hex(0x6c757d),
    Rgba::from_hex(0x495057),
    Rgba::from_hex(0x343a40),
    Rgba::from_hex(0x212529),
    Rgba::from_hex(0x000000),
    Rgba::from_hex(0x0d6efd),
];

/// Dark reference colors, index-aligned with [`LIGHT_REFERENCE`].
pub const DARK_REFERENCE: [Rgba; 12] = [
    Rgba::from_hex(0x1a1a1a),
    Rgba::from_hex(0x1f1f1f),
    Rgba::from_hex(0x2a2a2a),
    Rgba::from_hex(0x333333),
    Rgba::from_hex(0x444444),
    Rgba::from_hex(0x6c757d),
    Rgba::from_hex(0xadb5bd),
    Rgba::from_hex(0xced4da),
    Rgba::from_hex(0xdee2e6),
    Rgba::from_hex(0xf1f3f5),
    Rgba::from_hex(0xe9ecef),
    Rgba::from_hex(0x4d9bff),
];

/// A complete role assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: [Rgba; ROLE_COUNT],
}

impl Palette {
    /// Create a palette from role-ordered colors.
    pub const fn new(colors: [Rgba; ROLE_COUNT]) -> Self {
        Palette { colors }
    }

    /// The neutral storefront palette pages are assumed to be authored in.
    pub const fn neutral() -> Self {
        Palette::new([
            Rgba::from_hex(0xffffff), // background
            Rgba::from_hex(0xf8f9fa), // surface
            Rgba::from_hex(0x212529), // text
            Rgba::from_hex(0x0d6efd), // primary
            Rgba::from_hex(0x6c757d), // secondary
            Rgba::from_hex(0x6f42c1), // accent
            Rgba::from_hex(0xdee2e6), // border
            Rgba::from_hex(0xadb5bd), // muted
            Rgba::from_hex(0x0a58ca), // link
            Rgba::from_hex(0xfff3cd), // highlight
            Rgba::from_hex(0x000000), // shadow
            Rgba::from_hex(0x343a40), // overlay
        ])
    }

    /// Get the color for a role.
    pub fn get(&self, role: Role) -> Rgba {
        self.colors[role.index()]
    }

    /// Set the color for a role.
    pub fn set(&mut self, role: Role, color: Rgba) {
        self.colors[role.index()] = color;
    }

    /// Builder-style [`Palette::set`].
    pub fn with(mut self, role: Role, color: Rgba) -> Self {
        self.set(role, color);
        self
    }

    /// Role-ordered colors.
    pub fn colors(&self) -> &[Rgba] {
        &self.colors
    }
}

impl Default for Palette {
    fn default() -> Self {
        Palette::neutral()
    }
}
