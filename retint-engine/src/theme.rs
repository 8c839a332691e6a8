//! Theme choice

use alloc::format;
use alloc::string::String;
use core::fmt;

const PRESET_PREFIX: &str = "preset:";

/// The theme the user picked.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ThemeChoice {
    /// No overrides; the page's own colors.
    #[default]
    Default,
    /// The dark reference palette.
    Dark,
    /// A named preset from the configuration.
    Preset(String),
}

impl ThemeChoice {
    /// Check if this is the page's own theme.
    pub fn is_default(&self) -> bool {
        matches!(self, ThemeChoice::Default)
    }

    /// Value stored under the theme storage key.
    pub fn to_storage(&self) -> String {
        match self {
            ThemeChoice::Default => "default".into(),
            ThemeChoice::Dark => "dark".into(),
            ThemeChoice::Preset(name) => format!("{}{}", PRESET_PREFIX, name),
        }
    }

    /// Parse a stored value.
    pub fn from_storage(value: &str) -> Option<Self> {
        match value.trim() {
            "default" => Some(ThemeChoice::Default),
            "dark" => Some(ThemeChoice::Dark),
            other => other
                .strip_prefix(PRESET_PREFIX)
                .filter(|name| !name.is_empty())
                .map(|name| ThemeChoice::Preset(name.into())),
        }
    }
}

impl fmt::Display for ThemeChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemeChoice::Default => write!(f, "default"),
            ThemeChoice::Dark => write!(f, "dark"),
            ThemeChoice::Preset(name) => write!(f, "preset `{}`", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_values() {
        assert_eq!(ThemeChoice::Default.to_storage(), "default");
        assert_eq!(ThemeChoice::Dark.to_storage(), "dark");
        assert_eq!(ThemeChoice::Preset("ocean".into()).to_storage(), "preset:ocean");

        assert_eq!(ThemeChoice::from_storage("dark"), Some(ThemeChoice::Dark));
        assert_eq!(
            ThemeChoice::from_storage("preset:ocean"),
            Some(ThemeChoice::Preset("ocean".into()))
        );
        assert_eq!(ThemeChoice::from_storage("preset:"), None);
        assert_eq!(ThemeChoice::from_storage("sepia"), None);
    }
}
