//! Engine configuration
//!
//! Everything the engine is told comes from attributes on its host
//! element. Values that fail to parse are logged and replaced by their
//! defaults so one bad attribute never disables the rest.

use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use rand::Rng;
use retint_color::{parse_color, Palette, Role};
use retint_dom::{Document, NodeId};
use serde::Deserialize;

use crate::error::EngineError;

/// Delay between capture and the first apply of a transition.
pub const FRAME_MS: u64 = 16;

/// Quiet period after the last mutation batch before pending elements are
/// processed.
pub const MUTATION_DEBOUNCE_MS: u64 = 150;

/// Catch-up passes after a transition, relative to its first apply.
pub const CATCH_UP_DELAYS_MS: [u64; 4] = [300, 800, 1500, 2500];

/// Location polling interval.
pub const NAVIGATION_POLL_MS: u64 = 500;

/// Time given to a new page to render before it is recolored.
pub const NAVIGATION_SETTLE_MS: u64 = 2000;

/// Number of `preset-N` attributes read.
pub const MAX_PRESETS: usize = 8;

pub const DEFAULT_NIGHT_START: u8 = 19;
pub const DEFAULT_NIGHT_END: u8 = 7;

pub const NIGHT_START_ATTR: &str = "night-start";
pub const NIGHT_END_ATTR: &str = "night-end";
pub const COLOR_ATTR_PREFIX: &str = "color-";
pub const PRESET_ATTR_PREFIX: &str = "preset-";

/// Elements whose colors tend to be set late by page scripts.
pub const CATCH_UP_SELECTORS: &[&str] = &[
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "div",
    "section",
    "header",
    "footer",
    "main",
    "nav",
    "article",
    "aside",
    "[data-widget]",
    ".widget",
    "[data-section-type]",
];

/// Check if an attribute name is one the configuration is built from.
pub fn is_config_attribute(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    name == NIGHT_START_ATTR
        || name == NIGHT_END_ATTR
        || name.starts_with(COLOR_ATTR_PREFIX)
        || name.starts_with(PRESET_ATTR_PREFIX)
}

#[derive(Debug, Deserialize)]
struct PresetDef {
    name: String,
    #[serde(default)]
    night: bool,
    #[serde(default)]
    colors: BTreeMap<String, String>,
}

/// A named target palette.
#[derive(Debug, Clone, PartialEq)]
pub struct Preset {
    pub name: String,
    /// Belongs to the night pool of the timed pick.
    pub night: bool,
    pub palette: Palette,
}

impl Preset {
    /// Parse a preset definition. Roles the definition leaves out keep
    /// their `base` color.
    pub fn from_json(slot: &str, text: &str, base: &Palette) -> Result<Self, EngineError> {
        let invalid = |reason: String| EngineError::InvalidPreset {
            slot: slot.into(),
            reason,
        };

        let def: PresetDef =
            serde_json::from_str(text).map_err(|e| invalid(format!("{}", e)))?;

        let name = def.name.trim();
        if name.is_empty() {
            return Err(invalid("empty name".into()));
        }

        let mut palette = base.clone();
        for (role_name, value) in &def.colors {
            let role = Role::from_name(role_name)
                .ok_or_else(|| invalid(format!("unknown role `{}`", role_name)))?;
            let color = parse_color(value)
                .ok_or_else(|| invalid(format!("bad color `{}` for `{}`", value, role_name)))?;
            palette.set(role, color);
        }

        Ok(Preset {
            name: name.to_string(),
            night: def.night,
            palette,
        })
    }
}

/// Configuration read from the host element.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// First hour (0-23) of the night pool.
    pub night_start: u8,
    /// First hour (0-23) after the night pool.
    pub night_end: u8,
    /// Palette the page is authored in; the source of preset conversions.
    pub default_palette: Palette,
    pub presets: Vec<Preset>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            night_start: DEFAULT_NIGHT_START,
            night_end: DEFAULT_NIGHT_END,
            default_palette: Palette::neutral(),
            presets: Vec::new(),
        }
    }
}

impl EngineConfig {
    /// Read the configuration from the host's attributes.
    pub fn from_element(doc: &Document, host: NodeId) -> Self {
        let mut config = EngineConfig::default();
        let attr = |name: &str| doc.get_attribute(host, name);

        for (name, slot) in [
            (NIGHT_START_ATTR, &mut config.night_start),
            (NIGHT_END_ATTR, &mut config.night_end),
        ] {
            if let Some(value) = attr(name) {
                match parse_hour(name, value) {
                    Ok(hour) => *slot = hour,
                    Err(e) => log::warn!("[retint] {}", e),
                }
            }
        }

        for role in Role::ALL {
            let name = format!("{}{}", COLOR_ATTR_PREFIX, role.as_str());
            if let Some(value) = attr(&name) {
                match parse_color(value) {
                    Some(color) => config.default_palette.set(role, color),
                    None => log::warn!(
                        "[retint] {}",
                        EngineError::InvalidAttribute {
                            name,
                            value: value.into(),
                        }
                    ),
                }
            }
        }

        for index in 1..=MAX_PRESETS {
            let slot = format!("{}{}", PRESET_ATTR_PREFIX, index);
            let Some(text) = attr(&slot) else {
                continue;
            };
            match Preset::from_json(&slot, text, &config.default_palette) {
                Ok(preset) if config.preset(&preset.name).is_some() => {
                    log::warn!("[retint] {}: duplicate preset `{}` skipped", slot, preset.name);
                }
                Ok(preset) => config.presets.push(preset),
                Err(e) => log::warn!("[retint] {}", e),
            }
        }

        log::debug!(
            "[retint] Config: night {}-{}, {} preset(s)",
            config.night_start,
            config.night_end,
            config.presets.len()
        );
        config
    }

    /// Look up a preset by name.
    pub fn preset(&self, name: &str) -> Option<&Preset> {
        self.presets.iter().find(|p| p.name == name)
    }

    /// Check if `hour` falls in the night window. The window may wrap
    /// around midnight.
    pub fn is_night(&self, hour: u8) -> bool {
        let hour = hour % 24;
        if self.night_start == self.night_end {
            false
        } else if self.night_start > self.night_end {
            hour >= self.night_start || hour < self.night_end
        } else {
            hour >= self.night_start && hour < self.night_end
        }
    }

    /// Presets of the night or the day pool.
    pub fn preset_pool(&self, night: bool) -> Vec<&Preset> {
        self.presets.iter().filter(|p| p.night == night).collect()
    }

    /// Random preset for the time of day. Falls back to every preset when
    /// the matching pool is empty.
    pub fn pick_preset<R: Rng + ?Sized>(&self, hour: u8, rng: &mut R) -> Option<&Preset> {
        let mut pool = self.preset_pool(self.is_night(hour));
        if pool.is_empty() {
            pool = self.presets.iter().collect();
        }
        if pool.is_empty() {
            return None;
        }
        Some(pool[rng.gen_range(0..pool.len())])
    }
}

fn parse_hour(name: &str, value: &str) -> Result<u8, EngineError> {
    value
        .trim()
        .parse::<u8>()
        .ok()
        .filter(|h| *h < 24)
        .ok_or_else(|| EngineError::InvalidAttribute {
            name: name.into(),
            value: value.into(),
        })
}
