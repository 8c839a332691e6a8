//! Custom element registry

use alloc::string::String;
use alloc::vec::Vec;

use crate::error::DomError;

/// Names defined through `customElements.define`.
#[derive(Debug, Clone, Default)]
pub struct CustomElementRegistry {
    names: Vec<String>,
}

impl CustomElementRegistry {
    /// Define a name. Fails on invalid or duplicate names.
    pub fn define(&mut self, name: &str) -> Result<(), DomError> {
        if !is_valid_name(name) {
            return Err(DomError::InvalidCustomElementName(name.into()));
        }
        if self.is_defined(name) {
            return Err(DomError::AlreadyDefined(name.into()));
        }
        self.names.push(name.into());
        Ok(())
    }

    /// Check if a name is defined.
    pub fn is_defined(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Number of defined names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if nothing is defined.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

fn is_valid_name(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_lowercase())
        && name.contains('-')
        && !name.chars().any(|c| c.is_ascii_uppercase() || c.is_whitespace())
}
