//! Compound selectors
//!
//! Supports a single compound selector per entry: an optional type or `*`
//! followed by any number of `#id`, `.class`, `[attr]` and `[attr=value]`
//! parts. Combinators are not supported; such selectors fail to parse.

use alloc::string::String;
use alloc::vec::Vec;

use crate::node::Node;

/// Selector specificity (ids, classes, elements).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Specificity {
    pub ids: u32,
    pub classes: u32,
    pub elements: u32,
}

/// An attribute condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeMatch {
    pub name: String,
    pub value: Option<String>,
}

/// A parsed compound selector.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selector {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attributes: Vec<AttributeMatch>,
}

impl Selector {
    /// Parse a compound selector.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() || text.contains(|c: char| c.is_whitespace() || "+>~,".contains(c)) {
            return None;
        }

        let mut selector = Selector::default();
        let mut rest = text;

        // Leading type or universal selector
        if let Some(tail) = rest.strip_prefix('*') {
            rest = tail;
        } else {
            let len = ident_len(rest);
            if len > 0 {
                selector.tag = Some(rest[..len].to_ascii_lowercase());
                rest = &rest[len..];
            }
        }

        while let Some(c) = rest.chars().next() {
            match c {
                '#' | '.' => {
                    let len = ident_len(&rest[1..]);
                    if len == 0 {
                        return None;
                    }
                    let name = String::from(&rest[1..=len]);
                    if c == '#' {
                        selector.id = Some(name);
                    } else {
                        selector.classes.push(name);
                    }
                    rest = &rest[len + 1..];
                }
                '[' => {
                    let close = rest.find(']')?;
                    let inner = &rest[1..close];
                    let matcher = match inner.split_once('=') {
                        Some((name, value)) => AttributeMatch {
                            name: name.trim().to_ascii_lowercase(),
                            value: Some(String::from(
                                value.trim().trim_matches(|q: char| q == '"' || q == '\''),
                            )),
                        },
                        None => AttributeMatch {
                            name: inner.trim().to_ascii_lowercase(),
                            value: None,
                        },
                    };
                    if matcher.name.is_empty() {
                        return None;
                    }
                    selector.attributes.push(matcher);
                    rest = &rest[close + 1..];
                }
                _ => return None,
            }
        }

        Some(selector)
    }

    /// Check if the selector matches an element node.
    pub fn matches(&self, node: &Node) -> bool {
        let Some(tag) = node.tag_name() else {
            return false;
        };

        if let Some(expected) = &self.tag {
            if !tag.eq_ignore_ascii_case(expected) {
                return false;
            }
        }

        if let Some(id) = &self.id {
            if node.element_id() != Some(id.as_str()) {
                return false;
            }
        }

        if !self.classes.iter().all(|c| node.has_class(c)) {
            return false;
        }

        self.attributes.iter().all(|m| match node.get_attribute(&m.name) {
            Some(actual) => m.value.as_deref().map_or(true, |v| v == actual),
            None => false,
        })
    }

    /// Calculate specificity.
    pub fn specificity(&self) -> Specificity {
        Specificity {
            ids: self.id.is_some() as u32,
            classes: (self.classes.len() + self.attributes.len()) as u32,
            elements: self.tag.is_some() as u32,
        }
    }
}

/// Length in bytes of the identifier at the start of `s`.
fn ident_len(s: &str) -> usize {
    s.char_indices()
        .find(|&(_, c)| !(c.is_alphanumeric() || c == '-' || c == '_'))
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}
