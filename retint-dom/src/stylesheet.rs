//! Author stylesheets

use alloc::string::String;
use alloc::vec::Vec;

use crate::node::Node;
use crate::selector::{Selector, Specificity};
use crate::style::{parse_declarations, Declaration};

/// A style rule: `selectors { declarations }`.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleRule {
    pub selectors: Vec<Selector>,
    pub declarations: Vec<Declaration>,
}

impl StyleRule {
    /// Highest specificity among the selectors matching `node`.
    pub fn matching_specificity(&self, node: &Node) -> Option<Specificity> {
        self.selectors
            .iter()
            .filter(|s| s.matches(node))
            .map(|s| s.specificity())
            .max()
    }
}

/// A parsed stylesheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stylesheet {
    pub rules: Vec<StyleRule>,
}

impl Stylesheet {
    /// Parse stylesheet text. At-rules and rules whose selectors all fail
    /// to parse are dropped.
    pub fn parse(css: &str) -> Self {
        let mut rules = Vec::new();
        let stripped = strip_comments(css);
        let mut input = stripped.as_str();

        while let Some(open) = input.find('{') {
            let prelude = input[..open].trim();
            let Some(close) = find_block_end(&input[open + 1..]) else {
                break;
            };
            let body = &input[open + 1..open + 1 + close];
            input = &input[open + close + 2..];

            if prelude.starts_with('@') {
                continue;
            }

            let selectors: Vec<Selector> = prelude.split(',').filter_map(Selector::parse).collect();
            if selectors.is_empty() {
                continue;
            }

            rules.push(StyleRule {
                selectors,
                declarations: parse_declarations(body),
            });
        }

        Stylesheet { rules }
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the stylesheet has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn strip_comments(css: &str) -> String {
    let mut out = String::with_capacity(css.len());
    let mut rest = css;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        match rest[start + 2..].find("*/") {
            Some(end) => rest = &rest[start + 2 + end + 2..],
            None => return out,
        }
    }
    out.push_str(rest);
    out
}

/// Offset of the `}` closing a block whose `{` was already consumed.
fn find_block_end(s: &str) -> Option<usize> {
    let mut depth = 1usize;
    for (i, c) in s.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}
