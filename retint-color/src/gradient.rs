//! Gradient rewriting - convert every color token inside `*-gradient(...)`

use alloc::string::String;

use crate::convert::ConversionTable;

/// Check if a `background-image` value contains a gradient function.
pub fn is_gradient(text: &str) -> bool {
    text.to_ascii_lowercase().contains("gradient(")
}

/// Convert each hex / `rgb()` / `rgba()` token of a gradient between the
/// light and dark reference palettes. Non-gradient text is returned as is.
pub fn convert_gradient(text: &str, to_dark: bool) -> String {
    convert_gradient_with(&ConversionTable::for_direction(to_dark), text)
}

/// [`convert_gradient`] for an arbitrary table. Tokens that do not
/// convert are kept verbatim, so the surrounding syntax is preserved.
pub fn convert_gradient_with(table: &ConversionTable, text: &str) -> String {
    if !is_gradient(text) {
        return String::from(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some((start, len)) = next_color_token(rest) {
        let token = &rest[start..start + len];
        out.push_str(&rest[..start]);
        match table.convert(token) {
            Some(converted) => out.push_str(&converted),
            None => out.push_str(token),
        }
        rest = &rest[start + len..];
    }

    out.push_str(rest);
    out
}

/// Byte offset and length of the next color token.
fn next_color_token(s: &str) -> Option<(usize, usize)> {
    let bytes = s.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'#' => {
                let digits = bytes[i + 1..]
                    .iter()
                    .take_while(|b| b.is_ascii_hexdigit())
                    .count();
                if digits == 3 || digits == 6 {
                    return Some((i, digits + 1));
                }
                i += digits + 1;
            }
            b'r' | b'R' if starts_rgb_call(bytes, i) => match s[i..].find(')') {
                Some(close) => return Some((i, close + 1)),
                None => return None,
            },
            _ => i += 1,
        }
    }

    None
}

fn starts_rgb_call(bytes: &[u8], at: usize) -> bool {
    let boundary = at == 0 || !(bytes[at - 1].is_ascii_alphanumeric() || bytes[at - 1] == b'-');
    let tail = &bytes[at..];
    let is_call = |prefix: &[u8]| {
        tail.len() >= prefix.len() && tail[..prefix.len()].eq_ignore_ascii_case(prefix)
    };
    boundary && (is_call(b"rgb(") || is_call(b"rgba("))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_gradient_hex_tokens() {
        assert_eq!(
            convert_gradient("linear-gradient(#ffffff, #000000)", true),
            "linear-gradient(#1a1a1a, #e9ecef)"
        );
    }

    #[test]
    fn test_rgb_tokens_and_stops() {
        assert_eq!(
            convert_gradient(
                "radial-gradient(circle, rgb(255, 255, 255) 0%, rgba(0, 0, 0, 0.5) 100%)",
                true
            ),
            "radial-gradient(circle, #1a1a1a 0%, rgba(233, 236, 239, 0.5) 100%)"
        );
    }

    #[test]
    fn test_unconvertible_tokens_are_kept() {
        assert_eq!(
            convert_gradient("linear-gradient(90deg, #dc3545, #ffffff)", true),
            "linear-gradient(90deg, #dc3545, #1a1a1a)"
        );
    }

    #[test]
    fn test_non_gradient_untouched() {
        assert_eq!(convert_gradient("url(hero.png)", true), "url(hero.png)");
        assert_eq!(convert_gradient("none", true), "none");
    }
}
