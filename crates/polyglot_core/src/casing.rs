//! Identifier casing helpers.
//!
//! Backends disagree on member naming: Go exports members by capitalizing them, Python and Rust prefer snake_case.
//! These helpers are pure and deterministic so the same identifier always maps to the same output.

/// Upper-case the first character of `name`.
///
/// ## Examples
/// ```rust
/// use polyglot_core::casing::capitalize;
///
/// assert_eq!(capitalize("myProp"), "MyProp");
/// assert_eq!(capitalize(""), "");
/// ```
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Check whether `name` is written in SCREAMING_CASE (no lowercase letters).
pub fn is_constant_case(name: &str) -> bool {
    name.chars().any(|c| c.is_ascii_alphabetic()) && !name.chars().any(|c| c.is_lowercase())
}

/// Convert a camelCase or PascalCase identifier to snake_case.
///
/// ## Notes
/// - Acronym runs stay together: `parseHTTPResponse` becomes `parse_http_response`.
/// - Constants (no lowercase letters) are returned unchanged.
/// - Leading underscores are preserved.
///
/// ## Examples
/// ```rust
/// use polyglot_core::casing::un_camel_case;
///
/// assert_eq!(un_camel_case("fetchOrderBook"), "fetch_order_book");
/// assert_eq!(un_camel_case("MAX_VALUE"), "MAX_VALUE");
/// ```
pub fn un_camel_case(name: &str) -> String {
    if is_constant_case(name) {
        return name.to_string();
    }
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev = if i > 0 { chars.get(i - 1).copied() } else { None };
            let next = chars.get(i + 1).copied();
            let after_lower = prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit());
            let acronym_end = prev.is_some_and(|p| p.is_uppercase()) && next.is_some_and(|n| n.is_lowercase());
            if after_lower || acronym_end {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capitalize_handles_unicode_and_empty() {
        assert_eq!(capitalize("stringifyNumber"), "StringifyNumber");
        assert_eq!(capitalize("é"), "É");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn un_camel_case_splits_words() {
        assert_eq!(un_camel_case("fooBar"), "foo_bar");
        assert_eq!(un_camel_case("toString"), "to_string");
        assert_eq!(un_camel_case("getValue2"), "get_value2");
        assert_eq!(un_camel_case("x"), "x");
    }

    #[test]
    fn un_camel_case_keeps_acronyms_together() {
        assert_eq!(un_camel_case("parseHTTPResponse"), "parse_http_response");
        assert_eq!(un_camel_case("HTTPClient"), "http_client");
    }

    #[test]
    fn un_camel_case_leaves_constants_alone() {
        assert_eq!(un_camel_case("MAX_SAFE_INTEGER"), "MAX_SAFE_INTEGER");
        assert_eq!(un_camel_case("ID"), "ID");
        assert_eq!(un_camel_case("_privateField"), "_private_field");
    }
}
