use crate::style::keys;
use crate::tree::style_tree::EndValue;
use once_cell::sync::Lazy;
use regex::Regex;

/// `content` keywords that must stay unquoted.
const CONTENT_KEYWORDS: &[&str] = &[
    "normal",
    "none",
    "open-quote",
    "close-quote",
    "no-open-quote",
    "no-close-quote",
    "inherit",
    "initial",
    "revert",
    "revert-layer",
    "unset",
];

/// A quoted string opening at the start, after whitespace or after `)`.
/// Apostrophes inside words do not count.
static QUOTED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?:^|[\s)])(?:'[^']*'|"[^"]*")"#).unwrap());
static FUNCTION_CALL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\w-]+\(.*\)$").unwrap());

/// Formats a leaf destined for the `content` property.
pub fn content_value(value: &EndValue) -> String {
    match value {
        EndValue::Null => "none".to_string(),
        EndValue::Var { var, .. } => var.clone(),
        other => format_content(&keys::css_value(other).unwrap_or_default()),
    }
}

/// Applies the `content` rules to an already serialized value, in order:
/// keyword, quoted text, function call, printable ASCII, escaped text.
pub fn format_content(value: &str) -> String {
    let trimmed = value.trim();

    if CONTENT_KEYWORDS
        .iter()
        .any(|kw| kw.eq_ignore_ascii_case(trimmed))
    {
        return trimmed.to_string();
    }

    if QUOTED.is_match(value) || FUNCTION_CALL.is_match(trimmed) {
        return value.to_string();
    }

    if value.chars().all(|c| (' '..='~').contains(&c)) {
        let mut quoted = String::with_capacity(value.len() + 2);
        quoted.push('\'');
        for c in value.chars() {
            if c == '\'' || c == '\\' {
                quoted.push('\\');
            }
            quoted.push(c);
        }
        quoted.push('\'');
        return quoted;
    }

    // Escapes are per UTF-16 unit, so astral characters become a pair.
    let mut escaped = String::with_capacity(value.len() * 7 + 2);
    escaped.push('\'');
    for unit in value.encode_utf16() {
        escaped.push_str(&format!("\\00{:04x}", unit));
    }
    escaped.push('\'');
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_null_is_none() {
        assert_eq!(content_value(&EndValue::Null), "none");
    }

    #[test]
    fn test_plain_text_is_quoted() {
        assert_eq!(format_content("Hello"), "'Hello'");
        assert_eq!(format_content(""), "''");
        assert_eq!(content_value(&EndValue::Number(123.0)), "'123'");
        assert_eq!(content_value(&EndValue::Bool(true)), "'true'");
    }

    #[test]
    fn test_apostrophes_are_escaped() {
        assert_eq!(format_content("don't"), r"'don\'t'");
        assert_eq!(format_content("it's Bob's"), r"'it\'s Bob\'s'");
    }

    #[test]
    fn test_keywords_pass_through() {
        for kw in CONTENT_KEYWORDS {
            assert_eq!(format_content(kw), *kw);
        }
        assert_eq!(format_content("open-quote"), "open-quote");
    }

    #[test]
    fn test_quoted_values_pass_through() {
        assert_eq!(format_content("'Hello'"), "'Hello'");
        assert_eq!(format_content("\"World\""), "\"World\"");
        assert_eq!(format_content(r#"attr(data-x) " ""#), r#"attr(data-x) " ""#);
        assert_eq!(format_content("counter(n)'. '"), "counter(n)'. '");
        assert_eq!(format_content("say 'hi'"), "say 'hi'");
    }

    #[test]
    fn test_functions_pass_through() {
        assert_eq!(format_content("attr(title)"), "attr(title)");
        assert_eq!(format_content("counter(item)"), "counter(item)");
        assert_eq!(format_content("url(icon.svg)"), "url(icon.svg)");
    }

    #[test]
    fn test_non_ascii_is_escaped() {
        assert_eq!(format_content("\u{00a0}"), r"'\0000a0'");
        assert_eq!(format_content("→ a"), r"'\002192\000020\000061'");
    }

    #[test]
    fn test_emoji_is_escaped_per_utf16_unit() {
        assert_eq!(format_content("👀"), r"'\00d83d\00dc40'");
    }

    #[test]
    fn test_var_record_is_verbatim() {
        assert_eq!(content_value(&EndValue::var("var(--label)")), "var(--label)");
    }
}
