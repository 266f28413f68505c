use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

static SINGLE_QUOTED_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"url\('([^"]*?)'\)"#).unwrap());

/// Re-quotes `url('...')` as `url("...")` so inlined data URIs may keep
/// their own single quotes.
pub fn serialize_value(value: &str) -> Cow<'_, str> {
    SINGLE_QUOTED_URL.replace_all(value, r#"url("$1")"#)
}

/// Indents every non-empty line by `spaces`.
pub fn indent(text: &str, spaces: usize) -> String {
    let pad = " ".repeat(spaces);
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{pad}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// `header { body }` with the body indented one level.
pub fn wrap_block(header: &str, body: &str) -> String {
    format!("{} {{\n{}\n}}", header, indent(body, 2))
}

/// Joins top-level sections with one blank line, skipping empty ones.
pub fn join_sections<I, S>(sections: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for section in sections {
        let section = section.as_ref().trim();
        if section.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push_str("\n\n");
        }
        out.push_str(section);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_url_requote() {
        assert_eq!(
            serialize_value("url('data:image/svg+xml,<svg xmlns='http://www.w3.org/2000/svg'/>')"),
            "url(\"data:image/svg+xml,<svg xmlns='http://www.w3.org/2000/svg'/>\")"
        );
        assert_eq!(
            serialize_value("url('a.png'), url('b.png')"),
            "url(\"a.png\"), url(\"b.png\")"
        );
        assert_eq!(serialize_value("red"), "red");
        assert_eq!(serialize_value("url(\"x.png\")"), "url(\"x.png\")");
    }

    #[test]
    fn test_indent_skips_blank_lines() {
        assert_eq!(indent("a {\n\n}", 2), "  a {\n\n  }");
    }

    #[test]
    fn test_wrap_block() {
        assert_eq!(
            wrap_block("@media screen", "p {\n  color: red;\n}"),
            "@media screen {\n  p {\n    color: red;\n  }\n}"
        );
    }

    #[test]
    fn test_join_sections() {
        assert_eq!(join_sections(["a", "", "  ", "b"]), "a\n\nb");
        assert_eq!(join_sections(Vec::<String>::new()), "");
    }
}
