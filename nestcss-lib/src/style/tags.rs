//! Fixed vocabulary of HTML and SVG element names.
//!
//! Any object key that is not in this list (and carries no selector syntax)
//! is treated as a class name by the selector builder.

const HTML_TAGS: &[&str] = &[
    "a", "abbr", "address", "applet", "area", "article", "aside", "audio", "b", "base",
    "basefont", "bdi", "bdo", "big", "blockquote", "body", "br", "button", "canvas", "caption",
    "center", "cite", "code", "col", "colgroup", "command", "data", "datalist", "dd", "del",
    "details", "dfn", "dialog", "dir", "div", "dl", "dt", "em", "embed", "fieldset",
    "figcaption", "figure", "font", "footer", "form", "frame", "frameset", "h1", "h2", "h3",
    "h4", "h5", "h6", "head", "header", "hgroup", "hr", "html", "i", "iframe", "img", "input",
    "ins", "isindex", "kbd", "keygen", "label", "legend", "li", "link", "listing", "main", "map",
    "mark", "marquee", "menu", "menuitem", "meta", "meter", "multicol", "nav", "nextid", "nobr",
    "noembed", "noframes", "noscript", "object", "ol", "optgroup", "option", "output", "p",
    "param", "picture", "plaintext", "pre", "progress", "q", "rb", "rp", "rt", "rtc", "ruby",
    "s", "samp", "script", "search", "section", "select", "slot", "small", "source", "span",
    "strike", "strong", "style", "sub", "summary", "sup", "table", "tbody", "td", "template",
    "textarea", "tfoot", "th", "thead", "time", "title", "tr", "track", "tt", "u", "ul", "var",
    "video", "wbr", "xmp",
];

const SVG_TAGS: &[&str] = &[
    "svg", "animate", "animateMotion", "animateTransform", "circle", "clipPath", "defs", "desc",
    "ellipse", "feBlend", "feColorMatrix", "feComposite", "feGaussianBlur", "feMerge",
    "feOffset", "filter", "foreignObject", "g", "image", "line", "linearGradient", "marker",
    "mask", "metadata", "mpath", "path", "pattern", "polygon", "polyline", "radialGradient",
    "rect", "stop", "switch", "symbol", "text", "textPath", "tspan", "use", "view",
];

/// Plain membership test against the HTML and SVG vocabularies.
pub fn is_tag(name: &str) -> bool {
    HTML_TAGS.contains(&name) || SVG_TAGS.contains(&name)
}

/// True if the selector starts with a known element name, alone or followed
/// by selector syntax: `li`, `a:hover`, `input[type=text]`, `div.card > p`.
pub fn starts_with_tag(selector: &str) -> bool {
    let end = selector
        .find(|c: char| matches!(c, '.' | '#' | '[' | ':' | ' ' | '>' | '+' | '~'))
        .unwrap_or(selector.len());
    end > 0 && is_tag(&selector[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_tags() {
        for tag in ["p", "div", "button", "h1", "svg", "clipPath", "video"] {
            assert!(is_tag(tag), "{tag} should be a tag");
        }
    }

    #[test]
    fn test_unknown_names() {
        for name in ["sticker", "thin", "warning", "Div", "clippath", ""] {
            assert!(!is_tag(name), "{name} should not be a tag");
        }
    }

    #[test]
    fn test_compound_forms() {
        assert!(starts_with_tag("div.card"));
        assert!(starts_with_tag("a#home"));
        assert!(starts_with_tag("input[type=text]"));
        assert!(starts_with_tag("li:not(:last-child)"));
        assert!(starts_with_tag("ul > li"));
        assert!(!starts_with_tag("card.active"));
        assert!(!starts_with_tag(".div"));
    }
}
