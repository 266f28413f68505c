use crate::style::keys::js_key_to_css_key;
use crate::style::tags;

/// ------------------------------
/// 1. Segment splitting & expansion
/// ------------------------------

/// Splits one raw path segment on `,` into trimmed, non-empty alternatives.
pub fn split_segment(segment: &str) -> Vec<&str> {
    segment
        .split(',')
        .map(str::trim)
        .filter(|alt| !alt.is_empty())
        .collect()
}

/// Cartesian product over a list of alternative sets, keeping input order.
pub fn cartesian<T: Clone>(sets: &[Vec<T>]) -> Vec<Vec<T>> {
    sets.iter().fold(vec![Vec::new()], |acc, set| {
        acc.iter()
            .flat_map(|prefix| {
                set.iter().map(move |item| {
                    let mut next = prefix.clone();
                    next.push(item.clone());
                    next
                })
            })
            .collect()
    })
}

/// Turns the raw segments from the root down to a declaration into every
/// final selector they describe. Comma alternatives in any segment are
/// distributed across the whole path; segments that are blank are skipped.
pub fn build_selectors(segments: &[&str]) -> Vec<String> {
    let sets: Vec<Vec<&str>> = segments
        .iter()
        .map(|segment| split_segment(segment))
        .filter(|alts| !alts.is_empty())
        .collect();

    let mut selectors: Vec<String> = Vec::new();
    for tokens in cartesian(&sets) {
        let selector = join_selector(&tokens);
        if !selector.is_empty() && !selectors.contains(&selector) {
            selectors.push(selector);
        }
    }
    selectors
}

/// Marks every alternative of a segment as a descendant of whatever
/// selector precedes it, so it composes under that selector.
pub fn descendant_marker(segment: &str) -> String {
    split_segment(segment)
        .iter()
        .map(|alt| format!("& {alt}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// ------------------------------
/// 2. Token folding
/// ------------------------------

/// What the previously folded token was; decides how the next one attaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Folded {
    Combinator,
    Root,
    Compound,
}

/// Folds an ordered tuple of simple-selector tokens into one selector.
///
/// `_name` is a class on the current element, `__name` a class on a
/// descendant, known tags and `*` open a new compound, `:`/`::`/`#`/`[`/`.`
/// attach to the current compound and any other word becomes a class on it.
/// A leading `&` forces the token onto a new compound.
pub fn join_selector(tokens: &[&str]) -> String {
    let mut out = String::new();
    let mut prev: Option<Folded> = None;
    let mut force_descendant = false;

    for raw in tokens {
        let mut token = raw.trim();
        if let Some(rest) = token.strip_prefix('&') {
            force_descendant = true;
            token = rest.trim_start();
        }
        if token.is_empty() {
            continue;
        }

        let new_compound =
            force_descendant || matches!(prev, Some(Folded::Root) | Some(Folded::Combinator));

        let folded = if token.starts_with('*') {
            push_descendant(&mut out, token);
            Folded::Compound
        } else if let Some(name) = token.strip_prefix("__") {
            if name.is_empty() {
                continue;
            }
            push_descendant(&mut out, &class_name(name));
            Folded::Compound
        } else if let Some(name) = token.strip_prefix('_') {
            if name.is_empty() {
                continue;
            }
            push(&mut out, &class_name(name), new_compound);
            Folded::Compound
        } else if token.starts_with(['>', '+', '~']) {
            let (combinator, rest) = token.split_at(1);
            push_descendant(&mut out, combinator);
            out.push(' ');
            let rest = rest.trim();
            if rest.is_empty() {
                Folded::Combinator
            } else {
                out.push_str(rest);
                Folded::Compound
            }
        } else if token.starts_with([':', '#', '[', '.']) {
            push(&mut out, token, force_descendant);
            if token.starts_with(":root") {
                Folded::Root
            } else {
                Folded::Compound
            }
        } else if tags::starts_with_tag(token) {
            push_descendant(&mut out, token);
            Folded::Compound
        } else {
            push(&mut out, &class_name(token), new_compound);
            Folded::Compound
        };

        force_descendant = false;
        prev = Some(folded);
    }

    out.trim_end().to_string()
}

fn class_name(name: &str) -> String {
    format!(".{}", js_key_to_css_key(name))
}

fn push(out: &mut String, text: &str, new_compound: bool) {
    if new_compound {
        push_descendant(out, text);
    } else {
        out.push_str(text);
    }
}

fn push_descendant(out: &mut String, text: &str) {
    if !out.is_empty() && !out.ends_with(' ') {
        out.push(' ');
    }
    out.push_str(text);
}
