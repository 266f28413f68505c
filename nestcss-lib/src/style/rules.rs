use crate::style::emit;
use indexmap::IndexMap;
use std::fmt;

/// Properties of one selector, in first-assignment order. A later value for
/// the same property replaces the earlier one in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeclarationSet {
    declarations: IndexMap<String, String>,
}

impl DeclarationSet {
    pub fn insert(&mut self, property: impl Into<String>, value: impl Into<String>) {
        self.declarations.insert(property.into(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.declarations
            .iter()
            .map(|(p, v)| (p.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

/// Selector -> declarations, merged across the whole walk: additive across
/// selectors, property-level for the same selector.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    rules: IndexMap<String, DeclarationSet>,
}

impl RuleSet {
    pub fn insert(&mut self, selector: &str, property: &str, value: &str) {
        self.rules
            .entry(selector.to_string())
            .or_default()
            .insert(property, value);
    }

    pub fn is_empty(&self) -> bool {
        self.rules.values().all(DeclarationSet::is_empty)
    }
}

/// One block per selector, a blank line between blocks.
impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (selector, declarations) in &self.rules {
            if declarations.is_empty() {
                continue;
            }
            if !first {
                f.write_str("\n\n")?;
            }
            first = false;
            writeln!(f, "{} {{", selector)?;
            for (property, value) in declarations.iter() {
                writeln!(f, "  {}: {};", property, emit::serialize_value(value))?;
            }
            f.write_str("}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_last_write_wins_in_place() {
        let mut rules = RuleSet::default();
        rules.insert("p", "font-size", "16px");
        rules.insert("p", "color", "red");
        rules.insert("p", "font-size", "18px");

        assert_eq!(rules.to_string(), "p {\n  font-size: 18px;\n  color: red;\n}");
    }

    #[test]
    fn test_display() {
        let mut rules = RuleSet::default();
        rules.insert("p", "font-size", "16px");
        rules.insert("a:hover", "color", "red");
        rules.insert("p", "color", "blue");

        assert_eq!(
            rules.to_string(),
            "p {\n  font-size: 16px;\n  color: blue;\n}\n\na:hover {\n  color: red;\n}"
        );
    }

    #[test]
    fn test_empty_rule_set() {
        assert!(RuleSet::default().is_empty());
        assert_eq!(RuleSet::default().to_string(), "");
    }
}
