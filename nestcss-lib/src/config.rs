use indexmap::IndexMap;
use serde::Deserialize;

/// Resolution tables the compiler consults for `@` keys.
///
/// * `media_queries`: name -> media expression, e.g. `phone` -> `(max-width: 499px)`.
/// * `media_prefixes`: name -> selector for manual mode switching, e.g. `dark` -> `:root.dark`.
/// * `auto`: mode -> `[autoSelector, mediaExpression]`; a prefix with content
///   is also emitted under that media query, scoped to the auto selector.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompileOptions {
    pub media_queries: IndexMap<String, String>,
    pub media_prefixes: IndexMap<String, String>,
    pub auto: Option<IndexMap<String, (String, String)>>,
}

impl CompileOptions {
    pub fn new() -> Self {
        CompileOptions::default()
    }

    pub fn with_media_query(mut self, name: impl Into<String>, expr: impl Into<String>) -> Self {
        self.media_queries.insert(name.into(), expr.into());
        self
    }

    pub fn with_media_prefix(
        mut self,
        name: impl Into<String>,
        selector: impl Into<String>,
    ) -> Self {
        self.media_prefixes.insert(name.into(), selector.into());
        self
    }

    pub fn with_auto(
        mut self,
        mode: impl Into<String>,
        selector: impl Into<String>,
        expr: impl Into<String>,
    ) -> Self {
        self.auto
            .get_or_insert_with(IndexMap::new)
            .insert(mode.into(), (selector.into(), expr.into()));
        self
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// One entry of the `mediaSelectors` shorthand.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MediaSelector {
    pub selector: Option<String>,
    pub media_query: Option<String>,
}

/// The JSON configuration file: explicit tables plus the `mediaSelectors`
/// shorthand, grouped by media type (`theme`, `device`, ...) and variant.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StyleConfig {
    pub media_queries: IndexMap<String, String>,
    pub media_prefixes: IndexMap<String, String>,
    pub auto: Option<IndexMap<String, (String, String)>>,
    pub media_selectors: IndexMap<String, IndexMap<String, Vec<MediaSelector>>>,
    pub global_root_selector: Option<String>,
}

impl StyleConfig {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn root_selector(&self) -> &str {
        self.global_root_selector.as_deref().unwrap_or(":root")
    }

    /// Folds the shorthand into the three resolution tables.
    ///
    /// A query-only entry names a media query, a selector-only entry names a
    /// prefix under the root selector, and an entry with both becomes the
    /// variant's `auto` pair. Explicit tables take precedence.
    pub fn into_options(self) -> CompileOptions {
        let root = self.root_selector().to_string();
        let mut options = CompileOptions {
            media_queries: self.media_queries,
            media_prefixes: self.media_prefixes,
            auto: self.auto,
        };

        for (media_type, variants) in &self.media_selectors {
            for (variant, entries) in variants {
                for entry in entries {
                    match (&entry.selector, &entry.media_query) {
                        (None, Some(query)) => {
                            if options.media_queries.contains_key(variant) {
                                log::warn!(
                                    "media shorthand `{variant}` is also in mediaQueries; using the mediaQueries value"
                                );
                            } else {
                                options.media_queries.insert(variant.clone(), query.clone());
                            }
                        }
                        (Some(selector), None) => {
                            options
                                .media_prefixes
                                .entry(variant.clone())
                                .or_insert_with(|| format!("{root}{selector}"));
                        }
                        (Some(selector), Some(query)) => {
                            options
                                .auto
                                .get_or_insert_with(IndexMap::new)
                                .entry(variant.clone())
                                .or_insert_with(|| (format!("{root}{selector}"), query.clone()));
                        }
                        (None, None) => {
                            log::warn!(
                                "media selector `{media_type}.{variant}` has neither a selector nor a media query"
                            );
                        }
                    }
                }
            }
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_options_from_json() {
        let options = CompileOptions::from_json(
            r#"{
                "mediaQueries": { "phone": "(max-width: 499px)" },
                "mediaPrefixes": { "dark": ":root.dark" },
                "auto": { "dark": [":root.auto", "screen and (prefers-color-scheme: dark)"] }
            }"#,
        )
        .unwrap();
        assert_eq!(
            options,
            CompileOptions::new()
                .with_media_query("phone", "(max-width: 499px)")
                .with_media_prefix("dark", ":root.dark")
                .with_auto("dark", ":root.auto", "screen and (prefers-color-scheme: dark)")
        );
    }

    #[test]
    fn test_missing_tables_default_to_empty() {
        let options = CompileOptions::from_json("{}").unwrap();
        assert!(options.media_queries.is_empty());
        assert!(options.media_prefixes.is_empty());
        assert_eq!(options.auto, None);
    }

    #[test]
    fn test_media_selector_shorthand() {
        let config = StyleConfig::from_json(
            r#"{
                "mediaSelectors": {
                    "theme": {
                        "light": [
                            { "selector": ".auto", "mediaQuery": "screen and (prefers-color-scheme: light)", "prefix": "auto" },
                            { "selector": ".light" }
                        ],
                        "dark": [
                            { "selector": ".auto", "mediaQuery": "screen and (prefers-color-scheme: dark)" },
                            { "selector": ".dark" }
                        ]
                    },
                    "device": {
                        "phone": [{ "mediaQuery": "screen and (max-width: 499px)" }],
                        "tablet": [{ "mediaQuery": "screen and (min-width: 500px)" }]
                    }
                },
                "mediaQueries": { "tablet": "(min-width: 600px)" }
            }"#,
        )
        .unwrap();
        let options = config.into_options();

        assert_eq!(options.media_prefixes["light"], ":root.light");
        assert_eq!(options.media_prefixes["dark"], ":root.dark");
        assert_eq!(options.media_queries["phone"], "screen and (max-width: 499px)");
        assert_eq!(options.media_queries["tablet"], "(min-width: 600px)");
        let auto = options.auto.unwrap();
        assert_eq!(
            auto["dark"],
            (
                ":root.auto".to_string(),
                "screen and (prefers-color-scheme: dark)".to_string()
            )
        );
        assert_eq!(auto.keys().collect::<Vec<_>>(), vec!["light", "dark"]);
    }

    #[test]
    fn test_custom_root_selector() {
        let config = StyleConfig::from_json(
            r#"{ "globalRootSelector": "html", "mediaSelectors": { "theme": { "dark": [{ "selector": ".dark" }] } } }"#,
        )
        .unwrap();
        assert_eq!(config.clone().into_options().media_prefixes["dark"], "html.dark");
        assert_eq!(config.root_selector(), "html");
    }
}
