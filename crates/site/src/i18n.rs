//! Message catalogs for the localized site.
//!
//! Each locale ships one JSON resource, embedded at build time from
//! `crates/site/locales/{code}.json`. Nested objects flatten to dotted keys:
//!
//! ```json
//! { "home": { "title": "Winter Gifts" } }
//! ```
//!
//! becomes `home.title`. [`Catalogs::load`] validates every supported locale
//! at startup so a broken or incomplete catalog stops the process before it
//! serves traffic.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use winter_gifts_core::{Locale, LocaleConfig};

/// Errors found while validating catalogs.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("no catalog is bundled for locale {0}")]
    Missing(Locale),

    #[error("catalog {locale} is not valid JSON: {source}")]
    Parse {
        locale: Locale,
        #[source]
        source: serde_json::Error,
    },

    #[error("catalog {0} must be a JSON object")]
    NotAnObject(Locale),

    #[error("catalog {locale} has a non-string value at `{key}`")]
    NonString { locale: Locale, key: String },

    #[error("catalog {locale} is missing key `{key}`")]
    MissingKey { locale: Locale, key: String },
}

/// Bundled catalog source for a locale.
#[must_use]
pub const fn resource(locale: Locale) -> &'static str {
    match locale {
        Locale::En => include_str!("../locales/en.json"),
        Locale::Zh => include_str!("../locales/zh.json"),
        Locale::Ua => include_str!("../locales/ua.json"),
    }
}

type Entries = Arc<HashMap<String, String>>;

/// Validated catalogs for every supported locale.
#[derive(Debug, Clone)]
pub struct Catalogs {
    default_locale: Locale,
    entries: HashMap<Locale, Entries>,
}

impl Catalogs {
    /// Load and validate the bundled catalogs.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if any supported locale's catalog cannot be
    /// parsed, holds a non-string value, or lacks a key the default locale
    /// defines.
    pub fn load(config: &LocaleConfig) -> Result<Self, CatalogError> {
        Self::from_sources(
            config,
            config
                .supported()
                .iter()
                .map(|&locale| (locale, resource(locale))),
        )
    }

    /// Validate catalogs from explicit sources.
    ///
    /// # Errors
    ///
    /// Same as [`Catalogs::load`], plus [`CatalogError::Missing`] when a
    /// supported locale has no source.
    pub fn from_sources<'a>(
        config: &LocaleConfig,
        sources: impl IntoIterator<Item = (Locale, &'a str)>,
    ) -> Result<Self, CatalogError> {
        let sources: HashMap<Locale, &str> = sources.into_iter().collect();

        let mut entries = HashMap::new();
        for &locale in config.supported() {
            let source = sources
                .get(&locale)
                .ok_or(CatalogError::Missing(locale))?;
            entries.insert(locale, Arc::new(parse_catalog(locale, source)?));
        }

        let default_locale = config.default_locale();
        let reference = entries
            .get(&default_locale)
            .ok_or(CatalogError::Missing(default_locale))?;

        for (&locale, catalog) in &entries {
            if locale == default_locale {
                continue;
            }
            let mut missing: Vec<&String> =
                reference.keys().filter(|key| !catalog.contains_key(*key)).collect();
            missing.sort();
            if let Some(key) = missing.first() {
                return Err(CatalogError::MissingKey {
                    locale,
                    key: (*key).clone(),
                });
            }
        }

        Ok(Self {
            default_locale,
            entries,
        })
    }

    /// Messages for a locale. Locales without a catalog get the default's.
    #[must_use]
    pub fn messages(&self, locale: Locale) -> Messages {
        if let Some(entries) = self.entries.get(&locale) {
            return Messages {
                locale,
                entries: Arc::clone(entries),
            };
        }
        Messages {
            locale: self.default_locale,
            entries: self
                .entries
                .get(&self.default_locale)
                .cloned()
                .unwrap_or_default(),
        }
    }
}

fn parse_catalog(locale: Locale, source: &str) -> Result<HashMap<String, String>, CatalogError> {
    let value: Value =
        serde_json::from_str(source).map_err(|source| CatalogError::Parse { locale, source })?;
    if !value.is_object() {
        return Err(CatalogError::NotAnObject(locale));
    }

    let mut out = HashMap::new();
    flatten(locale, "", &value, &mut out)?;
    Ok(out)
}

fn flatten(
    locale: Locale,
    prefix: &str,
    value: &Value,
    out: &mut HashMap<String, String>,
) -> Result<(), CatalogError> {
    match value {
        Value::Object(map) => {
            for (name, child) in map {
                let key = if prefix.is_empty() {
                    name.clone()
                } else {
                    format!("{prefix}.{name}")
                };
                flatten(locale, &key, child, out)?;
            }
            Ok(())
        }
        Value::String(text) => {
            out.insert(prefix.to_string(), text.clone());
            Ok(())
        }
        _ => Err(CatalogError::NonString {
            locale,
            key: prefix.to_string(),
        }),
    }
}

/// Translations for one locale, handed to templates.
#[derive(Debug, Clone)]
pub struct Messages {
    locale: Locale,
    entries: Entries,
}

impl Messages {
    #[must_use]
    pub const fn locale(&self) -> Locale {
        self.locale
    }

    /// Translation for `key`, or the key itself when it is not defined.
    #[must_use]
    pub fn t<'a>(&'a self, key: &'a str) -> &'a str {
        self.entries.get(key).map_or(key, String::as_str)
    }

    /// Translation with `{name}` placeholders replaced.
    #[must_use]
    pub fn t_with(&self, key: &str, args: &[(&str, &str)]) -> String {
        args.iter()
            .fold(self.t(key).to_string(), |text, (name, value)| {
                text.replace(&format!("{{{name}}}"), value)
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const EN: &str = r#"{ "home": { "title": "Winter Gifts", "children": "{count} children" }, "nav": { "home": "Home" } }"#;
    const UA: &str = r#"{ "home": { "title": "Зимові подарунки", "children": "{count} дітей" }, "nav": { "home": "Головна" } }"#;

    fn two_locales() -> LocaleConfig {
        LocaleConfig::new(&[Locale::En, Locale::Ua], Locale::En).unwrap()
    }

    #[test]
    fn test_bundled_catalogs_are_complete() {
        let catalogs = Catalogs::load(&LocaleConfig::standard()).unwrap();
        for locale in Locale::ALL {
            let messages = catalogs.messages(locale);
            assert_ne!(messages.t("home.title"), "home.title");
        }
    }

    #[test]
    fn test_nested_keys_flatten() {
        let catalogs = Catalogs::from_sources(&two_locales(), [(Locale::En, EN), (Locale::Ua, UA)])
            .unwrap();
        let en = catalogs.messages(Locale::En);
        assert_eq!(en.t("home.title"), "Winter Gifts");
        assert_eq!(en.t("nav.home"), "Home");
        assert_eq!(catalogs.messages(Locale::Ua).t("nav.home"), "Головна");
    }

    #[test]
    fn test_missing_key_falls_back_to_key() {
        let catalogs = Catalogs::from_sources(&two_locales(), [(Locale::En, EN), (Locale::Ua, UA)])
            .unwrap();
        assert_eq!(catalogs.messages(Locale::En).t("footer.unknown"), "footer.unknown");
    }

    #[test]
    fn test_placeholders() {
        let catalogs = Catalogs::from_sources(&two_locales(), [(Locale::En, EN), (Locale::Ua, UA)])
            .unwrap();
        let text = catalogs
            .messages(Locale::Ua)
            .t_with("home.children", &[("count", "12")]);
        assert_eq!(text, "12 дітей");
    }

    #[test]
    fn test_rejects_catalog_missing_default_key() {
        let partial = r#"{ "home": { "title": "Зимові подарунки" } }"#;
        let err = Catalogs::from_sources(&two_locales(), [(Locale::En, EN), (Locale::Ua, partial)])
            .unwrap_err();
        assert!(
            matches!(err, CatalogError::MissingKey { locale: Locale::Ua, ref key } if key == "home.children")
        );
    }

    #[test]
    fn test_rejects_non_string_values() {
        let bad = r#"{ "home": { "title": 3 } }"#;
        let err = Catalogs::from_sources(&two_locales(), [(Locale::En, bad), (Locale::Ua, UA)])
            .unwrap_err();
        assert!(matches!(err, CatalogError::NonString { ref key, .. } if key == "home.title"));
    }

    #[test]
    fn test_rejects_unparseable_and_missing_sources() {
        let err = Catalogs::from_sources(&two_locales(), [(Locale::En, "{"), (Locale::Ua, UA)])
            .unwrap_err();
        assert!(matches!(err, CatalogError::Parse { locale: Locale::En, .. }));

        let err = Catalogs::from_sources(&two_locales(), [(Locale::En, EN)]).unwrap_err();
        assert!(matches!(err, CatalogError::Missing(Locale::Ua)));

        let err = Catalogs::from_sources(&two_locales(), [(Locale::En, "[]"), (Locale::Ua, UA)])
            .unwrap_err();
        assert!(matches!(err, CatalogError::NotAnObject(Locale::En)));
    }
}
