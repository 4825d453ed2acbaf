//! Locale selection for the public site.
//!
//! The supported set and the default live in an immutable [`LocaleConfig`].
//! [`LocaleResolver`] turns untrusted input (a path segment or an
//! `Accept-Language` header) into a member of that set and never fails:
//! anything it does not recognize resolves to the default.

use serde::{Deserialize, Serialize};

/// A locale the site ships messages for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    En,
    Zh,
    Ua,
}

impl Locale {
    /// Every locale known to the application.
    pub const ALL: [Self; 3] = [Self::En, Self::Zh, Self::Ua];

    /// Short code used in URLs and catalog file names.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Zh => "zh",
            Self::Ua => "ua",
        }
    }

    /// BCP 47 tag for the `lang` attribute.
    #[must_use]
    pub const fn html_lang(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Zh => "zh",
            Self::Ua => "uk",
        }
    }

    /// Name of the locale in its own language, for the language switcher.
    #[must_use]
    pub const fn native_name(&self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Zh => "中文",
            Self::Ua => "Українська",
        }
    }

    /// Exact, case-sensitive code lookup.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|locale| locale.code() == code)
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Errors building a [`LocaleConfig`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocaleConfigError {
    #[error("at least one locale must be supported")]
    Empty,
    #[error("default locale {0} is not in the supported set")]
    DefaultNotSupported(Locale),
    #[error("unknown locale code: {0}")]
    UnknownCode(String),
}

/// The supported locales and the fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleConfig {
    supported: Vec<Locale>,
    default: Locale,
}

impl LocaleConfig {
    /// Build a config. Duplicates in `supported` are dropped, order is kept.
    ///
    /// # Errors
    ///
    /// Returns an error if `supported` is empty or does not contain `default`.
    pub fn new(supported: &[Locale], default: Locale) -> Result<Self, LocaleConfigError> {
        if supported.is_empty() {
            return Err(LocaleConfigError::Empty);
        }
        if !supported.contains(&default) {
            return Err(LocaleConfigError::DefaultNotSupported(default));
        }

        let mut unique = Vec::with_capacity(supported.len());
        for locale in supported {
            if !unique.contains(locale) {
                unique.push(*locale);
            }
        }

        Ok(Self {
            supported: unique,
            default,
        })
    }

    /// All three locales with English as the default.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            supported: Locale::ALL.to_vec(),
            default: Locale::En,
        }
    }

    /// All locales with the given default, parsed from a config value.
    ///
    /// # Errors
    ///
    /// Returns [`LocaleConfigError::UnknownCode`] if `code` is not a locale.
    pub fn standard_with_default(code: &str) -> Result<Self, LocaleConfigError> {
        let default = Locale::from_code(code.trim())
            .ok_or_else(|| LocaleConfigError::UnknownCode(code.to_owned()))?;
        Self::new(&Locale::ALL, default)
    }

    #[must_use]
    pub fn supported(&self) -> &[Locale] {
        &self.supported
    }

    #[must_use]
    pub const fn default_locale(&self) -> Locale {
        self.default
    }

    #[must_use]
    pub fn is_supported(&self, locale: Locale) -> bool {
        self.supported.contains(&locale)
    }
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self::standard()
    }
}

/// Resolves untrusted locale input against a [`LocaleConfig`].
#[derive(Debug, Clone)]
pub struct LocaleResolver {
    config: LocaleConfig,
}

impl LocaleResolver {
    #[must_use]
    pub const fn new(config: LocaleConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &LocaleConfig {
        &self.config
    }

    /// Resolve a requested locale code.
    ///
    /// Matching is exact and case-sensitive. Absent or unsupported input
    /// yields the default locale.
    #[must_use]
    pub fn resolve(&self, requested: Option<&str>) -> Locale {
        requested
            .and_then(Locale::from_code)
            .filter(|locale| self.config.is_supported(*locale))
            .unwrap_or(self.config.default)
    }

    /// Pick a locale from an `Accept-Language` header.
    ///
    /// Entries are ranked by quality value, ties keep header order. Only the
    /// primary subtag is compared, case-insensitively, and `uk` (the ISO code
    /// for Ukrainian) selects [`Locale::Ua`].
    #[must_use]
    pub fn negotiate(&self, accept_language: Option<&str>) -> Locale {
        let Some(header) = accept_language else {
            return self.config.default;
        };

        let mut ranked: Vec<(u16, usize, Locale)> = header
            .split(',')
            .enumerate()
            .filter_map(|(position, entry)| {
                let mut parts = entry.split(';');
                let tag = parts.next()?.trim();
                let quality = parts
                    .find_map(|param| param.trim().strip_prefix("q="))
                    .map_or(Some(1000), parse_quality)?;
                if quality == 0 {
                    return None;
                }
                let locale = locale_for_tag(tag)?;
                Some((quality, position, locale))
            })
            .filter(|(_, _, locale)| self.config.is_supported(*locale))
            .collect();

        ranked.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
        ranked
            .first()
            .map_or(self.config.default, |(_, _, locale)| *locale)
    }
}

impl Default for LocaleResolver {
    fn default() -> Self {
        Self::new(LocaleConfig::standard())
    }
}

/// Quality value scaled to thousandths; `None` for malformed values.
fn parse_quality(raw: &str) -> Option<u16> {
    let value: f32 = raw.trim().parse().ok()?;
    if !(0.0..=1.0).contains(&value) {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Some((value * 1000.0).round() as u16)
}

fn locale_for_tag(tag: &str) -> Option<Locale> {
    let primary = tag.split(['-', '_']).next()?.to_ascii_lowercase();
    match primary.as_str() {
        "en" => Some(Locale::En),
        "zh" => Some(Locale::Zh),
        "ua" | "uk" => Some(Locale::Ua),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_codes_resolve_to_themselves() {
        let resolver = LocaleResolver::default();
        for code in ["en", "zh", "ua"] {
            assert_eq!(resolver.resolve(Some(code)).code(), code);
        }
    }

    #[test]
    fn test_unsupported_input_falls_back_to_default() {
        let resolver = LocaleResolver::default();
        for input in ["fr", "", "EN", "Zh", "en-US", "uk", " en", "../etc"] {
            assert_eq!(resolver.resolve(Some(input)), Locale::En, "input {input:?}");
        }
        assert_eq!(resolver.resolve(None), Locale::En);
    }

    #[test]
    fn test_resolve_respects_narrower_supported_set() {
        let config = LocaleConfig::new(&[Locale::Ua, Locale::En], Locale::Ua).unwrap();
        let resolver = LocaleResolver::new(config);
        assert_eq!(resolver.resolve(Some("zh")), Locale::Ua);
        assert_eq!(resolver.resolve(Some("en")), Locale::En);
    }

    #[test]
    fn test_config_rejects_invalid_sets() {
        assert_eq!(
            LocaleConfig::new(&[], Locale::En),
            Err(LocaleConfigError::Empty)
        );
        assert_eq!(
            LocaleConfig::new(&[Locale::Zh], Locale::En),
            Err(LocaleConfigError::DefaultNotSupported(Locale::En))
        );
        assert!(LocaleConfig::standard_with_default("de").is_err());
    }

    #[test]
    fn test_config_dedupes() {
        let config = LocaleConfig::new(&[Locale::En, Locale::Zh, Locale::En], Locale::En).unwrap();
        assert_eq!(config.supported(), &[Locale::En, Locale::Zh]);
    }

    #[test]
    fn test_negotiate_quality_and_order() {
        let resolver = LocaleResolver::default();
        assert_eq!(
            resolver.negotiate(Some("fr-FR, zh-CN;q=0.8, en;q=0.5")),
            Locale::Zh
        );
        assert_eq!(resolver.negotiate(Some("en;q=0.4, uk;q=0.9")), Locale::Ua);
        assert_eq!(resolver.negotiate(Some("ZH, en")), Locale::Zh);
        assert_eq!(resolver.negotiate(Some("ua;q=0, zh;q=0.1")), Locale::Zh);
    }

    #[test]
    fn test_negotiate_falls_back() {
        let resolver = LocaleResolver::default();
        assert_eq!(resolver.negotiate(None), Locale::En);
        assert_eq!(resolver.negotiate(Some("de, fr;q=0.9")), Locale::En);
        assert_eq!(resolver.negotiate(Some("zh;q=abc")), Locale::En);
        assert_eq!(resolver.negotiate(Some("")), Locale::En);
    }
}
