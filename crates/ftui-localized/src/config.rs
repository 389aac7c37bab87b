//! Formatter configuration.
//!
//! Defaults are code constants; the environment may override them:
//!
//! | Variable | Effect |
//! |----------|--------|
//! | `FTUI_I18N_MAX_DEPTH` | plural sub-template nesting ceiling |
//! | `FTUI_I18N_LOCALE` | default locale tag |
//! | `LC_ALL`, `LC_MESSAGES`, `LANG` | default locale, in that order, when `FTUI_I18N_LOCALE` is unset |
//!
//! Unparsable values are ignored and the default is kept.

use std::sync::OnceLock;

/// Default ceiling for nested plural sub-templates.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Locale used when nothing else is configured.
pub const DEFAULT_LOCALE: &str = "en";

/// Settings shared by every call of a [`Formatter`](crate::Formatter).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatConfig {
    /// Maximum nesting of plural sub-templates before
    /// [`RecursionLimitExceeded`](crate::FormatError::RecursionLimitExceeded).
    pub max_depth: usize,
    /// Locale for strings localized without an explicit locale.
    pub default_locale: String,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            default_locale: DEFAULT_LOCALE.to_string(),
        }
    }
}

impl FormatConfig {
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub fn with_default_locale(mut self, locale: impl Into<String>) -> Self {
        self.default_locale = locale.into();
        self
    }

    /// Defaults overridden by the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Defaults overridden through a custom environment lookup.
    #[must_use]
    pub fn from_env_with<F>(get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(depth) = get_env("FTUI_I18N_MAX_DEPTH").and_then(|v| v.trim().parse().ok()) {
            config.max_depth = depth;
        }
        let locale = get_env("FTUI_I18N_LOCALE")
            .and_then(|v| normalize_locale(&v))
            .or_else(|| {
                ["LC_ALL", "LC_MESSAGES", "LANG"]
                    .into_iter()
                    .find_map(|key| get_env(key).and_then(|v| normalize_locale(&v)))
            });
        if let Some(locale) = locale {
            config.default_locale = locale;
        }
        config
    }

    /// Process-wide configuration, read from the environment once.
    pub fn global() -> &'static Self {
        static GLOBAL: OnceLock<FormatConfig> = OnceLock::new();
        GLOBAL.get_or_init(Self::from_env)
    }
}

/// Turn a POSIX locale (`de_DE.UTF-8@euro`) into a tag (`de-DE`).
///
/// `C`, `POSIX` and empty values carry no language and yield `None`.
#[must_use]
pub fn normalize_locale(raw: &str) -> Option<String> {
    let base = raw
        .trim()
        .split(['.', '@'])
        .next()
        .unwrap_or_default();
    if base.is_empty() || base.eq_ignore_ascii_case("c") || base.eq_ignore_ascii_case("posix") {
        return None;
    }
    Some(base.replace('_', "-"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = FormatConfig::default();
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(config.default_locale, "en");
        assert_eq!(FormatConfig::from_env_with(env(&[])), config);
    }

    #[test]
    fn builders() {
        let config = FormatConfig::default()
            .with_max_depth(4)
            .with_default_locale("ru");
        assert_eq!(config.max_depth, 4);
        assert_eq!(config.default_locale, "ru");
    }

    #[test]
    fn env_overrides() {
        let config = FormatConfig::from_env_with(env(&[
            ("FTUI_I18N_MAX_DEPTH", " 8 "),
            ("FTUI_I18N_LOCALE", "fr_CA"),
            ("LANG", "de_DE.UTF-8"),
        ]));
        assert_eq!(config.max_depth, 8);
        assert_eq!(config.default_locale, "fr-CA");
    }

    #[test]
    fn posix_locale_precedence() {
        let config = FormatConfig::from_env_with(env(&[
            ("LC_MESSAGES", "pl_PL.UTF-8"),
            ("LANG", "de_DE.UTF-8"),
        ]));
        assert_eq!(config.default_locale, "pl-PL");

        let config = FormatConfig::from_env_with(env(&[("LC_ALL", "C"), ("LANG", "ja_JP")]));
        assert_eq!(config.default_locale, "ja-JP");
    }

    #[test]
    fn bad_values_keep_defaults() {
        let config = FormatConfig::from_env_with(env(&[
            ("FTUI_I18N_MAX_DEPTH", "deep"),
            ("LANG", "POSIX"),
        ]));
        assert_eq!(config, FormatConfig::default());
    }

    #[test]
    fn normalize() {
        assert_eq!(normalize_locale("de_DE.UTF-8@euro").as_deref(), Some("de-DE"));
        assert_eq!(normalize_locale("en").as_deref(), Some("en"));
        assert_eq!(normalize_locale(""), None);
        assert_eq!(normalize_locale("C.UTF-8"), None);
    }
}
