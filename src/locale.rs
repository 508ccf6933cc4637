use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelKeyError;

/// Locales every piece of provider text must be translated into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Locale {
    #[serde(rename = "en")]
    En,
    #[serde(rename = "zh-Hans")]
    ZhHans,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::En, Locale::ZhHans];

    pub fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::ZhHans => "zh-Hans",
        }
    }

    /// Reads the active locale from `LC_ALL` / `LANG`, falling back to English.
    pub fn detect() -> Self {
        ["LC_ALL", "LANG"]
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find_map(|value| value.parse().ok())
            .unwrap_or(Locale::En)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.code())
    }
}

impl FromStr for Locale {
    type Err = ModelKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // POSIX values look like `zh_CN.UTF-8`
        let tag = s
            .split('.')
            .next()
            .unwrap_or_default()
            .replace('_', "-")
            .to_lowercase();

        match tag.as_str() {
            "zh-hans" | "zh" | "zh-cn" | "zh-sg" => Ok(Locale::ZhHans),
            t if t == "en" || t.starts_with("en-") => Ok(Locale::En),
            _ => Err(ModelKeyError::UnknownLocale(s.to_string())),
        }
    }
}

/// One value per supported locale.
///
/// Adding a locale adds a slot here, so every map in the catalogue stops
/// compiling until it carries the new translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocaleMap<T> {
    pub en: T,
    pub zh_hans: T,
}

impl<T> LocaleMap<T> {
    pub const fn new(en: T, zh_hans: T) -> Self {
        Self { en, zh_hans }
    }

    pub fn resolve(&self, locale: Locale) -> &T {
        match locale {
            Locale::En => &self.en,
            Locale::ZhHans => &self.zh_hans,
        }
    }
}

impl<T: Copy> LocaleMap<T> {
    /// Same value in every locale (brand names, mostly).
    pub const fn uniform(value: T) -> Self {
        Self {
            en: value,
            zh_hans: value,
        }
    }
}

/// Localized display text.
pub type Text = LocaleMap<&'static str>;

impl LocaleMap<&'static str> {
    pub fn missing_locales(&self) -> Vec<Locale> {
        Locale::ALL
            .into_iter()
            .filter(|locale| self.resolve(*locale).trim().is_empty())
            .collect()
    }
}
