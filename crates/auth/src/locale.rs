//! Locale negotiation against the fixed set of locales the front-end ships.

pub const DEFAULT_LOCALE: &str = "en-US";

pub const SUPPORTED_LOCALES: &[&str] = &["en-US", "da-DK"];

/// Resolve a requested locale to one the application supports.
///
/// - missing or empty: [`DEFAULT_LOCALE`]
/// - supported (case-insensitive): returned as given
/// - otherwise the first supported locale with the same two-letter language,
///   so `en-UK` becomes `en-US`
/// - otherwise [`DEFAULT_LOCALE`]
pub fn resolve_locale(locale: Option<&str>) -> String {
    let Some(locale) = locale.map(str::trim).filter(|l| !l.is_empty()) else {
        return DEFAULT_LOCALE.to_string();
    };

    if SUPPORTED_LOCALES
        .iter()
        .any(|supported| supported.eq_ignore_ascii_case(locale))
    {
        return locale.to_string();
    }

    let Some(base_language) = locale.get(..2) else {
        return DEFAULT_LOCALE.to_string();
    };

    SUPPORTED_LOCALES
        .iter()
        .find(|supported| {
            supported
                .get(..2)
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case(base_language))
        })
        .copied()
        .unwrap_or(DEFAULT_LOCALE)
        .to_string()
}

/// Pick the preferred tag from an `Accept-Language` header value.
///
/// Only the first entry is considered; quality values are ignored.
pub fn preferred_language(accept_language: &str) -> Option<&str> {
    let first = accept_language.split(',').next()?;
    let tag = first.split(';').next()?.trim();
    if tag.is_empty() || tag == "*" {
        None
    } else {
        Some(tag)
    }
}
