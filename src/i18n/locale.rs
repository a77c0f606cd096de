//! Locale tokens: validated, case-preserving locale identifiers.
//!
//! A `LocaleToken` can only be built from input that passed the locale
//! grammar, so holding one is proof the value is safe to place in a cache
//! key or a rendered script.

use crate::error::RenderError;
use crate::i18n::IdentifierValidator;
use std::fmt;

/// A validated locale identifier (e.g. "en", "fr-FR", "ha_Latn_NE").
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocaleToken(String);

impl LocaleToken {
    /// Validate a single locale.
    ///
    /// # Returns
    /// * `Ok(LocaleToken)` if the value matches the locale grammar
    /// * `Err(RenderError::InvalidLocaleFormat)` otherwise
    pub fn parse(locale: &str) -> Result<LocaleToken, RenderError> {
        if IdentifierValidator::is_valid_locale(locale) {
            Ok(LocaleToken(locale.to_string()))
        } else {
            Err(RenderError::InvalidLocaleFormat(locale.to_string()))
        }
    }

    /// The locale as given, case preserved.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocaleToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LocaleToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validate a comma-separated locale list, preserving request order.
///
/// Fails with `InvalidLocaleFormat` when the trimmed list is empty, uses any
/// character outside `[A-Za-z0-9,_-]`, has an empty segment, or when any
/// segment fails the locale grammar. A single bad segment fails the whole
/// list; nothing is silently dropped.
pub fn validate_locale_list(raw: &str) -> Result<Vec<LocaleToken>, RenderError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !IdentifierValidator::has_locale_list_charset(trimmed) {
        return Err(RenderError::InvalidLocaleFormat(raw.to_string()));
    }

    trimmed
        .split(',')
        .map(|segment| {
            if segment.is_empty() {
                return Err(RenderError::InvalidLocaleFormat(raw.to_string()));
            }
            LocaleToken::parse(segment)
        })
        .collect()
}

/// Join tokens with `,`, the form used inside cache keys.
pub fn join_locales(locales: &[LocaleToken]) -> String {
    locales
        .iter()
        .map(LocaleToken::as_str)
        .collect::<Vec<_>>()
        .join(",")
}
