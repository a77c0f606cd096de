//! Character-set and grammar checks for untrusted identifiers.
//!
//! Everything that can end up in a cache file name or inside rendered script
//! output passes through one of these checks first. Patterns are anchored and
//! compiled once.

use regex::Regex;
use std::sync::OnceLock;

/// Longest cache key that is stored (common file name limit). Longer keys
/// are still valid; their output is served uncached.
pub const MAX_CACHE_KEY_LEN: usize = 255;

static LOCALE_REGEX: OnceLock<Regex> = OnceLock::new();
static LOCALE_LIST_CHARSET_REGEX: OnceLock<Regex> = OnceLock::new();
static DOMAIN_REGEX: OnceLock<Regex> = OnceLock::new();
static CACHE_KEY_REGEX: OnceLock<Regex> = OnceLock::new();
static JS_IDENTIFIER_PATH_REGEX: OnceLock<Regex> = OnceLock::new();

/// Validator for identifiers that reach storage paths or rendered output.
pub struct IdentifierValidator;

impl IdentifierValidator {
    /// Check a single locale against `language[_-]Script?[_-]Region?`.
    ///
    /// Each subpart is alphanumeric and at least two characters long, and
    /// subparts are separated by exactly one `_` or `-`.
    pub fn is_valid_locale(locale: &str) -> bool {
        let regex = LOCALE_REGEX.get_or_init(|| {
            Regex::new(r"^[A-Za-z0-9]{2,}(?:[-_][A-Za-z0-9]{2,}){0,2}$").unwrap()
        });
        regex.is_match(locale)
    }

    /// Check that a raw locale list only uses `[A-Za-z0-9,_-]`.
    pub fn has_locale_list_charset(raw: &str) -> bool {
        let regex = LOCALE_LIST_CHARSET_REGEX
            .get_or_init(|| Regex::new(r"^[A-Za-z0-9,_-]+$").unwrap());
        regex.is_match(raw)
    }

    /// Check a domain identifier: alphanumerics plus `_ - + .`, never a
    /// path separator, and never a bare `.` or `..`.
    pub fn is_valid_domain(domain: &str) -> bool {
        let regex = DOMAIN_REGEX.get_or_init(|| Regex::new(r"^[A-Za-z0-9_+.-]+$").unwrap());
        regex.is_match(domain) && domain != "." && domain != ".."
    }

    /// Second gate before a key addresses storage: alphanumerics plus
    /// `_ - + . ,`, and not a relative directory reference.
    pub fn is_valid_cache_key(key: &str) -> bool {
        let regex = CACHE_KEY_REGEX.get_or_init(|| Regex::new(r"^[A-Za-z0-9_+.,-]+$").unwrap());
        regex.is_match(key) && key != "." && key != ".."
    }

    /// Check a dotted JavaScript identifier path such as `Translator` or
    /// `window.Translator`.
    pub fn is_valid_js_identifier_path(name: &str) -> bool {
        let regex = JS_IDENTIFIER_PATH_REGEX.get_or_init(|| {
            Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*(?:\.[A-Za-z_$][A-Za-z0-9_$]*)*$").unwrap()
        });
        regex.is_match(name)
    }
}
