use crate::i18n::IdentifierValidator;
use crate::render::DEFAULT_TRANSLATOR_GLOBAL;
use anyhow::{bail, Context, Result};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    // Response metadata
    pub fallback_locale: String,
    pub default_domain: String,

    // Locale used when a request names none
    pub default_locale: String,

    // Catalog source
    pub translations_dir: PathBuf,

    // Render cache (disk cache disabled when unset)
    pub cache_dir: Option<PathBuf>,

    // HTTP
    pub http_cache_time: u32,
    pub port: u16,

    // Script output
    pub translator_global: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fallback_locale: "en".to_string(),
            default_domain: "messages".to_string(),
            default_locale: "en".to_string(),
            translations_dir: PathBuf::from("translations"),
            cache_dir: None,
            http_cache_time: 86400,
            port: 8080,
            translator_global: DEFAULT_TRANSLATOR_GLOBAL.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let config = Self {
            fallback_locale: std::env::var("FALLBACK_LOCALE")
                .unwrap_or(defaults.fallback_locale),
            default_domain: std::env::var("DEFAULT_DOMAIN").unwrap_or(defaults.default_domain),
            default_locale: std::env::var("DEFAULT_LOCALE").unwrap_or(defaults.default_locale),

            translations_dir: std::env::var("TRANSLATIONS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.translations_dir),
            cache_dir: std::env::var("CACHE_DIR")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),

            http_cache_time: match std::env::var("HTTP_CACHE_TIME") {
                Ok(v) => v
                    .parse()
                    .with_context(|| format!("HTTP_CACHE_TIME must be a number, got {:?}", v))?,
                Err(_) => defaults.http_cache_time,
            },
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),

            translator_global: std::env::var("TRANSLATOR_GLOBAL")
                .unwrap_or(defaults.translator_global),
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject configuration values that would end up unescaped in output or
    /// cache keys.
    pub fn validate(&self) -> Result<()> {
        if !IdentifierValidator::is_valid_locale(&self.fallback_locale) {
            bail!("FALLBACK_LOCALE is not a valid locale: {:?}", self.fallback_locale);
        }
        if !IdentifierValidator::is_valid_locale(&self.default_locale) {
            bail!("DEFAULT_LOCALE is not a valid locale: {:?}", self.default_locale);
        }
        if !IdentifierValidator::is_valid_domain(&self.default_domain) {
            bail!("DEFAULT_DOMAIN is not a valid domain: {:?}", self.default_domain);
        }
        if !IdentifierValidator::is_valid_js_identifier_path(&self.translator_global) {
            bail!(
                "TRANSLATOR_GLOBAL is not a valid identifier: {:?}",
                self.translator_global
            );
        }
        Ok(())
    }
}
