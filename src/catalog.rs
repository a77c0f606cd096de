//! Catalog data: the provider/registry seams and an in-memory store that
//! backs both.
//!
//! The engine never evaluates messages. A catalog is an ordered list of
//! key/message pairs exactly as the provider returned them; keys that look
//! numeric stay strings and nothing is reordered or deduplicated.

use crate::i18n::IdentifierValidator;
use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// Ordered key/message pairs for one (locale, domain) pair.
pub type Messages = Vec<(String, String)>;

/// One catalog as seen by the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    locale: String,
    domain: String,
    messages: Messages,
    known: bool,
}

impl Catalog {
    /// A catalog the provider actually holds (possibly with zero messages).
    pub fn new(locale: impl Into<String>, domain: impl Into<String>, messages: Messages) -> Self {
        Self {
            locale: locale.into(),
            domain: domain.into(),
            messages,
            known: true,
        }
    }

    /// Placeholder for a pair the provider has no data for.
    pub fn missing(locale: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            domain: domain.into(),
            messages: Vec::new(),
            known: false,
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Exact domain identifier, including any variant suffix.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn messages(&self) -> &[(String, String)] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Whether the provider holds this pair at all.
    pub fn is_known(&self) -> bool {
        self.known
    }
}

/// Source of catalog content.
pub trait CatalogProvider: Send + Sync {
    /// Messages for an exact (locale, domain) pair, in provider order.
    /// Unknown pairs return `None`; this is never an error.
    fn lookup(&self, locale: &str, domain: &str) -> Option<Messages>;
}

/// Source of the domain identifiers that exist.
pub trait DomainRegistry: Send + Sync {
    /// Identifiers known for at least one locale that are `base` itself or
    /// `base` followed by a `+` variant suffix, in registration order.
    fn list_domain_variants(&self, base: &str) -> Vec<String>;

    /// Every locale with at least one catalog, in registration order.
    fn known_locales(&self) -> Vec<String>;

    /// Every domain identifier, variants included, in registration order.
    fn known_domains(&self) -> Vec<String>;
}

/// In-memory catalogs, keyed by (locale, domain).
#[derive(Debug, Default, Clone)]
pub struct CatalogStore {
    domains: Vec<String>,
    locales: Vec<String>,
    catalogs: HashMap<(String, String), Messages>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register messages for a pair. Registering the same pair again appends.
    pub fn add<K, V>(
        &mut self,
        locale: &str,
        domain: &str,
        messages: impl IntoIterator<Item = (K, V)>,
    ) where
        K: Into<String>,
        V: Into<String>,
    {
        if !self.domains.iter().any(|d| d == domain) {
            self.domains.push(domain.to_string());
        }
        if !self.locales.iter().any(|l| l == locale) {
            self.locales.push(locale.to_string());
        }
        self.catalogs
            .entry((locale.to_string(), domain.to_string()))
            .or_default()
            .extend(messages.into_iter().map(|(k, v)| (k.into(), v.into())));
    }

    /// Load every `<domain>.<locale>.json` file in `dir`.
    ///
    /// Files are read in file-name order so registration order is stable
    /// across runs. Nested objects are flattened to dot-joined keys. Files
    /// with an unexpected name, an invalid domain or locale, or a non-object
    /// body are skipped with a warning.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let mut paths: Vec<_> = std::fs::read_dir(dir)
            .with_context(|| format!("Failed to read translations directory {}", dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file())
            .collect();
        paths.sort();

        let mut store = Self::new();
        for path in paths {
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some(stem) = file_name.strip_suffix(".json") else {
                debug!("Skipping non-JSON file {:?}", file_name);
                continue;
            };
            let Some((domain, locale)) = stem.rsplit_once('.') else {
                warn!("Skipping {:?}: expected <domain>.<locale>.json", file_name);
                continue;
            };
            if !IdentifierValidator::is_valid_domain(domain)
                || !IdentifierValidator::is_valid_locale(locale)
            {
                warn!("Skipping {:?}: invalid domain or locale", file_name);
                continue;
            }

            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let value: Value = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?;
            let Value::Object(map) = value else {
                warn!("Skipping {:?}: top-level value is not an object", file_name);
                continue;
            };

            let mut messages = Vec::new();
            for (key, value) in map {
                flatten_into(&mut messages, key, value);
            }
            debug!("Loaded {} messages from {:?}", messages.len(), file_name);
            store.add(locale, domain, messages);
        }

        info!(
            "Loaded {} catalogs ({} domains, {} locales) from {}",
            store.catalogs.len(),
            store.domains.len(),
            store.locales.len(),
            dir.display()
        );
        Ok(store)
    }
}

/// Flatten nested JSON into dot-joined keys, keeping document order.
fn flatten_into(out: &mut Messages, key: String, value: Value) {
    match value {
        Value::String(s) => out.push((key, s)),
        Value::Object(map) => {
            for (child, value) in map {
                flatten_into(out, format!("{key}.{child}"), value);
            }
        }
        Value::Array(items) => {
            for (index, value) in items.into_iter().enumerate() {
                flatten_into(out, format!("{key}.{index}"), value);
            }
        }
        Value::Null => out.push((key, String::new())),
        other => out.push((key, other.to_string())),
    }
}

impl CatalogProvider for CatalogStore {
    fn lookup(&self, locale: &str, domain: &str) -> Option<Messages> {
        self.catalogs
            .get(&(locale.to_string(), domain.to_string()))
            .cloned()
    }
}

impl DomainRegistry for CatalogStore {
    fn list_domain_variants(&self, base: &str) -> Vec<String> {
        let prefix = format!("{base}+");
        self.domains
            .iter()
            .filter(|d| d.as_str() == base || d.starts_with(&prefix))
            .cloned()
            .collect()
    }

    fn known_locales(&self) -> Vec<String> {
        self.locales.clone()
    }

    fn known_domains(&self) -> Vec<String> {
        self.domains.clone()
    }
}
