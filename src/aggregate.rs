//! Per-locale, per-domain catalog aggregation.

use crate::catalog::{Catalog, CatalogProvider};
use crate::i18n::{DomainFamily, LocaleToken};
use tracing::debug;

/// Catalogs for one locale, one entry per family member in family order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleCatalogs {
    pub locale: LocaleToken,
    pub catalogs: Vec<Catalog>,
}

impl LocaleCatalogs {
    /// True when no family member has any message for this locale.
    pub fn is_empty(&self) -> bool {
        self.catalogs.iter().all(Catalog::is_empty)
    }
}

/// Everything the renderer needs for one response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedResult {
    pub fallback: String,
    pub default_domain: String,
    /// In request order.
    pub translations: Vec<LocaleCatalogs>,
}

/// Collects catalogs from a provider for a set of locales and a domain family.
pub struct CatalogAggregator;

impl CatalogAggregator {
    /// Look up every (locale, member) pair.
    ///
    /// Locales stay in request order and members in family order. A pair the
    /// provider does not know contributes an empty catalog; it never affects
    /// its siblings. `fallback` is copied through as-is: it describes the
    /// system, not the response content.
    pub fn aggregate(
        provider: &dyn CatalogProvider,
        locales: &[LocaleToken],
        family: &DomainFamily,
        fallback: &str,
        default_domain: &str,
    ) -> AggregatedResult {
        let translations = locales
            .iter()
            .map(|locale| {
                let catalogs = family
                    .members()
                    .iter()
                    .map(|domain| match provider.lookup(locale.as_str(), domain) {
                        Some(messages) => Catalog::new(locale.as_str(), domain.as_str(), messages),
                        None => Catalog::missing(locale.as_str(), domain.as_str()),
                    })
                    .collect::<Vec<_>>();

                debug!(
                    "Aggregated {} catalogs for locale {} ({} messages)",
                    catalogs.len(),
                    locale,
                    catalogs.iter().map(|c| c.messages().len()).sum::<usize>()
                );

                LocaleCatalogs {
                    locale: locale.clone(),
                    catalogs,
                }
            })
            .collect();

        AggregatedResult {
            fallback: fallback.to_string(),
            default_domain: default_domain.to_string(),
            translations,
        }
    }
}
