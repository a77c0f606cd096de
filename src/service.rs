//! Request-level orchestration: validate, resolve, aggregate, render, cache.
//!
//! Validation happens before any provider call or cache key construction,
//! so rejected input never touches storage. Cache failures are logged and
//! counted but never fail a request.

use crate::aggregate::CatalogAggregator;
use crate::cache::{CacheKey, RenderCache};
use crate::catalog::{CatalogProvider, CatalogStore, DomainRegistry};
use crate::config::Config;
use crate::error::RenderError;
use crate::i18n::{
    base_domain_of, validate_locale_list, DomainFamilyResolver, IdentifierValidator,
    LocaleToken, RenderMetrics,
};
use crate::render::{Format, Renderer};
use std::sync::Arc;
use tracing::{debug, warn};

pub struct TranslationService {
    provider: Arc<dyn CatalogProvider>,
    registry: Arc<dyn DomainRegistry>,
    cache: Option<Arc<dyn RenderCache>>,
    renderer: Renderer,
    fallback_locale: String,
    default_domain: String,
    default_locale: LocaleToken,
    metrics: Arc<RenderMetrics>,
}

impl TranslationService {
    pub fn new(
        config: &Config,
        provider: Arc<dyn CatalogProvider>,
        registry: Arc<dyn DomainRegistry>,
    ) -> Result<Self, RenderError> {
        if !IdentifierValidator::is_valid_locale(&config.fallback_locale) {
            return Err(RenderError::InvalidLocaleFormat(config.fallback_locale.clone()));
        }
        if !IdentifierValidator::is_valid_domain(&config.default_domain) {
            return Err(RenderError::InvalidDomain(config.default_domain.clone()));
        }

        Ok(Self {
            provider,
            registry,
            cache: None,
            renderer: Renderer::new(config.translator_global.clone()),
            fallback_locale: config.fallback_locale.clone(),
            default_domain: config.default_domain.clone(),
            default_locale: LocaleToken::parse(&config.default_locale)?,
            metrics: Arc::new(RenderMetrics::new()),
        })
    }

    /// Service backed by a single store acting as provider and registry.
    pub fn from_store(config: &Config, store: Arc<CatalogStore>) -> Result<Self, RenderError> {
        Self::new(config, store.clone(), store)
    }

    pub fn with_cache(mut self, cache: Arc<dyn RenderCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn metrics(&self) -> &Arc<RenderMetrics> {
        &self.metrics
    }

    pub fn default_domain(&self) -> &str {
        &self.default_domain
    }

    /// Render `domain` for a raw, untrusted locale list.
    ///
    /// `locales` of `None` means the request named no locale; the configured
    /// default locale is used instead. Unknown domains and locales render as
    /// empty results, never as errors.
    pub fn render(
        &self,
        domain: &str,
        locales: Option<&str>,
        format: &str,
    ) -> Result<Vec<u8>, RenderError> {
        let result = self.validate(domain, locales, format).and_then(|(locales, format)| {
            self.render_validated(domain, &locales, format)
        });

        if let Err(e) = &result {
            if e.is_not_found() {
                self.metrics.record_rejected();
                debug!("Rejected translation request: {}", e);
            }
        }
        result
    }

    fn validate(
        &self,
        domain: &str,
        locales: Option<&str>,
        format: &str,
    ) -> Result<(Vec<LocaleToken>, Format), RenderError> {
        let format: Format = format.parse()?;
        if !IdentifierValidator::is_valid_domain(domain) {
            return Err(RenderError::InvalidDomain(domain.to_string()));
        }
        let locales = match locales {
            Some(raw) => validate_locale_list(raw)?,
            None => vec![self.default_locale.clone()],
        };
        Ok((locales, format))
    }

    /// Render already-validated input, consulting the cache first.
    pub fn render_validated(
        &self,
        domain: &str,
        locales: &[LocaleToken],
        format: Format,
    ) -> Result<Vec<u8>, RenderError> {
        let cached = match &self.cache {
            Some(cache) => {
                let key = CacheKey::new(domain, locales, format)?;
                if key.is_storable() {
                    Some((cache, key))
                } else {
                    debug!("Cache key for {} is too long, rendering uncached", domain);
                    None
                }
            }
            None => None,
        };

        if let Some((cache, key)) = &cached {
            if let Some(bytes) = cache.get(key) {
                self.metrics.record_cache_hit();
                debug!("Serving {} from cache", key);
                return Ok(bytes);
            }
            self.metrics.record_cache_miss();
        }

        let family = DomainFamilyResolver::resolve(self.registry.as_ref(), domain);
        let result = CatalogAggregator::aggregate(
            self.provider.as_ref(),
            locales,
            &family,
            &self.fallback_locale,
            &self.default_domain,
        );
        let bytes = self.renderer.render(&result, format)?;
        self.metrics.record_render();

        if let Some((cache, key)) = &cached {
            if let Err(e) = cache.put(key, &bytes) {
                self.metrics.record_cache_write_failure();
                warn!("Serving uncached response: {}", e);
            }
        }

        Ok(bytes)
    }

    /// Fallback locale and default domain only.
    pub fn render_config(&self, format: Format) -> Result<Vec<u8>, RenderError> {
        self.renderer
            .render_config(&self.fallback_locale, &self.default_domain, format)
    }

    /// Base domains the registry knows, variants folded into their base.
    pub fn known_base_domains(&self) -> Vec<String> {
        let mut domains: Vec<String> = Vec::new();
        for domain in self.registry.known_domains() {
            let base = base_domain_of(&domain);
            if IdentifierValidator::is_valid_domain(base) && !domains.iter().any(|d| d == base) {
                domains.push(base.to_string());
            }
        }
        domains
    }

    /// Locales the registry knows that pass the locale grammar.
    pub fn known_locales(&self) -> Vec<LocaleToken> {
        self.registry
            .known_locales()
            .iter()
            .filter_map(|locale| LocaleToken::parse(locale).ok())
            .collect()
    }
}
