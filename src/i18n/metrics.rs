//! Render metrics and observability.
//!
//! Tracks render cache behaviour and rejected requests. One instance is
//! shared by the service and the `/metrics` endpoint.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counters for one translation service.
#[derive(Debug, Default)]
pub struct RenderMetrics {
    /// Responses produced by rendering (cache misses and uncached renders)
    renders: AtomicUsize,

    /// Responses served from the render cache
    cache_hits: AtomicUsize,

    /// Cache lookups that found nothing
    cache_misses: AtomicUsize,

    /// Cache writes that failed (the response was still served)
    cache_write_failures: AtomicUsize,

    /// Requests rejected for invalid locale, domain, or format
    rejected: AtomicUsize,
}

impl RenderMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_render(&self) {
        self.renders.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_write_failure(&self) {
        self.cache_write_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn renders(&self) -> usize {
        self.renders.load(Ordering::Relaxed)
    }

    pub fn cache_hits(&self) -> usize {
        self.cache_hits.load(Ordering::Relaxed)
    }

    pub fn cache_misses(&self) -> usize {
        self.cache_misses.load(Ordering::Relaxed)
    }

    pub fn cache_write_failures(&self) -> usize {
        self.cache_write_failures.load(Ordering::Relaxed)
    }

    pub fn rejected(&self) -> usize {
        self.rejected.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let hits = self.cache_hits();
        let misses = self.cache_misses();
        let total_cache_queries = hits + misses;
        let cache_hit_rate = if total_cache_queries > 0 {
            (hits as f64 / total_cache_queries as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            renders: self.renders(),
            cache_hits: hits,
            cache_misses: misses,
            cache_hit_rate,
            cache_write_failures: self.cache_write_failures(),
            rejected: self.rejected(),
        }
    }
}

/// Snapshot of render statistics.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub renders: usize,
    pub cache_hits: usize,
    pub cache_misses: usize,

    /// Cache hit rate as a percentage (0-100)
    pub cache_hit_rate: f64,

    pub cache_write_failures: usize,
    pub rejected: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Counter Tests ====================

    #[test]
    fn test_counters_start_at_zero() {
        let metrics = RenderMetrics::new();
        assert_eq!(metrics.renders(), 0);
        assert_eq!(metrics.cache_hits(), 0);
        assert_eq!(metrics.cache_misses(), 0);
        assert_eq!(metrics.cache_write_failures(), 0);
        assert_eq!(metrics.rejected(), 0);
    }

    #[test]
    fn test_record_each_counter() {
        let metrics = RenderMetrics::new();
        metrics.record_render();
        metrics.record_cache_hit();
        metrics.record_cache_hit();
        metrics.record_cache_miss();
        metrics.record_cache_write_failure();
        metrics.record_rejected();

        assert_eq!(metrics.renders(), 1);
        assert_eq!(metrics.cache_hits(), 2);
        assert_eq!(metrics.cache_misses(), 1);
        assert_eq!(metrics.cache_write_failures(), 1);
        assert_eq!(metrics.rejected(), 1);
    }

    // ==================== Report Tests ====================

    #[test]
    fn test_report_empty() {
        let report = RenderMetrics::new().report();
        assert_eq!(report.cache_hits, 0);
        assert_eq!(report.cache_hit_rate, 0.0);
    }

    #[test]
    fn test_report_cache_hit_rate() {
        let metrics = RenderMetrics::new();

        // 3 hits, 1 miss = 75% hit rate
        metrics.record_cache_hit();
        metrics.record_cache_hit();
        metrics.record_cache_hit();
        metrics.record_cache_miss();

        let report = metrics.report();
        assert_eq!(report.cache_hits, 3);
        assert_eq!(report.cache_misses, 1);
        assert_eq!(report.cache_hit_rate, 75.0);
    }

    #[test]
    fn test_report_serializes() {
        let metrics = RenderMetrics::new();
        metrics.record_rejected();

        let json = serde_json::to_value(metrics.report()).expect("Should serialize");
        assert_eq!(json["rejected"], 1);
        assert_eq!(json["cache_hit_rate"], 0.0);
    }
}
