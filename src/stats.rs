use crate::models::EnrichmentStatus;
use crate::redirect::Resolution;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters collected across lookups in one run
#[derive(Default)]
pub struct LookupStats {
    pub things_loaded: AtomicU64,
    pub categories_loaded: AtomicU64,
    pub redirects: AtomicU64,
    pub not_found: AtomicU64,
    pub unsupported: AtomicU64,
    pub enrichments_resolved: AtomicU64,
    pub enrichments_failed: AtomicU64,
    pub triples_written: AtomicU64,
}

/// Plain copy of the counters for printing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub things_loaded: u64,
    pub categories_loaded: u64,
    pub redirects: u64,
    pub not_found: u64,
    pub unsupported: u64,
    pub enrichments_resolved: u64,
    pub enrichments_failed: u64,
    pub triples_written: u64,
}

impl LookupStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc_things(&self) {
        self.things_loaded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_categories(&self) {
        self.categories_loaded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_triples(&self, count: u64) {
        self.triples_written.fetch_add(count, Ordering::Relaxed);
    }

    /// Counts every outcome except `Resolved`, which the caller counts by kind.
    pub fn record_resolution<T>(&self, resolution: &Resolution<T>) {
        let counter = match resolution {
            Resolution::Resolved(_) => return,
            Resolution::Redirected(_) => &self.redirects,
            Resolution::NotFound => &self.not_found,
            Resolution::UnsupportedNamespace { .. } => &self.unsupported,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_enrichment(&self, status: EnrichmentStatus) {
        match status {
            EnrichmentStatus::Resolved => {
                self.enrichments_resolved.fetch_add(1, Ordering::Relaxed);
            }
            EnrichmentStatus::Failed => {
                self.enrichments_failed.fetch_add(1, Ordering::Relaxed);
            }
            EnrichmentStatus::Absent | EnrichmentStatus::Cached => {}
        }
    }

    pub fn things(&self) -> u64 {
        self.things_loaded.load(Ordering::Relaxed)
    }

    pub fn categories(&self) -> u64 {
        self.categories_loaded.load(Ordering::Relaxed)
    }

    pub fn failures(&self) -> u64 {
        self.enrichments_failed.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            things_loaded: self.things(),
            categories_loaded: self.categories(),
            redirects: self.redirects.load(Ordering::Relaxed),
            not_found: self.not_found.load(Ordering::Relaxed),
            unsupported: self.unsupported.load(Ordering::Relaxed),
            enrichments_resolved: self.enrichments_resolved.load(Ordering::Relaxed),
            enrichments_failed: self.failures(),
            triples_written: self.triples_written.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::redirect::PageRef;

    #[test]
    fn default_values_are_zero() {
        let stats = LookupStats::new();
        assert_eq!(stats.snapshot(), StatsSnapshot::default());
    }

    #[test]
    fn resolutions_counted_by_outcome() {
        let stats = LookupStats::new();
        stats.record_resolution(&Resolution::Resolved(()));
        stats.record_resolution::<()>(&Resolution::NotFound);
        stats.record_resolution::<()>(&Resolution::NotFound);
        stats.record_resolution::<()>(&Resolution::Redirected(PageRef {
            page_id: 52780,
            title: "U2".to_string(),
        }));
        stats.record_resolution::<()>(&Resolution::UnsupportedNamespace {
            page_id: 1,
            namespace: 10,
        });

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.not_found, 2);
        assert_eq!(snapshot.redirects, 1);
        assert_eq!(snapshot.unsupported, 1);
        assert_eq!(snapshot.things_loaded, 0);
    }

    #[test]
    fn enrichment_outcomes() {
        let stats = LookupStats::new();
        stats.record_enrichment(EnrichmentStatus::Resolved);
        stats.record_enrichment(EnrichmentStatus::Failed);
        stats.record_enrichment(EnrichmentStatus::Absent);
        stats.record_enrichment(EnrichmentStatus::Cached);
        assert_eq!(stats.snapshot().enrichments_resolved, 1);
        assert_eq!(stats.failures(), 1);
    }

    #[test]
    fn mixed_operations() {
        let stats = LookupStats::new();
        stats.inc_things();
        stats.inc_things();
        stats.inc_categories();
        stats.add_triples(18);
        stats.add_triples(7);

        assert_eq!(stats.things(), 2);
        assert_eq!(stats.categories(), 1);
        assert_eq!(stats.snapshot().triples_written, 25);
    }
}
