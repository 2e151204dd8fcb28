//! Metrics registry for rowquery
//!
//! - Counters only
//! - Monotonic increase
//! - Thread-safe but lock-free

use std::sync::atomic::{AtomicU64, Ordering};

/// Registry of query counters.
///
/// Counters use Relaxed ordering; values are exact once the producing calls
/// have returned.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Successful materializations
    queries_executed: AtomicU64,
    /// Queries rejected at construction
    queries_rejected: AtomicU64,
    /// Materializations that failed part way
    queries_failed: AtomicU64,
    /// Items enumerated across all queries
    items_scanned: AtomicU64,
    /// Record tokens produced across all queries
    rows_materialized: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new metrics registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment queries executed
    pub fn increment_queries_executed(&self) {
        self.queries_executed.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment queries rejected
    pub fn increment_queries_rejected(&self) {
        self.queries_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment queries failed
    pub fn increment_queries_failed(&self) {
        self.queries_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Add to items scanned
    pub fn add_items_scanned(&self, count: u64) {
        self.items_scanned.fetch_add(count, Ordering::Relaxed);
    }

    /// Add to rows materialized
    pub fn add_rows_materialized(&self, count: u64) {
        self.rows_materialized.fetch_add(count, Ordering::Relaxed);
    }

    /// Get current snapshot of all metrics as JSON
    pub fn to_json(&self) -> String {
        let snapshot = self.snapshot();
        format!(
            r#"{{"queries_executed":{},"queries_rejected":{},"queries_failed":{},"items_scanned":{},"rows_materialized":{}}}"#,
            snapshot.queries_executed,
            snapshot.queries_rejected,
            snapshot.queries_failed,
            snapshot.items_scanned,
            snapshot.rows_materialized,
        )
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            queries_executed: self.queries_executed.load(Ordering::Relaxed),
            queries_rejected: self.queries_rejected.load(Ordering::Relaxed),
            queries_failed: self.queries_failed.load(Ordering::Relaxed),
            items_scanned: self.items_scanned.load(Ordering::Relaxed),
            rows_materialized: self.rows_materialized.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub queries_executed: u64,
    pub queries_rejected: u64,
    pub queries_failed: u64,
    pub items_scanned: u64,
    pub rows_materialized: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_registry_has_zero_values() {
        let snapshot = MetricsRegistry::new().snapshot();
        assert_eq!(snapshot.queries_executed, 0);
        assert_eq!(snapshot.items_scanned, 0);
        assert_eq!(snapshot.rows_materialized, 0);
    }

    #[test]
    fn test_increment_counters() {
        let registry = MetricsRegistry::new();

        registry.increment_queries_executed();
        registry.increment_queries_executed();
        registry.increment_queries_rejected();
        registry.increment_queries_failed();
        registry.add_items_scanned(3);
        registry.add_rows_materialized(12);

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.queries_executed, 2);
        assert_eq!(snapshot.queries_rejected, 1);
        assert_eq!(snapshot.queries_failed, 1);
        assert_eq!(snapshot.items_scanned, 3);
        assert_eq!(snapshot.rows_materialized, 12);
    }

    #[test]
    fn test_to_json() {
        let registry = MetricsRegistry::new();
        registry.add_rows_materialized(10);
        registry.increment_queries_executed();

        let parsed: serde_json::Value = serde_json::from_str(&registry.to_json()).unwrap();
        assert_eq!(parsed["rows_materialized"], 10);
        assert_eq!(parsed["queries_executed"], 1);
    }

    #[test]
    fn test_thread_safety() {
        use std::sync::Arc;
        use std::thread;

        let registry = Arc::new(MetricsRegistry::new());
        let mut handles = vec![];

        for _ in 0..8 {
            let reg = Arc::clone(&registry);
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    reg.increment_queries_executed();
                    reg.add_items_scanned(2);
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.queries_executed, 800);
        assert_eq!(snapshot.items_scanned, 1600);
    }
}
