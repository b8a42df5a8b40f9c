//! In-flight call accounting.
//!
//! # Responsibilities
//! - Count logical calls that have been submitted but not yet terminated
//! - Keep the count balanced no matter how a call ends (success, error, drop)
//!
//! A logical call holds one [`InFlightGuard`] for its whole lifetime,
//! retries included, so the count reflects outstanding calls rather than
//! attempts made.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::observability::metrics;

/// Lock-free counter of outstanding logical calls.
#[derive(Debug, Clone, Default)]
pub struct InFlightCounter {
    count: Arc<AtomicUsize>,
}

impl InFlightCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current number of outstanding calls.
    pub fn get(&self) -> usize {
        self.count.load(Ordering::Acquire)
    }

    /// Register a new logical call. The count drops back when the guard does.
    pub fn enter(&self) -> InFlightGuard {
        let now = self.count.fetch_add(1, Ordering::AcqRel) + 1;
        metrics::record_in_flight(now);
        InFlightGuard {
            count: self.count.clone(),
        }
    }
}

/// A RAII guard that keeps one logical call registered.
#[derive(Debug)]
pub struct InFlightGuard {
    count: Arc<AtomicUsize>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        let now = self.count.fetch_sub(1, Ordering::AcqRel) - 1;
        metrics::record_in_flight(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_balances_count() {
        let counter = InFlightCounter::new();
        let a = counter.enter();
        let b = counter.enter();
        assert_eq!(counter.get(), 2);

        drop(a);
        assert_eq!(counter.get(), 1);
        drop(b);
        assert_eq!(counter.get(), 0);
    }

    #[test]
    fn test_clones_share_state() {
        let counter = InFlightCounter::new();
        let observer = counter.clone();
        let _guard = counter.enter();
        assert_eq!(observer.get(), 1);
    }

    #[test]
    fn test_concurrent_enter_and_leave() {
        let counter = InFlightCounter::new();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let counter = counter.clone();
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        let _guard = counter.enter();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(counter.get(), 0);
    }
}
