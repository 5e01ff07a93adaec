//! Bridge counters.
//!
//! In-process atomic counters readable through [`BridgeMetrics::snapshot`],
//! mirrored to the `metrics` facade so an installed exporter sees them too.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Counters for one bridge instance.
#[derive(Debug, Default)]
pub struct BridgeMetrics {
    burns: AtomicU64,
    burns_rejected: AtomicU64,
    claims_minted: AtomicU64,
    claims_rejected: AtomicU64,
}

/// Point-in-time copy of [`BridgeMetrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub burns: u64,
    pub burns_rejected: u64,
    pub claims_minted: u64,
    pub claims_rejected: u64,
}

impl BridgeMetrics {
    /// Fresh counters.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn burn_accepted(&self) {
        self.burns.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("xchain_burns_total", "outcome" => "accepted").increment(1);
    }

    pub(crate) fn burn_rejected(&self, kind: &'static str) {
        self.burns_rejected.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("xchain_burns_total", "outcome" => kind).increment(1);
    }

    pub(crate) fn claim_minted(&self) {
        self.claims_minted.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("xchain_claims_total", "outcome" => "minted").increment(1);
    }

    pub(crate) fn claim_rejected(&self, kind: &'static str) {
        self.claims_rejected.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("xchain_claims_total", "outcome" => kind).increment(1);
    }

    /// Current values.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            burns: self.burns.load(Ordering::Relaxed),
            burns_rejected: self.burns_rejected.load(Ordering::Relaxed),
            claims_minted: self.claims_minted.load(Ordering::Relaxed),
            claims_rejected: self.claims_rejected.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_without_recorder() {
        let m = BridgeMetrics::new();
        m.burn_accepted();
        m.claim_rejected("already_claimed");
        m.claim_minted();
        assert_eq!(
            m.snapshot(),
            MetricsSnapshot {
                burns: 1,
                burns_rejected: 0,
                claims_minted: 1,
                claims_rejected: 1,
            }
        );
    }
}
