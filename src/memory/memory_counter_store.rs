use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
    thread,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use dashmap::DashMap;

use crate::{AccountId, CounterStore, DecrementOutcome, TollgateError, WindowSeconds};

pub(crate) struct CounterCell {
    pub value: AtomicU64,
    pub deadline: Instant,
}

enum Lookup {
    Applied(u64),
    Expired,
    Missing,
}

/// In-process counter store.
///
/// Counters live in a concurrent map; each entry carries an atomic value and
/// a deadline. Decrements are a single atomic read-modify-write, so they
/// compose per key exactly like the distributed store's.
///
/// # Expiry
///
/// An entry whose deadline has passed behaves as absent for every operation.
/// Expired entries are dropped lazily when touched; keys that are never
/// touched again stay in the map until a purge pass removes them. With
/// unbounded key cardinality, run the purge loop
/// ([`run_purge_loop_with_interval`](Self::run_purge_loop_with_interval)) to
/// keep memory bounded.
pub struct MemoryCounterStore {
    cells: Arc<DashMap<AccountId, CounterCell>>,
    purge_running: Arc<AtomicBool>,
    purge_epoch: Arc<AtomicU64>,
}

impl MemoryCounterStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            cells: Arc::new(DashMap::new()),
            purge_running: Arc::new(AtomicBool::new(false)),
            purge_epoch: Arc::new(AtomicU64::new(0)),
        }
    } // end constructor

    pub(crate) fn cells(&self) -> &DashMap<AccountId, CounterCell> {
        &self.cells
    }

    /// Drop every entry whose deadline has passed. Returns the number of
    /// entries removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.cells.len();
        self.cells.retain(|_, cell| cell.deadline > now);
        before.saturating_sub(self.cells.len())
    }

    /// Start a background thread that purges expired entries every
    /// `interval_ms` milliseconds.
    ///
    /// No-op if a purge thread is already running. The thread can be stopped
    /// with [`stop_purge_loop`](Self::stop_purge_loop) and started again
    /// afterwards.
    pub fn run_purge_loop_with_interval(&self, interval_ms: u64) {
        if self
            .purge_running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }

        // Bump the epoch so a previous thread still sleeping through its
        // interval exits instead of doubling up with the new one.
        let epoch = self.purge_epoch.fetch_add(1, Ordering::AcqRel) + 1;

        let store = Self {
            cells: Arc::clone(&self.cells),
            purge_running: Arc::clone(&self.purge_running),
            purge_epoch: Arc::clone(&self.purge_epoch),
        };

        thread::spawn(move || {
            loop {
                thread::sleep(Duration::from_millis(interval_ms));

                if !store.purge_running.load(Ordering::Acquire)
                    || store.purge_epoch.load(Ordering::Acquire) != epoch
                {
                    break;
                }

                let removed = store.purge_expired();
                if removed > 0 {
                    tracing::debug!(removed, "purged expired counters");
                }
            }
        });
    } // end method run_purge_loop_with_interval

    /// Stop the purge thread. Idempotent.
    pub fn stop_purge_loop(&self) {
        self.purge_running.store(false, Ordering::Release);
    }
}

impl Default for MemoryCounterStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CounterStore for MemoryCounterStore {
    async fn decrement_clamped(
        &self,
        account: &AccountId,
        amount: u64,
    ) -> Result<DecrementOutcome, TollgateError> {
        let now = Instant::now();

        let lookup = match self.cells.get(account) {
            None => Lookup::Missing,
            Some(cell) if cell.deadline <= now => Lookup::Expired,
            Some(cell) => {
                let previous = cell
                    .value
                    .fetch_update(Ordering::AcqRel, Ordering::Acquire, |value| {
                        Some(value.saturating_sub(amount))
                    })
                    .unwrap_or_else(|value| value);

                Lookup::Applied(previous.saturating_sub(amount))
            }
        };

        match lookup {
            Lookup::Applied(value) => Ok(DecrementOutcome::Applied(value)),
            Lookup::Missing => Ok(DecrementOutcome::Missing),
            Lookup::Expired => {
                // Drop lazily; re-check the deadline so a counter written
                // concurrently for a fresh window is not discarded.
                self.cells
                    .remove_if(account, |_, cell| cell.deadline <= now);
                Ok(DecrementOutcome::Missing)
            }
        }
    }

    async fn set_with_expiry(
        &self,
        account: &AccountId,
        value: u64,
        ttl: WindowSeconds,
    ) -> Result<(), TollgateError> {
        self.cells.insert(
            account.clone(),
            CounterCell {
                value: AtomicU64::new(value),
                deadline: Instant::now() + Duration::from_secs(*ttl),
            },
        );

        Ok(())
    }
}
