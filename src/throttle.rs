//! Top-level entrypoint that wires the built-in counter stores.
//!
//! [`Tollgate`] bundles one [`CreditGate`] per built-in store behind a single
//! handle. Custom stores can bypass the facade entirely and construct a
//! [`CreditGate`] over any [`CounterStore`](crate::CounterStore)
//! implementation.

use crate::{CreditGate, MemoryCounterStore};

#[cfg(any(feature = "redis-tokio", feature = "redis-smol"))]
#[cfg_attr(docsrs, doc(cfg(any(feature = "redis-tokio", feature = "redis-smol"))))]
use crate::{RedisCounterStore, RedisCounterStoreOptions};

/// Top-level configuration for [`Tollgate`].
///
/// The in-memory store takes no configuration; without a Redis feature
/// enabled this struct is empty.
#[derive(Clone, Debug)]
pub struct TollgateOptions {
    /// Options for the Redis-backed counter store.
    #[cfg(any(feature = "redis-tokio", feature = "redis-smol"))]
    pub redis: RedisCounterStoreOptions,
}

/// Throttling entrypoint.
///
/// Wires together one gate per built-in counter store (currently `memory`
/// and, behind the Redis features, `redis`).
pub struct Tollgate {
    memory: CreditGate<MemoryCounterStore>,
    #[cfg(any(feature = "redis-tokio", feature = "redis-smol"))]
    #[cfg_attr(docsrs, doc(cfg(any(feature = "redis-tokio", feature = "redis-smol"))))]
    redis: CreditGate<RedisCounterStore>,
}

impl Tollgate {
    /// Create a new [`Tollgate`].
    pub fn new(options: TollgateOptions) -> Self {
        #[cfg(not(any(feature = "redis-tokio", feature = "redis-smol")))]
        let TollgateOptions {} = options;

        Self {
            memory: CreditGate::new(MemoryCounterStore::new()),
            #[cfg(any(feature = "redis-tokio", feature = "redis-smol"))]
            redis: CreditGate::new(RedisCounterStore::new(options.redis)),
        }
    }

    /// Access the gate over the in-process store.
    pub fn memory(&self) -> &CreditGate<MemoryCounterStore> {
        &self.memory
    }

    /// Access the gate over the Redis-backed store.
    #[cfg(any(feature = "redis-tokio", feature = "redis-smol"))]
    #[cfg_attr(docsrs, doc(cfg(any(feature = "redis-tokio", feature = "redis-smol"))))]
    pub fn redis(&self) -> &CreditGate<RedisCounterStore> {
        &self.redis
    }

    /// Start the in-process store's purge thread.
    ///
    /// See [`MemoryCounterStore::run_purge_loop_with_interval`].
    pub fn run_purge_loop_with_interval(&self, interval_ms: u64) {
        self.memory.store().run_purge_loop_with_interval(interval_ms);
    }

    /// Stop the in-process store's purge thread. Idempotent.
    pub fn stop_purge_loop(&self) {
        self.memory.store().stop_purge_loop();
    }
}
