//! In-process counter store.
//!
//! Maintains counters within the current process using thread-safe data
//! structures ([`DashMap`](dashmap::DashMap) and atomics).
//!
//! # Key Characteristics
//!
//! - **Thread-safe:** Safe for concurrent use across multiple threads
//! - **Zero external dependencies:** No network or database required
//! - **Process-scoped:** Budgets are not shared across processes
//!
//! # When to Use
//!
//! ✅ **Use the in-memory store when:**
//! - Single-process application
//! - Low-latency requirements
//! - Simple deployment (no Redis/external dependencies)
//!
//! ❌ **Don't use the in-memory store when:**
//! - Multiple application instances must share budgets
//! - Budgets must survive process restarts

mod memory_counter_store;
pub use memory_counter_store::*;
