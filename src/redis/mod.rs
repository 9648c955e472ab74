//! Redis-backed counter store.
//!
//! Enables throttling across multiple processes or servers using Redis as the
//! shared budget. The clamped decrement is a single atomic Lua script.
//!
//! # Requirements
//!
//! - **Redis:** >= 6.2.0 (`SET ... KEEPTTL`)
//! - **Runtime:** Tokio or Smol (via the `redis-tokio` or `redis-smol` features)

mod redis_counter_store;
pub use redis_counter_store::*;

mod common;
pub use common::*;
