#![doc = include_str!("../README.md")]
#![deny(missing_docs)]
#![forbid(unsafe_code)]

mod throttle;
pub use throttle::*;

mod engine;
pub use engine::*;

mod store;
pub use store::*;

mod interval;
pub use interval::*;

mod memory;
pub use memory::*;

#[cfg(any(feature = "redis-tokio", feature = "redis-smol"))]
mod redis;
#[cfg(any(feature = "redis-tokio", feature = "redis-smol"))]
pub use redis::*;

mod error;
pub use error::*;

mod common;
pub use common::{AccountId, WindowSeconds};
