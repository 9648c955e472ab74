use crate::WindowSeconds;

/// Error produced by an interval supplier.
///
/// Suppliers are caller-owned, so the concrete error type is the caller's
/// business; it is carried through unchanged.
pub type IntervalError = Box<dyn std::error::Error + Send + Sync>;

/// Replenishment policy for a newly opened window.
///
/// Describes how much credit an account receives and for how long the budget
/// is valid before it resets via expiry. An interval is only materialized on
/// cold start, when no live counter exists for the account.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Interval {
    /// Window length; also the counter's time-to-live in the store.
    pub seconds: WindowSeconds,
    /// Credit budget granted for one window.
    pub credits: u64,
}

impl Interval {
    /// Create a new interval.
    pub fn new(seconds: WindowSeconds, credits: u64) -> Self {
        Self { seconds, credits }
    }
}
