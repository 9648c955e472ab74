use async_trait::async_trait;

use crate::{AccountId, TollgateError, WindowSeconds};

/// Result of a clamped decrement against a counter store.
///
/// A stored value of zero and an absent key are distinct, meaningful states:
/// zero means the budget for a live window is spent, absence means no window
/// is open at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecrementOutcome {
    /// The counter existed. Holds the post-decrement value, floored at zero
    /// even when the decrement amount exceeded the prior value.
    Applied(u64),
    /// No live counter exists for the key.
    Missing,
}

/// Counter primitives consumed by [`CreditGate`](crate::CreditGate).
///
/// Implementations must make `decrement_clamped` atomic per key: concurrent
/// decrements against the same account compose as if serialized, each
/// observing the prior result. Expiry is the store's responsibility; once a
/// counter's time-to-live elapses the key behaves as absent for all
/// subsequent operations.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Atomically decrement the counter under `account` by `amount`, clamping
    /// the stored value at zero.
    ///
    /// Returns [`DecrementOutcome::Missing`] when no live counter exists; the
    /// key must not be created by this operation.
    async fn decrement_clamped(
        &self,
        account: &AccountId,
        amount: u64,
    ) -> Result<DecrementOutcome, TollgateError>;

    /// Unconditionally create or overwrite the counter under `account` with
    /// `value`, resetting its expiry to `ttl` from now.
    async fn set_with_expiry(
        &self,
        account: &AccountId,
        value: u64,
        ttl: WindowSeconds,
    ) -> Result<(), TollgateError>;
}
