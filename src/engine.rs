use std::future::Future;

use crate::{
    AccountId, CounterStore, DecrementOutcome, Interval, IntervalError, TollgateError,
};

/// Per-account throttling decisions over a shared counter store.
///
/// The gate is stateless apart from the injected store handle: it caches no
/// counter values in-process and assumes no single-node affinity, so any
/// number of gates across threads or processes may serve the same accounts
/// against the same store.
///
/// # Algorithm
///
/// A fixed-window counter with lazy, store-backed state:
///
/// 1. **Decrement:** atomically decrement the account's counter by the call's
///    cost, floored at zero.
/// 2. **Live window:** a post-decrement value above zero allows the call; a
///    value of exactly zero throttles it.
/// 3. **Cold start:** when no counter exists, fetch the interval from the
///    supplier, write `1 + credits - cost` (floored at zero) with the window
///    length as TTL, and allow unless the cost alone exceeds the budget.
///
/// The stored value is kept one above the remaining credit so that the call
/// which lands exactly on the budget still decrements to a positive value and
/// is allowed; zero marks exhaustion.
///
/// # Semantics & Limitations
///
/// **Best-effort cold start:**
/// - The miss observation, the supplier call, and the counter write are not
///   one atomic step
/// - Concurrent cold starts on the same account each fetch the interval and
///   each overwrite the counter; the last writer wins and sibling deductions
///   are lost
/// - Under contention an account can transiently receive more than one
///   window's credit
/// - This is **expected behavior**, not a bug
///
/// **No retries, no fallbacks:**
/// - Supplier and store failures are propagated verbatim; a failed call makes
///   no throttling decision at all
///
/// **Store-driven expiry:**
/// - Counters are never deleted explicitly; a window closes only when its
///   TTL elapses in the store
///
/// # Examples
///
/// ```no_run
/// use tollgate::{AccountId, CreditGate, Interval, MemoryCounterStore, WindowSeconds};
///
/// # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// let gate = CreditGate::new(MemoryCounterStore::new());
/// let account = AccountId::try_from("customer_42".to_string())?;
///
/// let allowed = gate
///     .allow(&account, 1, || async {
///         Ok(Interval::new(WindowSeconds::try_from(60)?, 100))
///     })
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct CreditGate<S> {
    store: S,
}

impl<S> CreditGate<S> {
    /// Create a new gate over `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Access the underlying counter store.
    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: CounterStore> CreditGate<S> {
    /// Pay `cost` from `account`'s budget and decide whether the call is
    /// allowed.
    ///
    /// `new_interval` is invoked at most once, and only when no live counter
    /// exists for the account. It may be arbitrarily slow (a plan lookup, a
    /// remote config fetch); that is exactly why it is lazy instead of being
    /// a plain argument.
    ///
    /// Performs at most one decrement and at most one write against the
    /// store per call.
    ///
    /// # Errors
    ///
    /// - [`TollgateError::IntervalSupplier`] when `new_interval` fails; no
    ///   counter is written in that case
    /// - Store errors, propagated unchanged
    pub async fn allow<F, Fut>(
        &self,
        account: &AccountId,
        cost: u64,
        new_interval: F,
    ) -> Result<bool, TollgateError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Interval, IntervalError>>,
    {
        match self.store.decrement_clamped(account, cost).await? {
            DecrementOutcome::Applied(remaining) => Ok(remaining > 0),
            DecrementOutcome::Missing => {
                let interval = new_interval()
                    .await
                    .map_err(TollgateError::IntervalSupplier)?;

                // One above the remaining credit; saturating on both ends so
                // an oversized cost stores a spent counter rather than wrapping.
                let balance = interval.credits.saturating_add(1).saturating_sub(cost);

                self.store
                    .set_with_expiry(account, balance, interval.seconds)
                    .await?;

                Ok(cost <= interval.credits)
            }
        }
    } // end method allow
}
