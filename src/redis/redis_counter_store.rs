use async_trait::async_trait;
use redis::{AsyncCommands, aio::ConnectionManager};

use crate::{
    AccountId, CounterStore, DecrementOutcome, KeyPrefix, RedisKeyCache, TollgateError,
    WindowSeconds,
};

/// Configuration for the Redis-backed counter store.
///
/// # Examples
///
/// ```ignore
/// use tollgate::{KeyPrefix, RedisCounterStoreOptions};
///
/// let client = redis::Client::open("redis://127.0.0.1:6379/")?;
/// let connection_manager = client.get_connection_manager().await?;
///
/// let options = RedisCounterStoreOptions {
///     connection_manager,
///     prefix: Some(KeyPrefix::try_from("myapp".to_string())?), // Keys: myapp:<account>
/// };
/// ```
#[derive(Clone)]
pub struct RedisCounterStoreOptions {
    /// Redis connection manager from the `redis` crate.
    ///
    /// Use `ConnectionManager` for automatic connection pooling and reconnection.
    pub connection_manager: ConnectionManager,

    /// Optional namespace prefix for counter keys.
    ///
    /// If provided, counters are stored under `<prefix>:<account>`; if `None`,
    /// the account id is the Redis key verbatim. A prefix is useful when the
    /// database is shared with other data.
    pub prefix: Option<KeyPrefix>,
}

impl std::fmt::Debug for RedisCounterStoreOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCounterStoreOptions")
            .field("connection_manager", &"ConnectionManager")
            .field("prefix", &self.prefix)
            .finish()
    }
}

/// Counter store backed by Redis.
///
/// The clamped decrement runs as a Lua script, so it is atomic per key and
/// keeps its distinction between a stored zero and an absent key. Expiry is
/// entirely server-driven: counters are created with a TTL and never deleted
/// by this client.
///
/// # Consistency Semantics
///
/// - **Atomic decrements:** Each script execution is atomic within Redis
/// - **Unconditional writes:** `set_with_expiry` overwrites whatever is
///   present; callers coordinating concurrent writers get last-writer-wins
pub struct RedisCounterStore {
    connection_manager: ConnectionManager,
    keys: RedisKeyCache,
}

impl RedisCounterStore {
    /// Create a new store over the configured connection.
    pub fn new(options: RedisCounterStoreOptions) -> Self {
        Self {
            connection_manager: options.connection_manager,
            keys: RedisKeyCache::new(options.prefix),
        }
    }
}

#[async_trait]
impl CounterStore for RedisCounterStore {
    async fn decrement_clamped(
        &self,
        account: &AccountId,
        amount: u64,
    ) -> Result<DecrementOutcome, TollgateError> {
        let script = redis::Script::new(
            r#"
            local value = redis.call("GET", KEYS[1])
            if value == false then
                return -1
            end

            local remaining = tonumber(value) - tonumber(ARGV[1])
            if remaining < 0 then
                remaining = 0
            end

            redis.call("SET", KEYS[1], remaining, "KEEPTTL")
            return remaining
        "#,
        );

        let key = self.keys.key_for(account);
        let mut connection_manager = self.connection_manager.clone();

        let remaining: i64 = script
            .key(&*key)
            .arg(amount)
            .invoke_async(&mut connection_manager)
            .await?;

        // -1 is the script's marker for "no such key"; a live counter is
        // never negative.
        if remaining < 0 {
            Ok(DecrementOutcome::Missing)
        } else {
            Ok(DecrementOutcome::Applied(remaining as u64))
        }
    } // end method decrement_clamped

    async fn set_with_expiry(
        &self,
        account: &AccountId,
        value: u64,
        ttl: WindowSeconds,
    ) -> Result<(), TollgateError> {
        let key = self.keys.key_for(account);
        let mut connection_manager = self.connection_manager.clone();

        let () = connection_manager.set_ex(&*key, value, *ttl).await?;

        Ok(())
    }
}
