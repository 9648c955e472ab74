use std::{ops::Deref, sync::Arc};

use dashmap::DashMap;

use crate::{AccountId, TollgateError};

/// A validated namespace prefix for Redis keys.
///
/// This is a string with the following constraints:
/// - Must not be empty
/// - Must not be longer than 255 bytes
/// - Must not contain colons
#[derive(Debug, Clone, PartialEq, PartialOrd, Hash, Eq)]
pub struct KeyPrefix(Arc<str>);

impl Deref for KeyPrefix {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TryFrom<String> for KeyPrefix {
    type Error = TollgateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            Err(TollgateError::InvalidKeyPrefix(
                "Key prefix must not be empty".to_string(),
            ))
        } else if value.len() > 255 {
            Err(TollgateError::InvalidKeyPrefix(
                "Key prefix must not be longer than 255 bytes".to_string(),
            ))
        } else if value.contains(":") {
            Err(TollgateError::InvalidKeyPrefix(
                "Key prefix must not contain colons".to_string(),
            ))
        } else {
            Ok(Self(Arc::from(value)))
        }
    }
}

#[derive(Debug)]
pub(crate) struct RedisKeyCache {
    prefix: Option<KeyPrefix>,
    cache: DashMap<AccountId, Arc<str>>,
}

impl RedisKeyCache {
    pub(crate) fn new(prefix: Option<KeyPrefix>) -> Self {
        Self {
            prefix,
            cache: DashMap::new(),
        }
    }

    /// The Redis key for `account`: the id verbatim, or `prefix:id` when a
    /// prefix is configured.
    pub(crate) fn key_for(&self, account: &AccountId) -> Arc<str> {
        let Some(prefix) = &self.prefix else {
            return account.shared();
        };

        match self.cache.get(account) {
            Some(value) => value.clone(),
            None => {
                let value: Arc<str> = Arc::from(format!("{}:{}", &**prefix, account));
                self.cache.insert(account.clone(), value.clone());

                value
            }
        }
    }
}
