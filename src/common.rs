use std::{fmt, ops::Deref, sync::Arc};

use crate::TollgateError;

/// A validated account identifier.
///
/// The identifier is opaque to this crate and is used verbatim as the counter
/// key in the backing store. Constraints:
/// - Must not be empty
/// - Must not be longer than 255 bytes
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Hash)]
pub struct AccountId(Arc<str>);

impl AccountId {
    /// View the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[cfg(any(feature = "redis-tokio", feature = "redis-smol"))]
    pub(crate) fn shared(&self) -> Arc<str> {
        Arc::clone(&self.0)
    }
}

impl Deref for AccountId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for AccountId {
    type Error = TollgateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            Err(TollgateError::InvalidAccountId(
                "Account id must not be empty".to_string(),
            ))
        } else if value.len() > 255 {
            Err(TollgateError::InvalidAccountId(
                "Account id must not be longer than 255 bytes".to_string(),
            ))
        } else {
            Ok(Self(Arc::from(value)))
        }
    }
}

/// Window length in whole seconds.
///
/// Doubles as the counter's time-to-live in the backing store, so it must be
/// at least 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct WindowSeconds(u64);

impl Deref for WindowSeconds {
    type Target = u64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TryFrom<u64> for WindowSeconds {
    type Error = &'static str;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        if value == 0 {
            Err("Window seconds must be at least 1")
        } else {
            Ok(Self(value))
        }
    }
}
