//! Transaction identifiers
//!
//! IDs are random UUIDs. Users see and type the short form `txn-1a2b3c4d`;
//! files carry the full UUID.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Prefix of the short display form
const DISPLAY_PREFIX: &str = "txn-";

/// Shortest UUID prefix accepted as a reference to a transaction
const MIN_PREFIX_LEN: usize = 8;

/// Unique identifier of a ledger transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(Uuid);

impl TransactionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Whether a user-supplied reference names this ID
    ///
    /// Accepts the short display form or any prefix of the UUID of at least
    /// eight characters, with or without `txn-`.
    pub fn matches(&self, identifier: &str) -> bool {
        let identifier = identifier.trim();
        let bare = identifier
            .strip_prefix(DISPLAY_PREFIX)
            .unwrap_or(identifier)
            .to_ascii_lowercase();
        bare.len() >= MIN_PREFIX_LEN && self.0.to_string().starts_with(&bare)
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let uuid = self.0.simple().to_string();
        write!(f, "{}{}", DISPLAY_PREFIX, &uuid[..MIN_PREFIX_LEN])
    }
}

impl From<Uuid> for TransactionId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl FromStr for TransactionId {
    type Err = uuid::Error;

    /// Parses a full UUID, optionally written with the `txn-` prefix
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Uuid::parse_str(s.strip_prefix(DISPLAY_PREFIX).unwrap_or(s)).map(Self)
    }
}
