//! Identifiers of rundown items.
//!
//! Every id is a random UUID. It prints and parses in the hyphenated form
//! used in API paths, and knows which kind of item it names so lookups can
//! report a precise [`NotFoundError`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::NotFoundError;

macro_rules! define_id {
    ($(#[doc = $doc:expr])* $name:ident, $entity:literal) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(uuid::Uuid);

        impl Default for $name {
            fn default() -> Self {
                Self(uuid::Uuid::new_v4())
            }
        }

        impl $name {
            /// Name of the item kind, as shown in error messages.
            pub const ENTITY: &str = $entity;

            #[must_use]
            pub fn new() -> Self {
                Self::default()
            }

            /// The error for a lookup of this id that found nothing.
            #[must_use]
            pub fn not_found(self) -> NotFoundError {
                NotFoundError {
                    entity: Self::ENTITY,
                    id: self.to_string(),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0.hyphenated(), f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                uuid::Uuid::parse_str(s.trim()).map(Self)
            }
        }
    };
}

define_id!(
    /// Identifies a [`Command`](crate::command::Command) within its block.
    CommandId,
    "Command"
);

define_id!(
    /// Identifies a [`Block`](crate::block::Block), top level or nested.
    BlockId,
    "Block"
);

define_id!(
    /// Identifies a [`Container`](crate::rundown::Container).
    ContainerId,
    "Container"
);

define_id!(
    /// Identifies a [`LogEntry`](crate::log::LogEntry) on the log bus.
    LogEntryId,
    "Log entry"
);
