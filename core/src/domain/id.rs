//! Typed document identifiers.
//!
//! Every document id is an opaque 24-hex-character string (12 random bytes,
//! hex-encoded), minted client-side at creation the way document-store
//! drivers mint object ids. Each collection gets its own wrapper type so an
//! estate id can never be handed to a post lookup; all wrappers round-trip
//! through serde as plain strings.

use std::fmt;

use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Number of hex characters in a document id.
pub const ID_LENGTH: usize = 24;

/// Validation errors raised while parsing a document id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdValidationError {
    /// The input was empty.
    #[error("document id must not be empty")]
    Empty,
    /// The input was not exactly [`ID_LENGTH`] hex characters.
    #[error("document id must be {ID_LENGTH} hex characters, got {found:?}")]
    InvalidFormat {
        /// The rejected input.
        found: String,
    },
}

fn validate_id(raw: &str) -> Result<(), IdValidationError> {
    if raw.is_empty() {
        return Err(IdValidationError::Empty);
    }
    if raw.len() != ID_LENGTH || !raw.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(IdValidationError::InvalidFormat {
            found: raw.to_owned(),
        });
    }
    Ok(())
}

fn mint_id() -> String {
    let mut bytes = [0_u8; 12];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

macro_rules! define_document_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Validate and construct an id from borrowed input.
            ///
            /// # Errors
            ///
            /// Returns [`IdValidationError`] when the input is not a
            /// 24-hex-character string.
            pub fn new(id: impl AsRef<str>) -> Result<Self, IdValidationError> {
                let raw = id.as_ref();
                validate_id(raw)?;
                Ok(Self(raw.to_owned()))
            }

            /// Mint a fresh random id.
            #[must_use]
            pub fn random() -> Self {
                Self(mint_id())
            }

            /// The raw hex string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.0.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                validate_id(&value)?;
                Ok(Self(value))
            }
        }
    };
}

define_document_id! {
    /// Identifier of a [`crate::domain::User`] document.
    UserId
}

define_document_id! {
    /// Identifier of an [`crate::domain::Estate`] document.
    EstateId
}

define_document_id! {
    /// Identifier of a [`crate::domain::Post`] document.
    PostId
}

define_document_id! {
    /// Identifier of a [`crate::domain::Comment`] document.
    CommentId
}
