use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, Result};

/// Longest identifier accepted anywhere in the ledger.
pub const MAX_IDENTIFIER_LEN: usize = 64;

fn validate_identifier(kind: &'static str, value: String) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::EmptyIdentifier { kind });
    }
    if trimmed.chars().count() > MAX_IDENTIFIER_LEN {
        return Err(CoreError::IdentifierTooLong {
            kind,
            value: trimmed.to_string(),
            max: MAX_IDENTIFIER_LEN,
        });
    }
    if trimmed.len() == value.len() {
        Ok(value)
    } else {
        Ok(trimmed.to_string())
    }
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// # Errors
            ///
            /// Returns an error if the value is blank or longer than
            /// [`MAX_IDENTIFIER_LEN`] characters.
            pub fn new(value: impl Into<String>) -> Result<Self> {
                validate_identifier($kind, value.into()).map(Self)
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = CoreError;

            fn try_from(value: String) -> Result<Self> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

string_id!(
    /// Catalog code of a product.
    ItemCode,
    "item code"
);
string_id!(
    /// Identifies one stock-keeping record (a product variant or batch).
    StockId,
    "stock id"
);
string_id!(CustomerId, "customer id");
string_id!(CardNumber, "card number");
string_id!(Username, "username");
string_id!(OrderId, "order id");
string_id!(ReturnId, "return id");
string_id!(PurchaseOrderId, "purchase order id");

impl OrderId {
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl ReturnId {
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl PurchaseOrderId {
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}
