//! Validated wrappers around identifiers and scalar values.
//!
//! Identifiers are opaque strings compared by value; they carry no validation
//! beyond existing. The remaining value objects reject empty, negative, or
//! absent input on construction and are immutable afterwards.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors raised by value object constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueObjectError {
    /// Photo URL was empty.
    #[error("photo url must not be empty")]
    EmptyPhotoUrl,
    /// Barcode was empty.
    #[error("barcode must not be empty")]
    EmptyBarcode,
    /// Comment was empty once trimmed.
    #[error("comment must not be empty")]
    EmptyComment,
    /// Quantity was below zero.
    #[error("quantity must not be negative (got {value})")]
    NegativeQuantity { value: i64 },
    /// Quantity exceeded the storable range.
    #[error("quantity {value} exceeds the supported range")]
    QuantityOutOfRange { value: i64 },
    /// Deadline value was absent.
    #[error("deadline is required")]
    MissingDeadline,
    /// Deadline was not an RFC 3339 timestamp.
    #[error("deadline '{value}' is not an RFC 3339 timestamp")]
    InvalidDeadline { value: String },
}

macro_rules! define_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an existing identifier value.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Generate a fresh random identifier.
            pub fn random() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// Borrow the raw identifier.
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
                f.write_str(&self.0)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }
    };
}

define_identifier!(
    /// Stable user identifier.
    UserId
);
define_identifier!(
    /// Stable task identifier.
    TaskId
);
define_identifier!(
    /// Stable product identifier.
    ProductId
);
define_identifier!(
    /// Stable category identifier.
    CategoryId
);
define_identifier!(
    /// Stable task template identifier.
    TaskTemplateId
);
define_identifier!(
    /// Stable product set identifier.
    ProductSetId
);

macro_rules! define_non_empty_text {
    ($(#[$meta:meta])* $name:ident, $error:ident, $check:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Validate and wrap the value.
            pub fn new(value: impl Into<String>) -> Result<Self, ValueObjectError> {
                let value = value.into();
                let check: fn(&str) -> bool = $check;
                if check(&value) {
                    return Err(ValueObjectError::$error);
                }
                Ok(Self(value))
            }

            /// Borrow the wrapped value.
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
                f.write_str(&self.0)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValueObjectError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }
    };
}

define_non_empty_text!(
    /// Location of an uploaded photo.
    PhotoUrl,
    EmptyPhotoUrl,
    str::is_empty
);
define_non_empty_text!(
    /// Product barcode as scanned.
    Barcode,
    EmptyBarcode,
    str::is_empty
);
define_non_empty_text!(
    /// Free-text comment attached on task completion.
    Comment,
    EmptyComment,
    |value| value.trim().is_empty()
);

/// Non-negative stock quantity.
///
/// # Examples
/// ```
/// use tracker::domain::Quantity;
///
/// let quantity = Quantity::new(3).unwrap();
/// assert_eq!(quantity.value(), 3);
/// assert!(Quantity::new(-1).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Quantity(u32);

impl Quantity {
    /// The empty quantity.
    pub const ZERO: Self = Self(0);

    /// Validate and wrap a signed quantity.
    pub fn new(value: i64) -> Result<Self, ValueObjectError> {
        if value < 0 {
            return Err(ValueObjectError::NegativeQuantity { value });
        }
        u32::try_from(value)
            .map(Self)
            .map_err(|_| ValueObjectError::QuantityOutOfRange { value })
    }

    /// The wrapped amount.
    pub fn value(self) -> u32 {
        self.0
    }

    /// Whether nothing is left.
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Add `amount`, rejecting results beyond the storable range.
    pub fn checked_add(self, amount: u32) -> Result<Self, ValueObjectError> {
        self.0.checked_add(amount).map(Self).ok_or_else(|| {
            ValueObjectError::QuantityOutOfRange {
                value: i64::from(self.0) + i64::from(amount),
            }
        })
    }

    /// Subtract `amount`, rejecting results below zero.
    pub fn checked_sub(self, amount: u32) -> Result<Self, ValueObjectError> {
        self.0.checked_sub(amount).map(Self).ok_or_else(|| {
            ValueObjectError::NegativeQuantity {
                value: i64::from(self.0) - i64::from(amount),
            }
        })
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Quantity> for i64 {
    fn from(value: Quantity) -> Self {
        i64::from(value.0)
    }
}

impl TryFrom<i64> for Quantity {
    type Error = ValueObjectError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Due date of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Deadline(DateTime<Utc>);

impl Deadline {
    /// Wrap a concrete instant.
    pub fn new(at: DateTime<Utc>) -> Self {
        Self(at)
    }

    /// Parse an RFC 3339 timestamp; blank input counts as absent.
    ///
    /// # Examples
    /// ```
    /// use tracker::domain::{Deadline, ValueObjectError};
    ///
    /// assert!(Deadline::parse("2026-10-18T12:00:00Z").is_ok());
    /// assert_eq!(Deadline::parse(" "), Err(ValueObjectError::MissingDeadline));
    /// ```
    pub fn parse(raw: &str) -> Result<Self, ValueObjectError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::MissingDeadline);
        }
        DateTime::parse_from_rfc3339(trimmed)
            .map(|at| Self(at.with_timezone(&Utc)))
            .map_err(|_| ValueObjectError::InvalidDeadline {
                value: trimmed.to_owned(),
            })
    }

    /// Accept an optional instant, rejecting absence.
    pub fn from_optional(at: Option<DateTime<Utc>>) -> Result<Self, ValueObjectError> {
        at.map(Self).ok_or(ValueObjectError::MissingDeadline)
    }

    /// The wrapped instant.
    pub fn at(self) -> DateTime<Utc> {
        self.0
    }

    /// Whether `now` is strictly after the deadline.
    pub fn has_passed(self, now: DateTime<Utc>) -> bool {
        now > self.0
    }
}
