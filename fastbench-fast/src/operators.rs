/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! FAST field operators and values.
//!
//! Operators define how field values are encoded and decoded relative to
//! previous values in the dictionary.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// FAST field operator types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Operator {
    /// No operator - value is always present in stream.
    #[default]
    None,
    /// Constant - value is never in stream, always uses initial value.
    Constant,
    /// Default - if absent, use initial value.
    Default,
    /// Copy - if absent, use previous value from dictionary.
    Copy,
    /// Increment - if absent, increment previous value by 1.
    Increment,
    /// Delta - value in stream is delta from previous value.
    Delta,
    /// Tail - value in stream replaces tail of previous value.
    Tail,
}

impl Operator {
    /// Returns true if this operator reads or writes the dictionary.
    #[must_use]
    pub const fn uses_dictionary(&self) -> bool {
        matches!(
            self,
            Self::Copy | Self::Increment | Self::Delta | Self::Tail
        )
    }

    /// Returns true if this operator consumes a presence map bit.
    ///
    /// Constant only takes a bit when the field is optional.
    #[must_use]
    pub const fn requires_pmap(&self, optional: bool) -> bool {
        match self {
            Self::None | Self::Delta => false,
            Self::Constant => optional,
            Self::Default | Self::Copy | Self::Increment | Self::Tail => true,
        }
    }
}

/// Dictionary scope for operator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DictionaryScope {
    /// Global dictionary shared across all templates.
    #[default]
    Global,
    /// Template-specific dictionary.
    Template,
}

/// A decoded field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldValue {
    /// Unsigned integer (uInt32 / uInt64).
    UInt(u64),
    /// Signed integer (int32 / int64).
    Int(i64),
    /// ASCII string.
    Ascii(String),
    /// Byte vector.
    Bytes(Vec<u8>),
    /// Scaled decimal.
    Decimal(Decimal),
}

impl FieldValue {
    /// Returns the value as a u64, if applicable.
    #[must_use]
    pub const fn as_u64(&self) -> Option<u64> {
        match self {
            Self::UInt(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as an i64, if applicable.
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as a string, if applicable.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Ascii(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as a decimal, if applicable.
    #[must_use]
    pub const fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    /// Returns the raw bytes of a string or byte vector value.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Ascii(s) => Some(s.as_bytes()),
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }
}

/// State of a dictionary entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DictionaryValue {
    /// No value has been set since the last reset.
    #[default]
    Undefined,
    /// The previous value was null.
    Empty,
    /// The previous value.
    Assigned(FieldValue),
}

impl DictionaryValue {
    /// Returns true if the value is undefined.
    #[must_use]
    pub const fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Returns true if the value is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns the assigned value, if any.
    #[must_use]
    pub const fn value(&self) -> Option<&FieldValue> {
        match self {
            Self::Assigned(v) => Some(v),
            _ => None,
        }
    }
}

impl From<Option<FieldValue>> for DictionaryValue {
    fn from(value: Option<FieldValue>) -> Self {
        value.map_or(Self::Empty, Self::Assigned)
    }
}
