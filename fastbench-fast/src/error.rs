/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! FAST protocol error types.

use thiserror::Error;

/// Errors that can occur during FAST encoding/decoding.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FastError {
    /// Unexpected end of input.
    #[error("unexpected end of input")]
    UnexpectedEof,

    /// Unknown template ID.
    #[error("unknown template id: {0}")]
    UnknownTemplate(u32),

    /// The presence map omitted the template id and no previous id is known.
    #[error("template id absent and no previous template id in dictionary")]
    MissingTemplateId,

    /// Integer overflow during decoding.
    #[error("integer overflow")]
    IntegerOverflow,

    /// Invalid string encoding.
    #[error("invalid string encoding")]
    InvalidString,

    /// Invalid decimal encoding.
    #[error("invalid decimal: exponent={exponent}, mantissa={mantissa}")]
    InvalidDecimal {
        /// Decimal exponent.
        exponent: i64,
        /// Decimal mantissa.
        mantissa: i64,
    },

    /// Missing mandatory field.
    #[error("missing mandatory field: {name}")]
    MissingMandatoryField {
        /// Field name.
        name: String,
    },

    /// Invalid operator application.
    #[error("invalid operator: {0}")]
    InvalidOperator(String),

    /// A delta or tail could not be applied to the previous value.
    #[error("delta out of range for field: {name}")]
    DeltaOutOfRange {
        /// Field name.
        name: String,
    },
}
