/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! FAST template descriptions.
//!
//! A template lists the field instructions of one message type in wire
//! order. Templates are built in code and bound to a decoder once, before
//! any message is decoded.

use crate::error::FastError;
use crate::operators::{DictionaryScope, FieldValue, Operator};
use serde::{Deserialize, Serialize};

/// Wire type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    /// 32-bit unsigned integer.
    UInt32,
    /// 64-bit unsigned integer.
    UInt64,
    /// 32-bit signed integer.
    Int32,
    /// 64-bit signed integer.
    Int64,
    /// ASCII string.
    Ascii,
    /// Length-prefixed byte vector.
    ByteVector,
    /// Exponent and mantissa pair.
    Decimal,
}

impl FieldType {
    /// Returns true for the four integer types.
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Self::UInt32 | Self::UInt64 | Self::Int32 | Self::Int64)
    }

    /// Returns true for ASCII strings and byte vectors.
    #[must_use]
    pub const fn is_sequence(&self) -> bool {
        matches!(self, Self::Ascii | Self::ByteVector)
    }
}

/// Whether a field may be null.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Presence {
    /// The field always has a value.
    #[default]
    Mandatory,
    /// The field may be null; nullable encodings are used on the wire.
    Optional,
}

/// One field of a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldInstruction {
    /// Field name, also the default dictionary key.
    pub name: String,
    /// Wire type.
    pub field_type: FieldType,
    /// Mandatory or optional.
    pub presence: Presence,
    /// Field operator.
    pub operator: Operator,
    /// Dictionary the operator state lives in.
    pub scope: DictionaryScope,
    /// Explicit dictionary key, if different from the name.
    pub key: Option<String>,
    /// Initial value used by Constant, Default and on undefined entries.
    pub initial: Option<FieldValue>,
}

impl FieldInstruction {
    /// Creates a mandatory field with no operator.
    #[must_use]
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            presence: Presence::Mandatory,
            operator: Operator::None,
            scope: DictionaryScope::Global,
            key: None,
            initial: None,
        }
    }

    /// Sets the operator.
    #[must_use]
    pub fn with_operator(mut self, operator: Operator) -> Self {
        self.operator = operator;
        self
    }

    /// Marks the field optional.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.presence = Presence::Optional;
        self
    }

    /// Sets the initial value.
    #[must_use]
    pub fn with_initial(mut self, value: FieldValue) -> Self {
        self.initial = Some(value);
        self
    }

    /// Sets the dictionary scope.
    #[must_use]
    pub fn with_scope(mut self, scope: DictionaryScope) -> Self {
        self.scope = scope;
        self
    }

    /// Sets an explicit dictionary key.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Returns true if the field is optional.
    #[must_use]
    pub fn is_optional(&self) -> bool {
        self.presence == Presence::Optional
    }

    /// Returns the dictionary key.
    #[must_use]
    pub fn dictionary_key(&self) -> &str {
        self.key.as_deref().unwrap_or(&self.name)
    }

    /// Checks that the operator can be applied to this field.
    ///
    /// # Errors
    /// Returns `FastError::InvalidOperator` describing the first problem.
    pub fn validate(&self) -> Result<(), FastError> {
        let allowed = match self.operator {
            Operator::None | Operator::Constant | Operator::Default | Operator::Copy => true,
            Operator::Increment => self.field_type.is_integer(),
            Operator::Delta => self.field_type != FieldType::Decimal,
            Operator::Tail => self.field_type.is_sequence(),
        };
        if !allowed {
            return Err(FastError::InvalidOperator(format!(
                "{:?} not applicable to {:?} field {}",
                self.operator, self.field_type, self.name
            )));
        }
        if self.operator == Operator::Constant && self.initial.is_none() {
            return Err(FastError::InvalidOperator(format!(
                "constant field {} has no initial value",
                self.name
            )));
        }
        if self.operator == Operator::Default && self.initial.is_none() && !self.is_optional() {
            return Err(FastError::InvalidOperator(format!(
                "mandatory default field {} has no initial value",
                self.name
            )));
        }
        Ok(())
    }
}

/// A message template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    /// Template id carried in the stream.
    pub id: u32,
    /// Template name.
    pub name: String,
    /// Field instructions in wire order.
    pub fields: Vec<FieldInstruction>,
}

impl Template {
    /// Creates a template.
    #[must_use]
    pub fn new(id: u32, name: impl Into<String>, fields: Vec<FieldInstruction>) -> Self {
        Self {
            id,
            name: name.into(),
            fields,
        }
    }

    /// Returns the position of the field called `name`.
    #[must_use]
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name == name)
    }

    /// Validates every field instruction.
    ///
    /// # Errors
    /// Returns the first `FastError::InvalidOperator` found.
    pub fn validate(&self) -> Result<(), FastError> {
        self.fields.iter().try_for_each(FieldInstruction::validate)
    }
}
