/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! FAST protocol decoder.
//!
//! This module decodes whole messages: presence map, template id and the
//! template's fields, applying field operators against the dictionary.

use crate::dictionary::Dictionary;
use crate::error::FastError;
use crate::operators::{DictionaryValue, FieldValue, Operator};
use crate::pmap::PresenceMap;
use crate::stream::FastStream;
use crate::template::{FieldInstruction, FieldType, Template};
use rust_decimal::Decimal;
use smallvec::SmallVec;
use std::collections::HashMap;
use tracing::debug;

/// Field values of one message, in template order. `None` is a null field.
pub type Fields = SmallVec<[Option<FieldValue>; 8]>;

/// A decoded message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedMessage {
    template_id: u32,
    fields: Fields,
}

impl DecodedMessage {
    /// Returns the template id the message was decoded with.
    #[must_use]
    pub const fn template_id(&self) -> u32 {
        self.template_id
    }

    /// Returns all field values.
    #[must_use]
    pub fn fields(&self) -> &[Option<FieldValue>] {
        &self.fields
    }

    /// Returns the value at `index`, or `None` if null or out of range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&FieldValue> {
        self.fields.get(index).and_then(Option::as_ref)
    }
}

/// FAST protocol decoder.
#[derive(Debug, Default)]
pub struct FastDecoder {
    /// Bound templates by id.
    templates: HashMap<u32, Template>,
    /// Operator state.
    dictionary: Dictionary,
}

impl FastDecoder {
    /// Creates a decoder with no templates.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds templates to the decoder.
    ///
    /// # Errors
    /// Returns `FastError::InvalidOperator` if a template is malformed.
    pub fn include<I>(&mut self, templates: I) -> Result<(), FastError>
    where
        I: IntoIterator<Item = Template>,
    {
        for template in templates {
            template.validate()?;
            debug!("Bound template {} ({})", template.id, template.name);
            self.templates.insert(template.id, template);
        }
        Ok(())
    }

    /// Returns a bound template.
    #[must_use]
    pub fn template(&self, id: u32) -> Option<&Template> {
        self.templates.get(&id)
    }

    /// Returns the operator dictionary.
    #[must_use]
    pub const fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    /// Resets the decoder state.
    pub fn reset(&mut self) {
        self.dictionary.reset();
    }

    /// Decodes the next message from `stream`.
    ///
    /// # Arguments
    /// * `stream` - The input stream, advanced past the message
    /// * `force_reset` - Clear the dictionary before decoding
    ///
    /// # Errors
    /// Returns a `FastError` if the message is truncated, references an
    /// unknown template, or its operators cannot be applied.
    pub fn decode(
        &mut self,
        stream: &mut FastStream<'_>,
        force_reset: bool,
    ) -> Result<DecodedMessage, FastError> {
        if force_reset {
            self.reset();
        }

        let mut pmap = stream.read_pmap()?;

        let template_id = if pmap.next_bit() {
            u32::try_from(stream.read_uint()?).map_err(|_| FastError::IntegerOverflow)?
        } else {
            self.dictionary
                .last_template_id()
                .ok_or(FastError::MissingTemplateId)?
        };

        let template = self
            .templates
            .get(&template_id)
            .ok_or(FastError::UnknownTemplate(template_id))?;
        self.dictionary.set_last_template_id(template_id);

        let mut fields = Fields::with_capacity(template.fields.len());
        for field in &template.fields {
            let value = decode_field(&mut self.dictionary, template_id, field, &mut pmap, stream)?;
            fields.push(value);
        }

        Ok(DecodedMessage {
            template_id,
            fields,
        })
    }
}

fn decode_field(
    dictionary: &mut Dictionary,
    template_id: u32,
    field: &FieldInstruction,
    pmap: &mut PresenceMap,
    stream: &mut FastStream<'_>,
) -> Result<Option<FieldValue>, FastError> {
    let optional = field.is_optional();

    let value = match field.operator {
        Operator::None => return read_value(stream, field.field_type, optional),
        Operator::Constant => {
            if optional && !pmap.next_bit() {
                return Ok(None);
            }
            return Ok(field.initial.clone());
        }
        Operator::Default => {
            if pmap.next_bit() {
                return read_value(stream, field.field_type, optional);
            }
            return Ok(field.initial.clone());
        }
        Operator::Delta => {
            let previous = dictionary.get(field.scope, template_id, field.dictionary_key());
            match read_delta(stream, field, previous)? {
                Some(value) => Some(value),
                None => return Ok(None),
            }
        }
        Operator::Copy | Operator::Increment | Operator::Tail => {
            let present = pmap.next_bit();
            let previous = dictionary.get(field.scope, template_id, field.dictionary_key());
            match (present, field.operator) {
                (true, Operator::Tail) => read_tail(stream, field, previous)?,
                (true, _) => read_value(stream, field.field_type, optional)?,
                (false, _) => match previous {
                    DictionaryValue::Assigned(prev) if field.operator == Operator::Increment => {
                        Some(increment(prev, field)?)
                    }
                    DictionaryValue::Assigned(prev) => Some(prev.clone()),
                    DictionaryValue::Empty => None,
                    DictionaryValue::Undefined => field.initial.clone(),
                },
            }
        }
    };

    if value.is_none() && !optional {
        return Err(FastError::MissingMandatoryField {
            name: field.name.clone(),
        });
    }

    dictionary.set(
        field.scope,
        template_id,
        field.dictionary_key(),
        DictionaryValue::from(value.clone()),
    );
    Ok(value)
}

fn read_value(
    stream: &mut FastStream<'_>,
    field_type: FieldType,
    optional: bool,
) -> Result<Option<FieldValue>, FastError> {
    let value = match field_type {
        FieldType::UInt32 | FieldType::UInt64 => {
            let raw = if optional {
                stream.read_nullable_uint()?
            } else {
                Some(stream.read_uint()?)
            };
            match raw {
                Some(v) if field_type == FieldType::UInt32 && v > u64::from(u32::MAX) => {
                    return Err(FastError::IntegerOverflow);
                }
                other => other.map(FieldValue::UInt),
            }
        }
        FieldType::Int32 | FieldType::Int64 => {
            let raw = if optional {
                stream.read_nullable_int()?
            } else {
                Some(stream.read_int()?)
            };
            match raw {
                Some(v) if field_type == FieldType::Int32 && i32::try_from(v).is_err() => {
                    return Err(FastError::IntegerOverflow);
                }
                other => other.map(FieldValue::Int),
            }
        }
        FieldType::Ascii | FieldType::ByteVector => read_sequence(stream, field_type, optional)?
            .map(|bytes| sequence_value(field_type, bytes))
            .transpose()?,
        FieldType::Decimal => read_decimal(stream, optional)?.map(FieldValue::Decimal),
    };
    Ok(value)
}

fn read_decimal(stream: &mut FastStream<'_>, optional: bool) -> Result<Option<Decimal>, FastError> {
    let exponent = if optional {
        match stream.read_nullable_int()? {
            Some(exponent) => exponent,
            None => return Ok(None),
        }
    } else {
        stream.read_int()?
    };
    let mantissa = stream.read_int()?;
    let invalid = || FastError::InvalidDecimal { exponent, mantissa };

    if !(-63..=63).contains(&exponent) {
        return Err(invalid());
    }

    let value = if exponent <= 0 {
        let scale = u32::try_from(-exponent).map_err(|_| invalid())?;
        Decimal::try_from_i128_with_scale(i128::from(mantissa), scale).map_err(|_| invalid())?
    } else {
        (0..exponent)
            .try_fold(Decimal::from(mantissa), |acc, _| acc.checked_mul(Decimal::TEN))
            .ok_or_else(invalid)?
    };
    Ok(Some(value))
}

fn increment(previous: &FieldValue, field: &FieldInstruction) -> Result<FieldValue, FastError> {
    match previous {
        FieldValue::UInt(v) => {
            let limit = if field.field_type == FieldType::UInt32 {
                u64::from(u32::MAX)
            } else {
                u64::MAX
            };
            v.checked_add(1)
                .filter(|next| *next <= limit)
                .map(FieldValue::UInt)
                .ok_or(FastError::IntegerOverflow)
        }
        FieldValue::Int(v) => {
            let limit = if field.field_type == FieldType::Int32 {
                i64::from(i32::MAX)
            } else {
                i64::MAX
            };
            v.checked_add(1)
                .filter(|next| *next <= limit)
                .map(FieldValue::Int)
                .ok_or(FastError::IntegerOverflow)
        }
        _ => Err(FastError::InvalidOperator(format!(
            "increment on non-integer field {}",
            field.name
        ))),
    }
}

fn read_delta(
    stream: &mut FastStream<'_>,
    field: &FieldInstruction,
    previous: &DictionaryValue,
) -> Result<Option<FieldValue>, FastError> {
    let out_of_range = || FastError::DeltaOutOfRange {
        name: field.name.clone(),
    };
    let delta = if field.is_optional() {
        match stream.read_nullable_int()? {
            Some(delta) => delta,
            None => return Ok(None),
        }
    } else {
        stream.read_int()?
    };
    let base = previous.value().or(field.initial.as_ref());

    if field.field_type.is_integer() {
        let base = match base {
            Some(FieldValue::UInt(v)) => i128::from(*v),
            Some(FieldValue::Int(v)) => i128::from(*v),
            Some(_) => return Err(out_of_range()),
            None => 0,
        };
        let next = base + i128::from(delta);
        let value = match field.field_type {
            FieldType::UInt32 => FieldValue::UInt(u32::try_from(next).map_err(|_| out_of_range())?.into()),
            FieldType::UInt64 => FieldValue::UInt(u64::try_from(next).map_err(|_| out_of_range())?),
            FieldType::Int32 => FieldValue::Int(i32::try_from(next).map_err(|_| out_of_range())?.into()),
            _ => FieldValue::Int(i64::try_from(next).map_err(|_| out_of_range())?),
        };
        return Ok(Some(value));
    }

    // String delta: `delta` is the subtraction length. Non-negative trims the
    // back, negative trims `-(delta + 1)` bytes from the front.
    let diff = read_sequence(stream, field.field_type, false)?.ok_or_else(out_of_range)?;
    let base = base.and_then(FieldValue::as_bytes).unwrap_or_default();
    let combined = if delta >= 0 {
        let cut = usize::try_from(delta)
            .ok()
            .filter(|cut| *cut <= base.len())
            .ok_or_else(out_of_range)?;
        [&base[..base.len() - cut], diff.as_slice()].concat()
    } else {
        let cut = usize::try_from(-(delta + 1))
            .ok()
            .filter(|cut| *cut <= base.len())
            .ok_or_else(out_of_range)?;
        [diff.as_slice(), &base[cut..]].concat()
    };
    sequence_value(field.field_type, combined).map(Some)
}

fn read_tail(
    stream: &mut FastStream<'_>,
    field: &FieldInstruction,
    previous: &DictionaryValue,
) -> Result<Option<FieldValue>, FastError> {
    let Some(tail) = read_sequence(stream, field.field_type, field.is_optional())? else {
        return Ok(None);
    };
    let base = previous
        .value()
        .or(field.initial.as_ref())
        .and_then(FieldValue::as_bytes)
        .unwrap_or_default();

    let combined = if tail.len() >= base.len() {
        tail
    } else {
        [&base[..base.len() - tail.len()], tail.as_slice()].concat()
    };
    sequence_value(field.field_type, combined).map(Some)
}

fn read_sequence(
    stream: &mut FastStream<'_>,
    field_type: FieldType,
    optional: bool,
) -> Result<Option<Vec<u8>>, FastError> {
    Ok(match (field_type, optional) {
        (FieldType::Ascii, false) => Some(stream.read_ascii()?.into_bytes()),
        (FieldType::Ascii, true) => stream.read_nullable_ascii()?.map(String::into_bytes),
        (_, false) => Some(stream.read_bytes()?.to_vec()),
        (_, true) => stream.read_nullable_bytes()?.map(<[u8]>::to_vec),
    })
}

fn sequence_value(field_type: FieldType, bytes: Vec<u8>) -> Result<FieldValue, FastError> {
    match field_type {
        FieldType::Ascii => String::from_utf8(bytes)
            .map(FieldValue::Ascii)
            .map_err(|_| FastError::InvalidString),
        _ => Ok(FieldValue::Bytes(bytes)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::FastEncoder;
    use crate::operators::DictionaryScope;

    fn quote_template() -> Template {
        Template::new(
            1,
            "Quote",
            vec![
                FieldInstruction::new("SeqNum", FieldType::UInt32)
                    .with_operator(Operator::Increment)
                    .with_scope(DictionaryScope::Template),
                FieldInstruction::new("Symbol", FieldType::Ascii).with_operator(Operator::Copy),
                FieldInstruction::new("Price", FieldType::Decimal).with_operator(Operator::Copy),
                FieldInstruction::new("Size", FieldType::UInt32)
                    .with_operator(Operator::Default)
                    .with_initial(FieldValue::UInt(100)),
                FieldInstruction::new("Note", FieldType::Ascii).optional(),
            ],
        )
    }

    fn decoder_with(template: Template) -> FastDecoder {
        let mut decoder = FastDecoder::new();
        decoder.include([template]).unwrap();
        decoder
    }

    /// First quote: every operator field present except Size.
    fn full_quote(encoder: &mut FastEncoder) {
        encoder.encode_pmap(&PresenceMap::from_bits(&[true, true, true, true, false]));
        encoder.encode_uint(1);
        encoder.encode_uint(10);
        encoder.encode_ascii("IBM");
        encoder.encode_int(-2);
        encoder.encode_int(12345);
        encoder.encode_nullable_ascii(None);
    }

    /// Follow-up quote: only Size and Note in stream.
    fn sparse_quote(encoder: &mut FastEncoder) {
        encoder.encode_pmap(&PresenceMap::from_bits(&[false, false, false, false, true]));
        encoder.encode_uint(250);
        encoder.encode_nullable_ascii(Some("x"));
    }

    #[test]
    fn test_decode_copies_previous_values() {
        let mut encoder = FastEncoder::new();
        full_quote(&mut encoder);
        sparse_quote(&mut encoder);
        let bytes = encoder.finish();

        let mut decoder = decoder_with(quote_template());
        let mut stream = FastStream::new(&bytes);

        let first = decoder.decode(&mut stream, true).unwrap();
        assert_eq!(first.template_id(), 1);
        assert_eq!(first.get(0).and_then(FieldValue::as_u64), Some(10));
        assert_eq!(first.get(1).and_then(FieldValue::as_str), Some("IBM"));
        assert_eq!(
            first.get(2).and_then(FieldValue::as_decimal),
            Some(Decimal::new(12345, 2))
        );
        assert_eq!(first.get(3).and_then(FieldValue::as_u64), Some(100));
        assert_eq!(first.get(4), None);

        let second = decoder.decode(&mut stream, false).unwrap();
        assert_eq!(second.template_id(), 1);
        assert_eq!(second.get(0).and_then(FieldValue::as_u64), Some(11));
        assert_eq!(second.get(1).and_then(FieldValue::as_str), Some("IBM"));
        assert_eq!(second.get(3).and_then(FieldValue::as_u64), Some(250));
        assert_eq!(second.get(4).and_then(FieldValue::as_str), Some("x"));
        assert!(stream.is_eof());
    }

    #[test]
    fn test_reset_clears_template_id() {
        let mut encoder = FastEncoder::new();
        full_quote(&mut encoder);
        sparse_quote(&mut encoder);
        let bytes = encoder.finish();

        let mut decoder = decoder_with(quote_template());
        let mut stream = FastStream::new(&bytes);
        decoder.decode(&mut stream, true).unwrap();

        assert_eq!(
            decoder.decode(&mut stream, true).unwrap_err(),
            FastError::MissingTemplateId
        );
    }

    #[test]
    fn test_reset_clears_operator_state() {
        let mut encoder = FastEncoder::new();
        full_quote(&mut encoder);
        encoder.encode_pmap(&PresenceMap::from_bits(&[true]));
        encoder.encode_uint(1);
        encoder.encode_nullable_ascii(None);
        let bytes = encoder.finish();

        let mut decoder = decoder_with(quote_template());
        let mut stream = FastStream::new(&bytes);
        decoder.decode(&mut stream, false).unwrap();
        assert!(decoder.dictionary().last_template_id().is_some());

        let err = decoder.decode(&mut stream, true).unwrap_err();
        assert_eq!(
            err,
            FastError::MissingMandatoryField {
                name: "SeqNum".to_string()
            }
        );
    }

    #[test]
    fn test_decode_delta_fields() {
        let template = Template::new(
            2,
            "Trade",
            vec![
                FieldInstruction::new("Price", FieldType::Int64).with_operator(Operator::Delta),
                FieldInstruction::new("Name", FieldType::Ascii).with_operator(Operator::Delta),
            ],
        );
        let mut encoder = FastEncoder::new();
        encoder.encode_pmap(&PresenceMap::from_bits(&[true]));
        encoder.encode_uint(2);
        encoder.encode_int(100);
        encoder.encode_int(0);
        encoder.encode_ascii("ABC");

        encoder.encode_pmap(&PresenceMap::new());
        encoder.encode_int(-5);
        encoder.encode_int(1);
        encoder.encode_ascii("D");

        encoder.encode_pmap(&PresenceMap::new());
        encoder.encode_int(0);
        encoder.encode_int(-1);
        encoder.encode_ascii("Z");
        let bytes = encoder.finish();

        let mut decoder = decoder_with(template);
        let mut stream = FastStream::new(&bytes);

        let first = decoder.decode(&mut stream, true).unwrap();
        assert_eq!(first.get(0).and_then(FieldValue::as_i64), Some(100));
        assert_eq!(first.get(1).and_then(FieldValue::as_str), Some("ABC"));

        let second = decoder.decode(&mut stream, false).unwrap();
        assert_eq!(second.get(0).and_then(FieldValue::as_i64), Some(95));
        assert_eq!(second.get(1).and_then(FieldValue::as_str), Some("ABD"));

        let third = decoder.decode(&mut stream, false).unwrap();
        assert_eq!(third.get(0).and_then(FieldValue::as_i64), Some(95));
        assert_eq!(third.get(1).and_then(FieldValue::as_str), Some("ZABD"));
    }

    #[test]
    fn test_decode_tail_field() {
        let template = Template::new(
            3,
            "Ref",
            vec![FieldInstruction::new("Symbol", FieldType::Ascii).with_operator(Operator::Tail)],
        );
        let mut encoder = FastEncoder::new();
        encoder.encode_pmap(&PresenceMap::from_bits(&[true, true]));
        encoder.encode_uint(3);
        encoder.encode_ascii("ABCD");
        encoder.encode_pmap(&PresenceMap::from_bits(&[false, true]));
        encoder.encode_ascii("XY");
        encoder.encode_pmap(&PresenceMap::from_bits(&[false, false]));
        let bytes = encoder.finish();

        let mut decoder = decoder_with(template);
        let mut stream = FastStream::new(&bytes);
        let values: Vec<String> = (0..3)
            .map(|i| {
                decoder
                    .decode(&mut stream, i == 0)
                    .unwrap()
                    .get(0)
                    .and_then(FieldValue::as_str)
                    .unwrap()
                    .to_string()
            })
            .collect();
        assert_eq!(values, ["ABCD", "ABXY", "ABXY"]);
    }

    #[test]
    fn test_unknown_template() {
        let mut encoder = FastEncoder::new();
        encoder.encode_pmap(&PresenceMap::from_bits(&[true]));
        encoder.encode_uint(99);
        let bytes = encoder.finish();

        let mut decoder = decoder_with(quote_template());
        let mut stream = FastStream::new(&bytes);
        assert_eq!(
            decoder.decode(&mut stream, true).unwrap_err(),
            FastError::UnknownTemplate(99)
        );
    }

    #[test]
    fn test_truncated_message() {
        let mut encoder = FastEncoder::new();
        full_quote(&mut encoder);
        let bytes = encoder.finish();

        let mut decoder = decoder_with(quote_template());
        let mut stream = FastStream::new(&bytes[..bytes.len() - 2]);
        assert_eq!(
            decoder.decode(&mut stream, true).unwrap_err(),
            FastError::UnexpectedEof
        );
    }

    #[test]
    fn test_include_rejects_invalid_template() {
        let template = Template::new(
            4,
            "Bad",
            vec![FieldInstruction::new("Px", FieldType::Decimal).with_operator(Operator::Increment)],
        );
        let mut decoder = FastDecoder::new();
        assert!(decoder.include([template]).is_err());
        assert!(decoder.template(4).is_none());
    }
}
