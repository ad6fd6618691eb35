/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # FastBench FAST
//!
//! A compact FAST (FIX Adapted for Streaming) codec used as the decoding
//! workload of the `fastbench` replay harness.
//!
//! ## Features
//!
//! - **Replay stream**: Forward-only cursor with header skip and end detection
//! - **Stop-bit encoding**: Integer, string and byte vector primitives
//! - **Presence maps**: Track which fields are present in the stream
//! - **Field operators**: Constant, Default, Copy, Increment, Delta and Tail
//! - **Templates**: Compiled-in message descriptions bound once per decoder

pub mod decoder;
pub mod dictionary;
pub mod encoder;
pub mod error;
pub mod operators;
pub mod pmap;
pub mod stream;
pub mod template;

pub use decoder::{DecodedMessage, FastDecoder};
pub use dictionary::Dictionary;
pub use encoder::FastEncoder;
pub use error::FastError;
pub use operators::{DictionaryScope, DictionaryValue, FieldValue, Operator};
pub use pmap::PresenceMap;
pub use stream::FastStream;
pub use template::{FieldInstruction, FieldType, Presence, Template};
