/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Templates the benchmark binary binds to its decoder.
//!
//! Message files replayed by `fastbench` must be encoded against these.

use fastbench_fast::{DictionaryScope, FieldInstruction, FieldType, FieldValue, Operator, Template};

/// Template id of [`market_data`].
pub const MARKET_DATA_ID: u32 = 1;

/// Template id of [`heartbeat`].
pub const HEARTBEAT_ID: u32 = 2;

/// Market data incremental update.
///
/// Presence map bits after the template id: SeqNum, SendingTime, Symbol,
/// Price, Size. TradeCondition is a nullable string with no operator.
#[must_use]
pub fn market_data() -> Template {
    Template::new(
        MARKET_DATA_ID,
        "MarketData",
        vec![
            FieldInstruction::new("SeqNum", FieldType::UInt32)
                .with_operator(Operator::Increment)
                .with_scope(DictionaryScope::Template),
            FieldInstruction::new("SendingTime", FieldType::Ascii).with_operator(Operator::Copy),
            FieldInstruction::new("Symbol", FieldType::Ascii).with_operator(Operator::Copy),
            FieldInstruction::new("Price", FieldType::Decimal).with_operator(Operator::Copy),
            FieldInstruction::new("Size", FieldType::UInt32)
                .with_operator(Operator::Default)
                .with_initial(FieldValue::UInt(100)),
            FieldInstruction::new("TradeCondition", FieldType::Ascii).optional(),
        ],
    )
}

/// Heartbeat carrying only SendingTime, shared with market data.
#[must_use]
pub fn heartbeat() -> Template {
    Template::new(
        HEARTBEAT_ID,
        "Heartbeat",
        vec![FieldInstruction::new("SendingTime", FieldType::Ascii).with_operator(Operator::Copy)],
    )
}

/// Every template the binary binds.
#[must_use]
pub fn all() -> Vec<Template> {
    vec![market_data(), heartbeat()]
}
