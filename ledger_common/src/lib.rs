mod money;

pub mod helpers;
pub mod op;

pub use money::{Money, MoneyConversionError, MINOR_UNITS_PER_UNIT};
