pub(crate) mod valuation_calculator;
pub(crate) mod valuation_model;

pub use valuation_calculator::*;
pub use valuation_model::{GainLoss, HoldingValuation};
