use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Absolute and percentage change of a position against some reference
/// price. `pct_change` is `None` when the reference price is zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GainLoss {
    pub abs_change: Decimal,
    pub pct_change: Option<Decimal>,
}

/// Full set of display metrics for a single holding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingValuation {
    pub market_value: Decimal,
    pub cost_basis: Decimal,
    pub day_change: GainLoss,
    pub total_change: GainLoss,
}
