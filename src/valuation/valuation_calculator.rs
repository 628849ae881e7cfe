//! Pure portfolio arithmetic. No I/O in this module; repositories convert
//! stored doubles to `Decimal` before calling in.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::valuation_model::{GainLoss, HoldingValuation};
use crate::constants::MONEY_DECIMAL_PLACES;

/// Rounds a money amount to the currency's minor-unit precision.
/// Uses banker's rounding, matching how stored figures were produced.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp(MONEY_DECIMAL_PLACES)
}

/// Total portfolio value: cash plus the market value of every holding.
///
/// Values from different currencies are summed nominally; the simulation
/// performs no FX conversion.
pub fn portfolio_total<I>(cash: Decimal, positions: I) -> Decimal
where
    I: IntoIterator<Item = (Decimal, i64)>,
{
    let market_value: Decimal = positions
        .into_iter()
        .map(|(price, shares)| price * Decimal::from(shares))
        .sum();

    round_money(cash + market_value)
}

/// Gain/loss of a position against its average cost.
/// A zero cost basis yields no percentage figure.
pub fn gain_loss(avg_cost: Decimal, current_price: Decimal, shares: i64) -> GainLoss {
    change_against(avg_cost, current_price, shares)
}

/// Day change of a position against its opening price.
/// A zero opening price yields no percentage figure.
pub fn day_change(current_price: Decimal, open_price: Decimal, shares: i64) -> GainLoss {
    change_against(open_price, current_price, shares)
}

fn change_against(reference: Decimal, current: Decimal, shares: i64) -> GainLoss {
    let abs_change = round_money((current - reference) * Decimal::from(shares));

    let pct_change = if reference.is_zero() {
        None
    } else {
        Some(round_money((current / reference - Decimal::ONE) * dec!(100)))
    };

    GainLoss {
        abs_change,
        pct_change,
    }
}

/// All display metrics for one holding.
pub fn holding_valuation(
    avg_cost: Decimal,
    current_price: Decimal,
    open_price: Decimal,
    shares: i64,
) -> HoldingValuation {
    HoldingValuation {
        market_value: round_money(current_price * Decimal::from(shares)),
        cost_basis: round_money(avg_cost * Decimal::from(shares)),
        day_change: day_change(current_price, open_price, shares),
        total_change: gain_loss(avg_cost, current_price, shares),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_is_cash_plus_positions() {
        let total = portfolio_total(
            dec!(1000),
            vec![(dec!(150.25), 10), (dec!(20.10), 3)],
        );
        assert_eq!(total, dec!(2562.80));
    }

    #[test]
    fn total_is_order_independent() {
        let a = vec![(dec!(99.99), 7), (dec!(3.33), 11), (dec!(250), 1)];
        let mut b = a.clone();
        b.reverse();

        assert_eq!(
            portfolio_total(dec!(512.12), a),
            portfolio_total(dec!(512.12), b)
        );
    }

    #[test]
    fn total_of_empty_portfolio_is_cash() {
        assert_eq!(portfolio_total(dec!(10000), vec![]), dec!(10000.00));
    }

    #[test]
    fn gain_loss_reports_abs_and_pct() {
        let gl = gain_loss(dec!(100), dec!(150), 10);
        assert_eq!(gl.abs_change, dec!(500.00));
        assert_eq!(gl.pct_change, Some(dec!(50.00)));
    }

    #[test]
    fn gain_loss_guards_zero_cost_basis() {
        let gl = gain_loss(dec!(0), dec!(150), 10);
        assert_eq!(gl.abs_change, dec!(1500.00));
        assert_eq!(gl.pct_change, None);
    }

    #[test]
    fn day_change_uses_open_as_reference() {
        let dc = day_change(dec!(101.50), dec!(100), 4);
        assert_eq!(dc.abs_change, dec!(6.00));
        assert_eq!(dc.pct_change, Some(dec!(1.50)));
    }

    #[test]
    fn day_change_guards_zero_open() {
        assert_eq!(day_change(dec!(5), dec!(0), 2).pct_change, None);
    }

    #[test]
    fn holding_valuation_combines_metrics() {
        let v = holding_valuation(dec!(100), dec!(120), dec!(118), 5);
        assert_eq!(v.market_value, dec!(600.00));
        assert_eq!(v.cost_basis, dec!(500.00));
        assert_eq!(v.total_change.abs_change, dec!(100.00));
        assert_eq!(v.day_change.abs_change, dec!(10.00));
    }

    #[test]
    fn rounding_is_half_even() {
        assert_eq!(round_money(dec!(2.675)), dec!(2.68));
        assert_eq!(round_money(dec!(2.665)), dec!(2.66));
    }
}
