use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Virtual cash every new portfolio starts with.
pub const STARTING_FUNDS: Decimal = dec!(10000);

/// Minor-unit precision used for all money rounding.
pub const MONEY_DECIMAL_PLACES: u32 = 2;

/// Fallback string for quote fields the provider could not supply.
pub const UNKNOWN_FIELD: &str = "n/a";

/// Sector label used when a holding was stored without one.
pub const UNKNOWN_SECTOR: &str = "Unknown";
