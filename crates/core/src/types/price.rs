//! Type-safe price representation using decimal arithmetic.
//!
//! Amounts are kept as [`Decimal`] so totals never drift the way binary
//! floats do. The cart itself treats prices as opaque numbers; [`Price`] only
//! exists to attach a currency when a total is shown to the user.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dinars, not millimes).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a price in the default currency.
    #[must_use]
    pub fn from_amount(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::default())
    }

    /// Amount rounded to the currency's minor units.
    #[must_use]
    pub fn rounded(&self) -> Decimal {
        self.amount.round_dp(self.currency_code.minor_units())
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = self.currency_code.minor_units() as usize;
        write!(
            f,
            "{:.precision$} {}",
            self.rounded(),
            self.currency_code.symbol()
        )
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    /// Tunisian dinar, three minor digits (millimes).
    #[default]
    TND,
    EUR,
    USD,
}

impl CurrencyCode {
    /// Number of fractional digits used when displaying amounts.
    #[must_use]
    pub const fn minor_units(self) -> u32 {
        match self {
            Self::TND => 3,
            Self::EUR | Self::USD => 2,
        }
    }

    /// Display symbol placed after the amount.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::TND => "DT",
            Self::EUR => "EUR",
            Self::USD => "USD",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_pads_to_three_digits_for_dinar() {
        let price = Price::from_amount(Decimal::new(6, 0));
        assert_eq!(price.to_string(), "6.000 DT");
    }

    #[test]
    fn test_display_rounds_to_minor_units() {
        let price = Price::new(Decimal::new(19_999, 3), CurrencyCode::EUR);
        assert_eq!(price.to_string(), "20.00 EUR");
    }

    #[test]
    fn test_rounded_keeps_millimes() {
        let price = Price::from_amount(Decimal::new(3_5004, 4));
        assert_eq!(price.rounded(), Decimal::new(3_500, 3));
    }
}
