//! Type-safe price representation using decimal arithmetic.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places shown for money amounts.
pub const MONEY_DECIMAL_PLACES: u32 = 2;

/// Symbol prefixed to displayed amounts. The store sells in US dollars.
pub const CURRENCY_SYMBOL: &str = "$";

/// A price in the store's currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Price {
    /// Amount in dollars, not cents.
    pub amount: Decimal,
}

impl Price {
    /// Create a price from an amount in dollars.
    #[must_use]
    pub const fn from_amount(amount: Decimal) -> Self {
        Self { amount }
    }

    /// The amount rounded to cents, half away from zero.
    #[must_use]
    pub fn rounded(&self) -> Decimal {
        round_money(self.amount)
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!("{CURRENCY_SYMBOL}{:.2}", self.rounded())
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display())
    }
}

/// Round a money amount to two decimal places, half away from zero.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}
