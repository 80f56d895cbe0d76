//! Type-safe price representation using decimal arithmetic.
//!
//! All monetary values in the storefront are [`Decimal`]s. Chilean pesos have
//! no minor unit, so display formatting rounds to whole pesos while tax and
//! totals keep two decimal places internally.

use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., pesos, dollars).
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

    /// Create a price in Chilean pesos.
    #[must_use]
    pub const fn clp(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::CLP)
    }

    /// Format for display in the currency's locale (e.g., `$50.000`).
    #[must_use]
    pub fn display(&self) -> String {
        let format = self.currency_code.format();
        let rounded = self
            .amount
            .round_dp_with_strategy(format.decimals, RoundingStrategy::MidpointAwayFromZero);
        let digits = format!("{:.*}", format.decimals as usize, rounded.abs());
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), ""));

        let mut out = String::with_capacity(digits.len() + 4);
        if rounded.is_sign_negative() && !rounded.is_zero() {
            out.push('-');
        }
        out.push_str(format.symbol);
        out.push_str(&group_thousands(whole, format.group_separator));
        if !fraction.is_empty() {
            out.push(format.decimal_separator);
            out.push_str(fraction);
        }
        out
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    CLP,
    USD,
}

struct CurrencyFormat {
    symbol: &'static str,
    decimals: u32,
    group_separator: char,
    decimal_separator: char,
}

impl CurrencyCode {
    /// Currency symbol used in display strings.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::CLP | Self::USD => "$",
        }
    }

    /// ISO 4217 code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::CLP => "CLP",
            Self::USD => "USD",
        }
    }

    const fn format(self) -> CurrencyFormat {
        match self {
            // es-CL: `$1.234.567`
            Self::CLP => CurrencyFormat {
                symbol: "$",
                decimals: 0,
                group_separator: '.',
                decimal_separator: ',',
            },
            // en-US: `$1,234.56`
            Self::USD => CurrencyFormat {
                symbol: "$",
                decimals: 2,
                group_separator: ',',
                decimal_separator: '.',
            },
        }
    }
}

fn group_thousands(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clp_groups_with_dots_and_drops_decimals() {
        assert_eq!(Price::clp(Decimal::new(50_000, 0)).display(), "$50.000");
        assert_eq!(Price::clp(Decimal::new(1_234_567, 0)).display(), "$1.234.567");
        assert_eq!(Price::clp(Decimal::new(999, 0)).display(), "$999");
        assert_eq!(Price::clp(Decimal::ZERO).display(), "$0");
    }

    #[test]
    fn test_clp_rounds_half_away_from_zero() {
        assert_eq!(Price::clp(Decimal::new(12_4995, 1)).display(), "$12.500");
        assert_eq!(Price::clp(Decimal::new(15, 1)).display(), "$2");
    }

    #[test]
    fn test_usd_keeps_cents() {
        let price = Price::new(Decimal::new(123_456_78, 2), CurrencyCode::USD);
        assert_eq!(price.to_string(), "$123,456.78");
    }

    #[test]
    fn test_negative_amounts_carry_sign() {
        assert_eq!(Price::clp(Decimal::new(-1_500, 0)).display(), "-$1.500");
    }

    #[test]
    fn test_default_currency_is_clp() {
        assert_eq!(CurrencyCode::default().code(), "CLP");
    }
}
