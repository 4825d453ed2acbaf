//! Donation amounts using decimal arithmetic.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors produced when parsing a donation amount.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("amount is not a number")]
    NotANumber,
    #[error("amount must be greater than zero")]
    NotPositive,
    #[error("amount must have at most two decimal places")]
    TooPrecise,
    #[error("amount exceeds the maximum of {max}")]
    TooLarge { max: Decimal },
}

/// A strictly positive amount with at most two decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(Decimal);

impl Amount {
    /// Largest single donation accepted through the site.
    pub const MAX: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

    /// Validate a decimal as a donation amount.
    ///
    /// # Errors
    ///
    /// Returns an [`AmountError`] if the value is not positive, has more than
    /// two decimal places, or exceeds [`Amount::MAX`].
    pub fn new(value: Decimal) -> Result<Self, AmountError> {
        if value <= Decimal::ZERO {
            return Err(AmountError::NotPositive);
        }
        if value.normalize().scale() > 2 {
            return Err(AmountError::TooPrecise);
        }
        if value > Self::MAX {
            return Err(AmountError::TooLarge { max: Self::MAX });
        }
        Ok(Self(value))
    }

    /// Parse user input such as `"25"` or `"12.50"`.
    ///
    /// # Errors
    ///
    /// Returns [`AmountError::NotANumber`] for non-numeric input, otherwise
    /// the same errors as [`Amount::new`].
    pub fn parse(input: &str) -> Result<Self, AmountError> {
        let value = Decimal::from_str(input.trim()).map_err(|_| AmountError::NotANumber)?;
        Self::new(value)
    }

    /// The underlying decimal value.
    #[must_use]
    pub const fn value(&self) -> Decimal {
        self.0
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", format_decimal(self.0))
    }
}

/// Format a decimal with exactly two fractional digits.
#[must_use]
pub fn format_decimal(value: Decimal) -> String {
    let mut rounded = value.round_dp(2);
    rounded.rescale(2);
    rounded.to_string()
}

/// ISO 4217 currency codes accepted for donations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    UAH,
}

impl CurrencyCode {
    /// ISO code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::UAH => "UAH",
        }
    }

    /// Display symbol.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::USD => "$",
            Self::EUR => "€",
            Self::UAH => "₴",
        }
    }

    /// Format an amount in this currency (e.g. `$12.50`).
    #[must_use]
    pub fn format(&self, value: Decimal) -> String {
        format!("{}{}", self.symbol(), format_decimal(value))
    }
}

impl std::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for CurrencyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "UAH" => Ok(Self::UAH),
            _ => Err(format!("unsupported currency: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(Amount::parse("25").unwrap().to_string(), "25.00");
        assert_eq!(Amount::parse(" 12.5 ").unwrap().to_string(), "12.50");
        assert_eq!(Amount::parse("abc"), Err(AmountError::NotANumber));
        assert_eq!(Amount::parse("0"), Err(AmountError::NotPositive));
        assert_eq!(Amount::parse("-3"), Err(AmountError::NotPositive));
        assert_eq!(Amount::parse("1.001"), Err(AmountError::TooPrecise));
        assert!(matches!(
            Amount::parse("1000000.01"),
            Err(AmountError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_trailing_zeros_are_not_too_precise() {
        assert!(Amount::parse("10.500").is_ok());
    }

    #[test]
    fn test_currency_format() {
        let value = Decimal::new(1250, 2);
        assert_eq!(CurrencyCode::USD.format(value), "$12.50");
        assert_eq!(CurrencyCode::UAH.format(Decimal::new(3, 0)), "₴3.00");
        assert_eq!("eur".parse::<CurrencyCode>().unwrap(), CurrencyCode::EUR);
        assert!("GBP".parse::<CurrencyCode>().is_err());
    }
}
