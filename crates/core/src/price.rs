//! Price parsing and currency display.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{LookupError, LookupResult};

/// How prices are rendered for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceFormat {
    /// Currency code printed before the amount.
    pub currency: String,
    /// Thousands separator for the integer part (`None` disables grouping).
    pub group_separator: Option<char>,
    /// Shown instead of the amount when the raw price is not a number.
    pub placeholder: String,
}

impl Default for PriceFormat {
    fn default() -> Self {
        Self {
            currency: "CHF".to_string(),
            group_separator: Some('’'),
            placeholder: "–".to_string(),
        }
    }
}

impl PriceFormat {
    pub fn with_currency(currency: impl Into<String>) -> Self {
        Self {
            currency: currency.into(),
            ..Self::default()
        }
    }

    /// Render `raw` as `"<currency> <amount>"` with exactly two fractional digits.
    ///
    /// Never fails: unparseable input, and amounts too large to carry two
    /// fractional digits, render the placeholder.
    pub fn format(&self, raw: &str) -> String {
        match parse_price(raw).ok().and_then(|value| self.amount(value)) {
            Some(amount) => format!("{} {}", self.currency, amount),
            None => format!("{} {}", self.currency, self.placeholder),
        }
    }

    fn amount(&self, value: Decimal) -> Option<String> {
        let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(2);
        // `rescale` settles for a smaller scale when the mantissa would overflow.
        if rounded.scale() != 2 {
            return None;
        }
        if rounded.is_zero() {
            rounded.set_sign_positive(true);
        }

        let text = rounded.to_string();
        let (sign, digits) = match text.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", text.as_str()),
        };
        let (int_part, frac_part) = digits.split_once('.')?;

        let int_part = match self.group_separator {
            Some(sep) => group_thousands(int_part, sep),
            None => int_part.to_string(),
        };

        Some(format!("{sign}{int_part}.{frac_part}"))
    }
}

/// Parse a raw price (surrounding whitespace ignored).
pub fn parse_price(raw: &str) -> LookupResult<Decimal> {
    let trimmed = raw.trim();
    Decimal::from_str(trimmed).map_err(|_| LookupError::invalid_price(trimmed))
}

/// Format with the default CHF display.
pub fn format_price(raw: &str) -> String {
    PriceFormat::default().format(raw)
}

fn group_thousands(digits: &str, sep: char) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    let lead = digits.len() % 3;
    for (i, ch) in digits.chars().enumerate() {
        if i != 0 && (i + 3 - lead) % 3 == 0 {
            out.push(sep);
        }
        out.push(ch);
    }
    out
}
