//! Price parsing and cart totals.
//!
//! Catalog prices arrive as display strings (`"$4.50"`, `"4.50 Rs."`), so every
//! computation goes through [`numeric_price`], which never fails: a price that
//! cannot be read counts as zero.

use crate::cart_line::CartLine;

/// Fixed sales-tax rate applied to the cart subtotal.
pub const TAX_RATE: f64 = 0.085;

/// Parses a display price into a number.
///
/// Every character other than ASCII digits and `.` is discarded, then the
/// longest prefix that reads as a decimal number is parsed. Anything that
/// yields no number (`"free"`, `""`, `"."`) is `0.0`.
#[must_use]
pub fn numeric_price(raw: &str) -> f64 {
    parse_price(raw).unwrap_or(0.0)
}

/// Like [`numeric_price`], but reports an unreadable price as `None`.
#[must_use]
pub fn parse_price(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    // "4.50." (from "4.50 Rs.") keeps only the part before the second point.
    let numeric = match cleaned.match_indices('.').nth(1) {
        Some((second_point, _)) => &cleaned[..second_point],
        None => cleaned.as_str(),
    };

    numeric.parse::<f64>().ok()
}

/// Derived money figures for a cart snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartTotals {
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
}

impl CartTotals {
    #[must_use]
    pub fn from_lines(lines: &[CartLine]) -> Self {
        let subtotal = lines.iter().map(CartLine::line_total).sum::<f64>();
        Self::from_subtotal(subtotal)
    }

    #[must_use]
    pub fn from_subtotal(subtotal: f64) -> Self {
        let tax = subtotal * TAX_RATE;
        Self {
            subtotal,
            tax,
            total: subtotal + tax,
        }
    }
}

/// Formats an amount with two decimals, the way the storefront displays money.
#[must_use]
pub fn format_amount(amount: f64) -> String {
    format!("{amount:.2}")
}
