use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// One product row lifted from a listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingItem {
    pub name: String,
    pub price: Decimal,
    /// Always absolute (`http`/`https`).
    pub link: String,
}

impl ListingItem {
    pub fn formatted_price(&self) -> String {
        format!("${:.2}", self.price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
    }
}

/// Parse a scraped price such as `12.5`, `$7.99` or `1,299.00`.
///
/// Returns `None` for anything that is not a non-negative decimal.
pub fn parse_price(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    let price = Decimal::from_str(&cleaned).ok()?;
    if price.is_sign_negative() && !price.is_zero() {
        return None;
    }
    Some(price)
}
