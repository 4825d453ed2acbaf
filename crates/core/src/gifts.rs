//! Children's gift wishes and their aggregate tally.
//!
//! The content file is static JSON shipped with the site:
//!
//! ```json
//! { "children": [ { "name": "Olena", "age": 7, "gift": "Sled", "price": 45 } ] }
//! ```
//!
//! Only `gift` is required per child.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::money::format_decimal;

/// One child's wish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildWish {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub age: Option<u8>,
    pub gift: String,
    #[serde(default)]
    pub price: Option<Decimal>,
}

/// Errors reading gift content.
#[derive(Debug, thiserror::Error)]
pub enum GiftContentError {
    #[error("invalid gift content: {0}")]
    Parse(#[from] serde_json::Error),

    /// The summed prices do not fit in a `Decimal`.
    #[error("total gift cost overflows")]
    CostOverflow,
}

/// The parsed content file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftContent {
    pub children: Vec<ChildWish>,
}

impl GiftContent {
    /// Parse the content file.
    ///
    /// # Errors
    ///
    /// Returns [`GiftContentError::Parse`] if the JSON does not match the
    /// expected shape.
    pub fn from_json(json: &str) -> Result<Self, GiftContentError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Number of children waiting for a gift.
    #[must_use]
    pub fn children_count(&self) -> usize {
        self.children.len()
    }

    /// Tally the children's wishes.
    ///
    /// # Errors
    ///
    /// Returns [`GiftContentError::CostOverflow`] if the prices sum past
    /// `Decimal::MAX`.
    pub fn tally(&self) -> Result<GiftTally, GiftContentError> {
        GiftTally::from_children(&self.children)
    }
}

/// Per-gift counts plus totals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GiftTally {
    counts: BTreeMap<String, usize>,
    total_children: usize,
    total_cost: Option<Decimal>,
}

impl GiftTally {
    /// Count gifts by trimmed name. The total cost is the sum of the prices
    /// that are present and stays `None` when no child has a price.
    ///
    /// # Errors
    ///
    /// Returns [`GiftContentError::CostOverflow`] if the sum overflows.
    pub fn from_children(children: &[ChildWish]) -> Result<Self, GiftContentError> {
        let mut tally = Self::default();
        for child in children {
            *tally.counts.entry(child.gift.trim().to_owned()).or_insert(0) += 1;
            tally.total_children += 1;
            if let Some(price) = child.price {
                let total = tally
                    .total_cost
                    .unwrap_or(Decimal::ZERO)
                    .checked_add(price)
                    .ok_or(GiftContentError::CostOverflow)?;
                tally.total_cost = Some(total);
            }
        }
        Ok(tally)
    }

    /// Gift names with their counts, sorted by name.
    pub fn counts(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(gift, count)| (gift.as_str(), *count))
    }

    #[must_use]
    pub fn count_of(&self, gift: &str) -> usize {
        self.counts.get(gift).copied().unwrap_or(0)
    }

    #[must_use]
    pub const fn total_children(&self) -> usize {
        self.total_children
    }

    #[must_use]
    pub const fn total_cost(&self) -> Option<Decimal> {
        self.total_cost
    }

    /// Plain-text report for the terminal.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::from("Gift counts:\n");
        for (gift, count) in self.counts() {
            let _ = writeln!(out, "  {gift}: {count}");
        }
        let _ = writeln!(out, "Total children: {}", self.total_children);
        if let Some(cost) = self.total_cost {
            let _ = writeln!(out, "Total cost: {}", format_decimal(cost));
        }
        out
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_tally_counts_and_total() {
        let content =
            GiftContent::from_json(r#"{"children":[{"gift":"A"},{"gift":"A"},{"gift":"B"}]}"#)
                .unwrap();
        let tally = content.tally().unwrap();

        assert_eq!(tally.count_of("A"), 2);
        assert_eq!(tally.count_of("B"), 1);
        assert_eq!(tally.total_children(), 3);
        assert_eq!(tally.total_cost(), None);

        let report = tally.render();
        assert!(report.contains("A: 2"));
        assert!(report.contains("B: 1"));
        assert!(report.contains("Total children: 3"));
        assert!(!report.contains("Total cost"));
    }

    #[test]
    fn test_counts_are_sorted_by_gift() {
        let content = GiftContent::from_json(
            r#"{"children":[{"gift":"Sled"},{"gift":"Doll"},{"gift":" Sled "},{"gift":"Books"}]}"#,
        )
        .unwrap();
        let tally = content.tally().unwrap();
        let counts: Vec<_> = tally.counts().collect();
        assert_eq!(counts, vec![("Books", 1), ("Doll", 1), ("Sled", 2)]);
    }

    #[test]
    fn test_total_cost_sums_present_prices() {
        let content = GiftContent::from_json(
            r#"{"children":[
                {"name":"Olena","age":7,"gift":"Sled","price":"45.50"},
                {"gift":"Doll","price":20},
                {"gift":"Books"}
            ]}"#,
        )
        .unwrap();
        let tally = content.tally().unwrap();
        assert_eq!(tally.total_cost(), Some(Decimal::new(6550, 2)));
        assert!(tally.render().contains("Total cost: 65.50"));
    }

    #[test]
    fn test_empty_children() {
        let tally = GiftContent::from_json(r#"{"children":[]}"#).unwrap().tally().unwrap();
        assert_eq!(tally.total_children(), 0);
        assert_eq!(tally.render(), "Gift counts:\nTotal children: 0\n");
    }

    #[test]
    fn test_invalid_content_is_an_error() {
        assert!(GiftContent::from_json("not json").is_err());
        assert!(GiftContent::from_json(r#"{"children":[{"name":"no gift"}]}"#).is_err());
    }

    #[test]
    fn test_cost_overflow_is_an_error() {
        let content = GiftContent::from_json(
            r#"{"children":[
                {"gift":"A","price":"79228162514264337593543950335"},
                {"gift":"B","price":"1"}
            ]}"#,
        )
        .unwrap();
        let err = content.tally().unwrap_err();
        assert!(matches!(err, GiftContentError::CostOverflow));
        assert_eq!(err.to_string(), "total gift cost overflows");
    }
}
