use std::cmp::Reverse;

use super::budget::Budget;
use crate::listings::PropertyRecord;

/// Records shown per page when viewing all results.
pub const PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    PriceAscending,
    PriceDescending,
    SquareFootageDescending,
}

impl SortOrder {
    pub const ALL: [SortOrder; 3] = [
        SortOrder::PriceAscending,
        SortOrder::PriceDescending,
        SortOrder::SquareFootageDescending,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SortOrder::PriceAscending => "Price (low to high)",
            SortOrder::PriceDescending => "Price (high to low)",
            SortOrder::SquareFootageDescending => "Square footage (largest first)",
        }
    }

    /// Maps the numbered sort menu choice.
    pub fn from_choice(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(SortOrder::PriceAscending),
            "2" => Some(SortOrder::PriceDescending),
            "3" => Some(SortOrder::SquareFootageDescending),
            _ => None,
        }
    }
}

/// Budget-filtered records for the current search. Replaced wholesale by a
/// new search and otherwise only reordered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    records: Vec<PropertyRecord>,
}

impl ResultSet {
    pub fn within_budget(records: Vec<PropertyRecord>, budget: Budget) -> Self {
        Self {
            records: records
                .into_iter()
                .filter(|record| budget.allows(record.price))
                .collect(),
        }
    }

    pub fn filter_by_budget(&self, budget: Budget) -> Self {
        Self::within_budget(self.records.clone(), budget)
    }

    /// Stable sort on the chosen key.
    pub fn sort(&mut self, order: SortOrder) {
        match order {
            SortOrder::PriceAscending => self.records.sort_by_key(|record| record.price),
            SortOrder::PriceDescending => self.records.sort_by_key(|record| Reverse(record.price)),
            SortOrder::SquareFootageDescending => self
                .records
                .sort_by_key(|record| Reverse(record.square_footage)),
        }
    }

    pub fn records(&self) -> &[PropertyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn pages(&self) -> std::slice::Chunks<'_, PropertyRecord> {
        self.records.chunks(PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn record(price: u64, square_footage: u32) -> PropertyRecord {
        PropertyRecord {
            address: format!("{price} Test Way"),
            price,
            bedrooms: 2.0,
            bathrooms: 1.0,
            square_footage,
            year_built: None,
            neighborhood: String::new(),
            property_type: "Condo".to_string(),
            listing_id: price.to_string(),
            city: "Spokane".to_string(),
            state: "WA".to_string(),
            zip_code: "99201".to_string(),
            last_updated: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn prices(set: &ResultSet) -> Vec<u64> {
        set.records().iter().map(|r| r.price).collect()
    }

    #[test]
    fn keeps_only_records_at_or_under_budget() {
        let budget = Budget::new(400_000).unwrap();
        let set = ResultSet::within_budget(
            vec![record(399_999, 1), record(400_000, 1), record(400_001, 1)],
            budget,
        );
        assert_eq!(prices(&set), vec![399_999, 400_000]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let budget = Budget::new(500_000).unwrap();
        let once = ResultSet::within_budget(
            vec![record(650_000, 1), record(120_000, 1), record(500_000, 1)],
            budget,
        );
        let twice = once.filter_by_budget(budget);
        assert_eq!(once, twice);
    }

    #[test]
    fn ascending_then_descending_reverses_distinct_prices() {
        let budget = Budget::new(2_000_000).unwrap();
        let mut set = ResultSet::within_budget(
            vec![record(300_000, 1), record(100_000, 1), record(200_000, 1), record(250_000, 1)],
            budget,
        );
        set.sort(SortOrder::PriceAscending);
        let ascending = prices(&set);
        assert_eq!(ascending, vec![100_000, 200_000, 250_000, 300_000]);

        set.sort(SortOrder::PriceDescending);
        let mut reversed = ascending.clone();
        reversed.reverse();
        assert_eq!(prices(&set), reversed);
    }

    #[test]
    fn square_footage_sort_is_largest_first_and_stable() {
        let budget = Budget::new(2_000_000).unwrap();
        let mut set = ResultSet::within_budget(
            vec![record(1, 900), record(2, 2400), record(3, 900), record(4, 1500)],
            budget,
        );
        set.sort(SortOrder::SquareFootageDescending);
        assert_eq!(prices(&set), vec![2, 4, 1, 3]);
    }

    #[test]
    fn pages_hold_ten_records() {
        let budget = Budget::new(2_000_000).unwrap();
        let set = ResultSet::within_budget((1..=23).map(|n| record(n, 1)).collect(), budget);
        let sizes: Vec<usize> = set.pages().map(<[PropertyRecord]>::len).collect();
        assert_eq!(sizes, vec![10, 10, 3]);
    }

    #[test]
    fn sort_menu_choices_map_to_orders() {
        assert_eq!(SortOrder::from_choice("1"), Some(SortOrder::PriceAscending));
        assert_eq!(SortOrder::from_choice(" 3 "), Some(SortOrder::SquareFootageDescending));
        assert_eq!(SortOrder::from_choice("4"), None);
    }
}
