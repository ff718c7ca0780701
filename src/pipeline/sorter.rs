//! Column sorting for price table rows.

use crate::appstore::TableRow;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Sortable table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    OriginalCurrency,
    OriginalCost,
    #[default]
    ConvertedCost,
    Countries,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "currency" | "original_currency" => Ok(SortKey::OriginalCurrency),
            "cost" | "original" | "original_cost" => Ok(SortKey::OriginalCost),
            "converted" | "converted_cost" => Ok(SortKey::ConvertedCost),
            "countries" | "country" => Ok(SortKey::Countries),
            _ => Err(format!("Unknown sort key: {}. Use: currency, cost, converted, countries", s)),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::OriginalCurrency => write!(f, "currency"),
            SortKey::OriginalCost => write!(f, "cost"),
            SortKey::ConvertedCost => write!(f, "converted"),
            SortKey::Countries => write!(f, "countries"),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// Returns the opposite direction.
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            _ => Err(format!("Unknown sort direction: {}. Use: asc, desc", s)),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Ascending => write!(f, "asc"),
            SortDirection::Descending => write!(f, "desc"),
        }
    }
}

/// Active sort column and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortState {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortState {
    /// Creates a sort state.
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Handles a click on a column header: the active column flips direction, any
    /// other column starts ascending.
    pub fn request(&mut self, key: SortKey) {
        if self.key == key {
            self.direction = self.direction.flipped();
        } else {
            self.key = key;
            self.direction = SortDirection::Ascending;
        }
    }
}

/// Orders table rows by a column.
pub struct TableSorter;

impl TableSorter {
    /// Returns a sorted copy of the rows; the input is left untouched.
    pub fn sort(rows: &[TableRow], state: SortState) -> Vec<TableRow> {
        let mut sorted = rows.to_vec();
        sorted.sort_by(|a, b| {
            let ordering = Self::compare(a, b, state.key);
            match state.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
        sorted
    }

    fn compare(a: &TableRow, b: &TableRow, key: SortKey) -> Ordering {
        match key {
            SortKey::OriginalCurrency => {
                a.original_currency.to_lowercase().cmp(&b.original_currency.to_lowercase())
            }
            SortKey::OriginalCost => {
                a.original_cost.unwrap_or(0.0).total_cmp(&b.original_cost.unwrap_or(0.0))
            }
            // Absent conversions compare as zero.
            SortKey::ConvertedCost => {
                a.converted_cost.unwrap_or(0.0).total_cmp(&b.converted_cost.unwrap_or(0.0))
            }
            SortKey::Countries => {
                a.first_country().to_lowercase().cmp(&b.first_country().to_lowercase())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(currency: &str, cost: f64, converted: Option<f64>, countries: &[&str]) -> TableRow {
        TableRow {
            id: format!("App|{}|{}", currency, cost),
            product: "App".to_string(),
            original_cost: Some(cost),
            original_currency: currency.to_string(),
            converted_cost: converted,
            target_currency: "USD".to_string(),
            countries: countries.iter().map(|c| c.to_string()).collect(),
        }
    }

    fn sample_rows() -> Vec<TableRow> {
        vec![
            row("EUR", 9.99, Some(10.86), &["DE", "FR"]),
            row("usd", 10.99, Some(10.99), &["US"]),
            row("JPY", 1500.0, Some(9.80), &["JP"]),
            row("XYZ", 3.0, None, &[]),
        ]
    }

    fn currencies(rows: &[TableRow]) -> Vec<&str> {
        rows.iter().map(|r| r.original_currency.as_str()).collect()
    }

    #[test]
    fn test_sort_by_original_cost_ascending() {
        let sorted = TableSorter::sort(
            &sample_rows(),
            SortState::new(SortKey::OriginalCost, SortDirection::Ascending),
        );
        assert_eq!(currencies(&sorted), vec!["XYZ", "EUR", "usd", "JPY"]);
    }

    #[test]
    fn test_descending_is_exact_reverse() {
        let rows = sample_rows();
        let asc = TableSorter::sort(
            &rows,
            SortState::new(SortKey::OriginalCost, SortDirection::Ascending),
        );
        let mut desc = TableSorter::sort(
            &rows,
            SortState::new(SortKey::OriginalCost, SortDirection::Descending),
        );
        desc.reverse();
        assert_eq!(asc, desc);
    }

    #[test]
    fn test_converted_absent_sorts_as_zero() {
        let sorted = TableSorter::sort(&sample_rows(), SortState::default());
        assert_eq!(currencies(&sorted), vec!["XYZ", "JPY", "EUR", "usd"]);
    }

    #[test]
    fn test_currency_sort_case_insensitive() {
        let sorted = TableSorter::sort(
            &sample_rows(),
            SortState::new(SortKey::OriginalCurrency, SortDirection::Ascending),
        );
        assert_eq!(currencies(&sorted), vec!["EUR", "JPY", "usd", "XYZ"]);
    }

    #[test]
    fn test_countries_sort_uses_first_code() {
        let mut rows = sample_rows();
        rows.push(row("GBP", 8.99, Some(11.0), &["gb"]));

        let sorted =
            TableSorter::sort(&rows, SortState::new(SortKey::Countries, SortDirection::Ascending));
        assert_eq!(currencies(&sorted), vec!["XYZ", "EUR", "GBP", "JPY", "usd"]);
    }

    #[test]
    fn test_sort_does_not_mutate_input() {
        let rows = sample_rows();
        let before = rows.clone();
        let _ =
            TableSorter::sort(&rows, SortState::new(SortKey::Countries, SortDirection::Descending));
        assert_eq!(rows, before);
    }

    #[test]
    fn test_request_toggles_direction() {
        let mut state = SortState::new(SortKey::OriginalCost, SortDirection::Ascending);

        state.request(SortKey::OriginalCost);
        assert_eq!(state, SortState::new(SortKey::OriginalCost, SortDirection::Descending));

        state.request(SortKey::OriginalCost);
        assert_eq!(state.direction, SortDirection::Ascending);
    }

    #[test]
    fn test_request_new_key_resets_ascending() {
        let mut state = SortState::new(SortKey::OriginalCost, SortDirection::Descending);
        state.request(SortKey::Countries);
        assert_eq!(state, SortState::new(SortKey::Countries, SortDirection::Ascending));
    }

    #[test]
    fn test_default_state() {
        let state = SortState::default();
        assert_eq!(state.key, SortKey::ConvertedCost);
        assert_eq!(state.direction, SortDirection::Ascending);
    }

    #[test]
    fn test_sort_key_parsing() {
        assert_eq!("currency".parse::<SortKey>().unwrap(), SortKey::OriginalCurrency);
        assert_eq!("COST".parse::<SortKey>().unwrap(), SortKey::OriginalCost);
        assert_eq!("converted".parse::<SortKey>().unwrap(), SortKey::ConvertedCost);
        assert_eq!("countries".parse::<SortKey>().unwrap(), SortKey::Countries);

        let err = "price".parse::<SortKey>().unwrap_err();
        assert!(err.contains("Unknown sort key"));
    }

    #[test]
    fn test_sort_key_display_roundtrip() {
        for key in [
            SortKey::OriginalCurrency,
            SortKey::OriginalCost,
            SortKey::ConvertedCost,
            SortKey::Countries,
        ] {
            assert_eq!(key.to_string().parse::<SortKey>().unwrap(), key);
        }
    }

    #[test]
    fn test_sort_direction_parsing() {
        assert_eq!("asc".parse::<SortDirection>().unwrap(), SortDirection::Ascending);
        assert_eq!("DESC".parse::<SortDirection>().unwrap(), SortDirection::Descending);
        assert!("up".parse::<SortDirection>().is_err());
    }
}
