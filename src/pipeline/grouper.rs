//! Collapses raw scraper entries into deduplicated, converted table rows.

use crate::appstore::{PriceEntry, PriceTable, RawPayload, TableRow};
use crate::rates::RateSnapshot;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Groups raw price entries by product, currency and cost.
pub struct PriceGrouper<'a> {
    rates: &'a RateSnapshot,
    target_currency: &'a str,
}

/// Row under construction; countries accumulate until the row is finished.
struct PendingRow {
    product: String,
    original_cost: Option<f64>,
    original_currency: String,
    converted_cost: Option<f64>,
    countries: BTreeSet<String>,
}

impl<'a> PriceGrouper<'a> {
    /// Creates a grouper converting into `target_currency` with the given rates.
    pub fn new(rates: &'a RateSnapshot, target_currency: &'a str) -> Self {
        Self { rates, target_currency }
    }

    /// Builds the composite key `product|currency|cost`.
    pub fn composite_key(product: &str, currency: Option<&str>, cost: Option<f64>) -> String {
        let cost = cost.map(|c| c.to_string()).unwrap_or_default();
        format!("{}|{}|{}", product, currency.unwrap_or(""), cost)
    }

    /// Groups every product entry of the payload into table rows.
    pub fn group(&self, payload: &RawPayload) -> PriceTable {
        let mut pending: BTreeMap<String, PendingRow> = BTreeMap::new();
        let mut skipped = 0usize;

        for (group_name, values) in payload.groups() {
            for value in values {
                let Some(entry) = PriceEntry::from_value(value) else {
                    skipped += 1;
                    continue;
                };

                let product = entry.product.clone().unwrap_or_else(|| group_name.to_string());
                let key = Self::composite_key(&product, entry.currency.as_deref(), entry.cost);

                match pending.entry(key) {
                    Entry::Occupied(mut row) => row.get_mut().countries.extend(entry.countries),
                    Entry::Vacant(slot) => {
                        slot.insert(self.new_row(product, entry));
                    }
                }
            }
        }

        if skipped > 0 {
            debug!("Skipped {} malformed price entries", skipped);
        }

        let rows: Vec<TableRow> = pending
            .into_iter()
            .map(|(id, row)| TableRow {
                id,
                product: row.product,
                original_cost: row.original_cost,
                original_currency: row.original_currency,
                converted_cost: row.converted_cost,
                target_currency: self.target_currency.to_string(),
                countries: row.countries.into_iter().collect(),
            })
            .collect();

        let products: BTreeSet<&str> = rows.iter().map(|r| r.product.as_str()).collect();
        let products = products.into_iter().map(str::to_string).collect();

        PriceTable { rows, products }
    }

    fn new_row(&self, product: String, entry: PriceEntry) -> PendingRow {
        let currency = entry.currency.unwrap_or_default();
        let converted_cost = entry.cost.and_then(|cost| self.rates.convert(cost, &currency));

        PendingRow {
            product,
            original_cost: entry.cost,
            original_currency: currency,
            converted_cost,
            countries: entry.countries.into_iter().collect(),
        }
    }
}
