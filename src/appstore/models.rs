//! Data models for scraped App Store prices and the derived table rows.

use serde::Serialize;
use serde_json::{Map, Value};

/// Keys injected by a passthrough HTTP-function response envelope.
pub const SENTINEL_KEYS: [&str; 2] = ["statusCode", "headers"];

/// One regional price point as reported by the scraper.
///
/// Every field is optional because the scraper output is loosely typed; a missing
/// field never causes the entry to be dropped.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PriceEntry {
    /// Product name (in-app purchase tier or the app itself)
    pub product: Option<String>,
    /// ISO-4217 currency code
    pub currency: Option<String>,
    /// Price in `currency`
    pub cost: Option<f64>,
    /// Storefront country codes charging this price
    pub countries: Vec<String>,
}

impl PriceEntry {
    /// Reads an entry from a JSON value. Returns `None` only when the value is not an
    /// object.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;

        let product = obj
            .get("product")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let currency = obj.get("currency").and_then(Value::as_str).map(str::to_string);

        let cost = obj.get("cost").and_then(|c| match c {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        });

        let countries = obj
            .get("countries")
            .and_then(Value::as_array)
            .map(|list| list.iter().filter_map(Value::as_str).map(str::to_string).collect())
            .unwrap_or_default();

        Some(Self { product, currency, cost, countries })
    }
}

/// The scraper payload after envelope unwrapping: product name -> entries.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawPayload {
    groups: Map<String, Value>,
}

impl RawPayload {
    /// Wraps an already unwrapped product mapping.
    pub fn new(groups: Map<String, Value>) -> Self {
        Self { groups }
    }

    /// Unwraps the response body of the scraper.
    ///
    /// Accepts either the payload itself or an envelope `{ "body": {...} }`. A `body`
    /// holding a JSON-encoded object string is decoded as well.
    pub fn from_response(value: Value) -> Result<Self, String> {
        let Value::Object(mut obj) = value else {
            return Err(format!("expected a JSON object, got {}", json_kind(&value)));
        };

        match obj.remove("body") {
            Some(Value::Object(inner)) => Ok(Self::new(inner)),
            Some(Value::String(text)) => match serde_json::from_str::<Value>(&text) {
                Ok(Value::Object(inner)) => Ok(Self::new(inner)),
                _ => {
                    obj.insert("body".to_string(), Value::String(text));
                    Ok(Self::new(obj))
                }
            },
            Some(other) => {
                obj.insert("body".to_string(), other);
                Ok(Self::new(obj))
            }
            None => Ok(Self::new(obj)),
        }
    }

    /// Iterates the product groups, skipping sentinel keys and non-array values.
    pub fn groups(&self) -> impl Iterator<Item = (&str, &[Value])> {
        self.groups.iter().filter_map(|(key, value)| {
            if SENTINEL_KEYS.contains(&key.as_str()) {
                return None;
            }
            value.as_array().map(|entries| (key.as_str(), entries.as_slice()))
        })
    }

    /// Returns true if the payload holds no keys at all.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// One row of the price table: a unique product + currency + cost combination.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    /// Composite key `product|currency|cost`
    pub id: String,
    /// Product name
    pub product: String,
    /// Price in the storefront currency
    pub original_cost: Option<f64>,
    /// Storefront currency code
    pub original_currency: String,
    /// Price in the target currency; `None` when no rate was available
    pub converted_cost: Option<f64>,
    /// Currency the price was converted into
    pub target_currency: String,
    /// Storefront countries, deduplicated and sorted
    pub countries: Vec<String>,
}

impl TableRow {
    /// Returns the first country code, or "" when the row has none.
    pub fn first_country(&self) -> &str {
        self.countries.first().map(String::as_str).unwrap_or("")
    }
}

/// The result of one reconciliation cycle.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PriceTable {
    /// All rows, ordered by composite key
    pub rows: Vec<TableRow>,
    /// Distinct product names, sorted
    pub products: Vec<String>,
}

impl PriceTable {
    /// Returns the rows belonging to one product.
    pub fn rows_for(&self, product: &str) -> Vec<TableRow> {
        self.rows.iter().filter(|r| r.product == product).cloned().collect()
    }

    /// Returns true if the product exists in this table.
    pub fn has_product(&self, product: &str) -> bool {
        self.products.iter().any(|p| p == product)
    }

    /// Returns true if no rows were produced.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entry_from_value_full() {
        let entry = PriceEntry::from_value(&json!({
            "product": "Pro Monthly",
            "currency": "EUR",
            "cost": 9.99,
            "countries": ["DE", "FR"]
        }))
        .unwrap();

        assert_eq!(entry.product.as_deref(), Some("Pro Monthly"));
        assert_eq!(entry.currency.as_deref(), Some("EUR"));
        assert_eq!(entry.cost, Some(9.99));
        assert_eq!(entry.countries, vec!["DE", "FR"]);
    }

    #[test]
    fn test_entry_from_value_missing_fields() {
        let entry = PriceEntry::from_value(&json!({ "countries": ["US", 3, null] })).unwrap();
        assert!(entry.product.is_none());
        assert!(entry.currency.is_none());
        assert!(entry.cost.is_none());
        assert_eq!(entry.countries, vec!["US"]);
    }

    #[test]
    fn test_entry_from_value_string_cost() {
        let entry = PriceEntry::from_value(&json!({ "cost": " 4.49 " })).unwrap();
        assert_eq!(entry.cost, Some(4.49));

        let entry = PriceEntry::from_value(&json!({ "cost": "free" })).unwrap();
        assert!(entry.cost.is_none());
    }

    #[test]
    fn test_entry_from_value_empty_product_is_none() {
        let entry = PriceEntry::from_value(&json!({ "product": "" })).unwrap();
        assert!(entry.product.is_none());
    }

    #[test]
    fn test_entry_from_non_object() {
        assert!(PriceEntry::from_value(&json!(42)).is_none());
        assert!(PriceEntry::from_value(&json!("AppX")).is_none());
    }

    #[test]
    fn test_unwrap_plain_payload() {
        let payload = RawPayload::from_response(json!({ "App A": [] })).unwrap();
        let keys: Vec<_> = payload.groups().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["App A"]);
    }

    #[test]
    fn test_unwrap_body_envelope() {
        let wrapped = RawPayload::from_response(json!({
            "statusCode": 200,
            "headers": { "content-type": "application/json" },
            "body": { "App A": [{ "currency": "USD", "cost": 1.0, "countries": ["US"] }] }
        }))
        .unwrap();
        let plain = RawPayload::from_response(json!({
            "App A": [{ "currency": "USD", "cost": 1.0, "countries": ["US"] }]
        }))
        .unwrap();

        assert_eq!(wrapped, plain);
    }

    #[test]
    fn test_unwrap_string_body_envelope() {
        let payload = RawPayload::from_response(json!({
            "statusCode": 200,
            "body": "{\"App A\": []}"
        }))
        .unwrap();
        let keys: Vec<_> = payload.groups().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["App A"]);
    }

    #[test]
    fn test_non_object_body_stays_in_payload() {
        let payload = RawPayload::from_response(json!({ "body": [], "App A": [] })).unwrap();
        let keys: Vec<_> = payload.groups().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["App A", "body"]);
    }

    #[test]
    fn test_non_object_response_rejected() {
        let err = RawPayload::from_response(json!([1, 2])).unwrap_err();
        assert!(err.contains("an array"));
    }

    #[test]
    fn test_groups_skip_sentinels_and_non_arrays() {
        let payload = RawPayload::from_response(json!({
            "statusCode": [],
            "headers": [],
            "App A": [],
            "note": "hello",
            "count": 3
        }))
        .unwrap();

        let keys: Vec<_> = payload.groups().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["App A"]);
    }

    #[test]
    fn test_first_country() {
        let mut row = TableRow {
            id: "A|USD|1".to_string(),
            product: "A".to_string(),
            original_cost: Some(1.0),
            original_currency: "USD".to_string(),
            converted_cost: Some(1.0),
            target_currency: "USD".to_string(),
            countries: vec!["CA".to_string(), "US".to_string()],
        };
        assert_eq!(row.first_country(), "CA");

        row.countries.clear();
        assert_eq!(row.first_country(), "");
    }
}
