//! Output formatting for price tables (table, JSON, markdown, CSV).

use crate::appstore::currencies::minor_units;
use crate::appstore::TableRow;
use crate::config::OutputFormat;
use serde::Serialize;

/// Placeholder for prices that could not be converted.
pub const NOT_AVAILABLE: &str = "N/A";

/// Rows of one product, ready for output.
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    pub product: String,
    pub target_currency: String,
    pub rows: Vec<TableRow>,
}

/// Formats an amount with the currency's usual number of decimals.
pub fn format_amount(amount: f64, currency: &str) -> String {
    let decimals = minor_units(currency);
    if currency.is_empty() {
        format!("{:.decimals$}", amount)
    } else {
        format!("{:.decimals$} {}", amount, currency)
    }
}

fn original_str(row: &TableRow) -> String {
    row.original_cost
        .map(|c| format_amount(c, &row.original_currency))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn converted_str(row: &TableRow) -> String {
    row.converted_cost
        .map(|c| format_amount(c, &row.target_currency))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Formats price tables for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats one or more product views.
    pub fn format_views(&self, views: &[ProductView]) -> String {
        if views.is_empty() {
            return match self.format {
                OutputFormat::Json => "[]".to_string(),
                OutputFormat::Csv => Self::csv_header(),
                _ => "No prices found.".to_string(),
            };
        }

        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(views).unwrap_or_else(|_| "[]".to_string())
            }
            OutputFormat::Table => {
                views.iter().map(Self::table_view).collect::<Vec<_>>().join("\n\n")
            }
            OutputFormat::Markdown => {
                views.iter().map(Self::markdown_view).collect::<Vec<_>>().join("\n\n")
            }
            OutputFormat::Csv => Self::csv_views(views),
        }
    }

    // Table formatting

    fn table_view(view: &ProductView) -> String {
        let currency_width = 8;
        let original_width = 16;
        let converted_width = 16;

        let mut lines = Vec::new();

        lines.push(format!("{} (converted to {})", view.product, view.target_currency));
        lines.push(String::new());
        lines.push(format!(
            "{:<currency_width$}  {:>original_width$}  {:>converted_width$}  {}",
            "Currency", "Original Cost", "Converted Cost", "Countries"
        ));
        lines.push(format!(
            "{:-<currency_width$}  {:-<original_width$}  {:-<converted_width$}  {:-<30}",
            "", "", "", ""
        ));

        for row in &view.rows {
            lines.push(format!(
                "{:<currency_width$}  {:>original_width$}  {:>converted_width$}  {}",
                row.original_currency,
                original_str(row),
                converted_str(row),
                row.countries.join(", ")
            ));
        }

        lines.push(String::new());
        lines.push(format!("Total: {} price points", view.rows.len()));

        lines.join("\n")
    }

    // Markdown formatting

    fn markdown_view(view: &ProductView) -> String {
        let mut lines = Vec::new();

        lines.push(format!("## {}", view.product));
        lines.push(String::new());
        lines.push("| Currency | Original Cost | Converted Cost | Countries |".to_string());
        lines.push("|----------|---------------|----------------|-----------|".to_string());

        for row in &view.rows {
            lines.push(format!(
                "| {} | {} | {} | {} |",
                row.original_currency,
                original_str(row),
                converted_str(row),
                row.countries.join(", ")
            ));
        }

        lines.push(String::new());
        lines.push(format!(
            "*{} price points, converted to {}*",
            view.rows.len(),
            view.target_currency
        ));

        lines.join("\n")
    }

    // CSV formatting

    fn csv_header() -> String {
        "product,currency,original_cost,target_currency,converted_cost,countries".to_string()
    }

    fn csv_views(views: &[ProductView]) -> String {
        let mut lines = vec![Self::csv_header()];

        for view in views {
            for row in &view.rows {
                lines.push(format!(
                    "{},{},{},{},{},{}",
                    Self::csv_escape(&row.product),
                    Self::csv_escape(&row.original_currency),
                    row.original_cost.map(|c| c.to_string()).unwrap_or_default(),
                    Self::csv_escape(&row.target_currency),
                    row.converted_cost.map(|c| c.to_string()).unwrap_or_default(),
                    Self::csv_escape(&row.countries.join(" "))
                ));
            }
        }

        lines.join("\n")
    }

    fn csv_escape(s: &str) -> String {
        if s.contains(',') || s.contains('"') || s.contains('\n') {
            format!("\"{}\"", s.replace('"', "\"\""))
        } else {
            s.to_string()
        }
    }
}
