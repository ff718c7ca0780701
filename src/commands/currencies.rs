//! Currencies command: lists target currencies, common ones first.

use crate::appstore::currencies::{minor_units, selector_order, COMMON_CURRENCIES};

/// Formats the currency list, marking the active target currency with `*`.
pub fn list_currencies(target_currency: &str) -> String {
    let mut lines = Vec::new();

    lines.push("Supported target currencies:\n".to_string());
    lines.push(format!("  {:<6} {:<10} {}", "Code", "Decimals", "Group"));
    lines.push(format!("  {:-<6} {:-<10} {:-<8}", "", "", ""));

    for code in selector_order() {
        let marker = if code.eq_ignore_ascii_case(target_currency) { "*" } else { " " };
        let group = if COMMON_CURRENCIES.contains(&code) { "common" } else { "" };
        let line = format!("{} {:<6} {:<10} {}", marker, code, minor_units(code), group);
        lines.push(line.trim_end().to_string());
    }

    lines.join("\n")
}
