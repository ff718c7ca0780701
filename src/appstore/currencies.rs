//! Currency catalogue for the target-currency selector.

/// Currencies listed first in selectors.
pub const COMMON_CURRENCIES: [&str; 11] =
    ["AUD", "USD", "EUR", "GBP", "CAD", "JPY", "NZD", "SGD", "CHF", "CNY", "INR"];

/// ISO-4217 codes known to the exchange-rate service.
pub const ALL_CURRENCIES: [&str; 162] = [
    "AED", "AFN", "ALL", "AMD", "ANG", "AOA", "ARS", "AUD", "AWG", "AZN", "BAM", "BBD", "BDT",
    "BGN", "BHD", "BIF", "BMD", "BND", "BOB", "BRL", "BSD", "BTN", "BWP", "BYN", "BZD", "CAD",
    "CDF", "CHF", "CLP", "CNY", "COP", "CRC", "CUP", "CVE", "CZK", "DJF", "DKK", "DOP", "DZD",
    "EGP", "ERN", "ETB", "EUR", "FJD", "FKP", "FOK", "GBP", "GEL", "GGP", "GHS", "GIP", "GMD",
    "GNF", "GTQ", "GYD", "HKD", "HNL", "HRK", "HTG", "HUF", "IDR", "ILS", "IMP", "INR", "IQD",
    "IRR", "ISK", "JEP", "JMD", "JOD", "JPY", "KES", "KGS", "KHR", "KID", "KMF", "KRW", "KWD",
    "KYD", "KZT", "LAK", "LBP", "LKR", "LRD", "LSL", "LYD", "MAD", "MDL", "MGA", "MKD", "MMK",
    "MNT", "MOP", "MRU", "MUR", "MVR", "MWK", "MXN", "MYR", "MZN", "NAD", "NGN", "NIO", "NOK",
    "NPR", "NZD", "OMR", "PAB", "PEN", "PGK", "PHP", "PKR", "PLN", "PYG", "QAR", "RON", "RSD",
    "RUB", "RWF", "SAR", "SBD", "SCR", "SDG", "SEK", "SGD", "SHP", "SLE", "SLL", "SOS", "SRD",
    "SSP", "STN", "SYP", "SZL", "THB", "TJS", "TMT", "TND", "TOP", "TRY", "TTD", "TVD", "TWD",
    "TZS", "UAH", "UGX", "USD", "UYU", "UZS", "VES", "VND", "VUV", "WST", "XAF", "XCD", "XDR",
    "XOF", "XPF", "YER", "ZAR", "ZMW", "ZWL",
];

/// Returns the currencies in selector order: common ones first, then the rest.
pub fn selector_order() -> Vec<&'static str> {
    COMMON_CURRENCIES
        .iter()
        .copied()
        .chain(ALL_CURRENCIES.iter().copied().filter(|c| !COMMON_CURRENCIES.contains(c)))
        .collect()
}

/// Returns true if the code is in the catalogue.
pub fn is_known(code: &str) -> bool {
    ALL_CURRENCIES.contains(&code.to_uppercase().as_str())
}

/// Normalizes a currency code to upper case, rejecting anything that is not three
/// ASCII letters.
pub fn normalize(code: &str) -> Option<String> {
    let code = code.trim();
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Some(code.to_ascii_uppercase())
    } else {
        None
    }
}

/// Number of decimal places used when displaying amounts in this currency.
pub fn minor_units(code: &str) -> usize {
    match code.to_uppercase().as_str() {
        "BIF" | "CLP" | "DJF" | "GNF" | "ISK" | "JPY" | "KMF" | "KRW" | "PYG" | "RWF" | "UGX"
        | "VND" | "VUV" | "XAF" | "XOF" | "XPF" => 0,
        "BHD" | "IQD" | "JOD" | "KWD" | "LYD" | "OMR" | "TND" => 3,
        _ => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_order_common_first() {
        let order = selector_order();
        assert_eq!(&order[..COMMON_CURRENCIES.len()], &COMMON_CURRENCIES[..]);
        assert_eq!(order.len(), ALL_CURRENCIES.len());
        assert_eq!(order.iter().filter(|c| **c == "USD").count(), 1);
    }

    #[test]
    fn test_all_currencies_sorted_and_unique() {
        let mut sorted = ALL_CURRENCIES.to_vec();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted, ALL_CURRENCIES.to_vec());
    }

    #[test]
    fn test_is_known() {
        assert!(is_known("usd"));
        assert!(is_known("EUR"));
        assert!(!is_known("XYZ"));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(" eur ").as_deref(), Some("EUR"));
        assert_eq!(normalize("Usd").as_deref(), Some("USD"));
        assert!(normalize("").is_none());
        assert!(normalize("EURO").is_none());
        assert!(normalize("E1R").is_none());
    }

    #[test]
    fn test_minor_units() {
        assert_eq!(minor_units("JPY"), 0);
        assert_eq!(minor_units("krw"), 0);
        assert_eq!(minor_units("KWD"), 3);
        assert_eq!(minor_units("USD"), 2);
        assert_eq!(minor_units("???"), 2);
    }
}
