//! Supported currencies and their display names

use anyhow::{Result, anyhow};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::fmt;
use std::str::FromStr;

/// Currencies offered by the source and target selectors, in display order.
pub static CURRENCIES: [(&str, &str); 31] = [
    ("AUD", "Australian Dollar"),
    ("BGN", "Bulgarian Lev"),
    ("BRL", "Brazilian Real"),
    ("CAD", "Canadian Dollar"),
    ("CHF", "Swiss Franc"),
    ("CNY", "Chinese Yuan"),
    ("CZK", "Czech Koruna"),
    ("DKK", "Danish Krone"),
    ("EUR", "Euro"),
    ("GBP", "Pound Sterling"),
    ("HKD", "Hong Kong Dollar"),
    ("HUF", "Hungarian Forint"),
    ("IDR", "Indonesian Rupiah"),
    ("ILS", "Israeli New Shekel"),
    ("INR", "Indian Rupee"),
    ("ISK", "Icelandic Krona"),
    ("JPY", "Japanese Yen"),
    ("KRW", "South Korean Won"),
    ("MXN", "Mexican Peso"),
    ("MYR", "Malaysian Ringgit"),
    ("NOK", "Norwegian Krone"),
    ("NZD", "New Zealand Dollar"),
    ("PHP", "Philippine Peso"),
    ("PLN", "Polish Zloty"),
    ("RON", "Romanian Leu"),
    ("SEK", "Swedish Krona"),
    ("SGD", "Singapore Dollar"),
    ("THB", "Thai Baht"),
    ("TRY", "Turkish Lira"),
    ("USD", "US Dollar"),
    ("ZAR", "South African Rand"),
];

/// A code from [`CURRENCIES`]. Cannot hold anything outside the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CurrencyCode {
    code: &'static str,
    name: &'static str,
}

impl CurrencyCode {
    pub const BRL: CurrencyCode = CurrencyCode {
        code: "BRL",
        name: "Brazilian Real",
    };
    pub const USD: CurrencyCode = CurrencyCode {
        code: "USD",
        name: "US Dollar",
    };

    pub fn as_str(&self) -> &'static str {
        self.code
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// All supported codes in table order.
    pub fn all() -> impl Iterator<Item = CurrencyCode> {
        CURRENCIES
            .iter()
            .map(|&(code, name)| CurrencyCode { code, name })
    }
}

impl FromStr for CurrencyCode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::all()
            .find(|c| c.code.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| anyhow!("Unsupported currency code: {wanted}"))
    }
}

impl Serialize for CurrencyCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code)
    }
}

// Config files name currencies by code; the table supplies the `'static` text.
impl<'de> Deserialize<'de> for CurrencyCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        code.parse().map_err(de::Error::custom)
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code)
    }
}

pub fn currency_codes() -> Vec<&'static str> {
    CURRENCIES.iter().map(|(code, _)| *code).collect()
}

/// Display name for `code`, or `code` itself when it is not a supported currency.
pub fn currency_name(code: &str) -> &str {
    CURRENCIES
        .iter()
        .find(|(c, _)| *c == code)
        .map_or(code, |(_, name)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_has_31_well_formed_entries() {
        assert_eq!(CURRENCIES.len(), 31);
        for (code, name) in CURRENCIES.iter() {
            assert_eq!(code.len(), 3);
            assert!(code.chars().all(|c| c.is_ascii_uppercase()), "{code}");
            assert!(!name.is_empty());
        }
    }

    #[test]
    fn test_codes_are_unique_and_stable() {
        let codes = currency_codes();
        assert_eq!(codes, currency_codes());
        let mut sorted = codes.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), 31);
        assert!(codes.contains(&"USD"));
        assert!(codes.contains(&"EUR"));
        assert!(codes.contains(&"BRL"));
    }

    #[test]
    fn test_currency_name_lookup() {
        assert_eq!(currency_name("USD"), "US Dollar");
        assert_eq!(currency_name("EUR"), "Euro");
        assert_eq!(currency_name("BRL"), "Brazilian Real");
    }

    #[test]
    fn test_currency_name_falls_back_to_input() {
        assert_eq!(currency_name("XXX"), "XXX");
        assert_eq!(currency_name("INVALID"), "INVALID");
        assert_eq!(currency_name(""), "");
    }

    #[test]
    fn test_parse_currency_code() {
        let eur: CurrencyCode = "eur".parse().unwrap();
        assert_eq!(eur.as_str(), "EUR");
        assert_eq!(eur.name(), "Euro");
        assert_eq!("BRL".parse::<CurrencyCode>().unwrap(), CurrencyCode::BRL);
        assert_eq!("USD".parse::<CurrencyCode>().unwrap(), CurrencyCode::USD);

        let err = "XYZ".parse::<CurrencyCode>().unwrap_err();
        assert_eq!(err.to_string(), "Unsupported currency code: XYZ");
    }

    #[derive(Debug, Deserialize)]
    struct Pair {
        from: CurrencyCode,
        to: CurrencyCode,
    }

    #[test]
    fn test_currency_code_inside_borrowed_struct() {
        let yaml = String::from("from: eur\nto: JPY\n");
        let pair: Pair = serde_yaml::from_str(&yaml).unwrap();
        drop(yaml);
        assert_eq!(pair.from.as_str(), "EUR");
        assert_eq!(pair.to.name(), "Japanese Yen");

        let err = serde_yaml::from_str::<Pair>("from: EUR\nto: XYZ\n").unwrap_err();
        assert!(err.to_string().contains("Unsupported currency code: XYZ"));
    }

    #[test]
    fn test_currency_code_serde_as_string() {
        let code: CurrencyCode = serde_yaml::from_str("JPY").unwrap();
        assert_eq!(code.as_str(), "JPY");
        assert_eq!(serde_yaml::to_string(&code).unwrap().trim(), "JPY");
        assert!(serde_yaml::from_str::<CurrencyCode>("ABC").is_err());
    }
}
