//! Market classification for free-text stock queries
//!
//! A query is sorted into one of three classes before resolution: a foreign
//! ticker (pure uppercase Latin, at most five letters), a foreign company
//! name (Latin letters and a few punctuation characters), or a domestic name
//! (everything else, which covers Hangul and mixed scripts).

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static TICKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{1,5}$").expect("hardcoded regex"));

static LATIN_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z\s.\-&]+$").expect("hardcoded regex"));

/// Which market a resolved symbol trades on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Market {
    /// Korean exchange, resolved via the local listing table
    Domestic,
    /// Everything else, resolved via the quote/search service
    Foreign,
}

/// Classification of a raw user query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketClass {
    /// Non-Latin company name, e.g. "삼성전자"
    DomesticName,
    /// Uppercase ticker, e.g. "AAPL"
    ForeignTicker,
    /// Latin company name, e.g. "Apple"
    ForeignName,
}

impl MarketClass {
    /// The market a query of this class resolves against
    pub fn market(self) -> Market {
        match self {
            Self::DomesticName => Market::Domestic,
            Self::ForeignTicker | Self::ForeignName => Market::Foreign,
        }
    }
}

/// A trimmed, classified query ready for resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedQuery {
    pub class: MarketClass,
    pub query: String,
}

/// Classify a raw query string. Total function: every input maps to a class.
///
/// Rules are checked in order, first match wins:
/// 1. `^[A-Z]{1,5}$` → [`MarketClass::ForeignTicker`], normalized uppercase
/// 2. `^[A-Za-z\s.\-&]+$` → [`MarketClass::ForeignName`], unmodified
/// 3. anything else → [`MarketClass::DomesticName`], unmodified
pub fn classify(raw: &str) -> ClassifiedQuery {
    let query = raw.trim();

    if TICKER_RE.is_match(query) {
        return ClassifiedQuery {
            class: MarketClass::ForeignTicker,
            query: query.to_uppercase(),
        };
    }

    if LATIN_NAME_RE.is_match(query) {
        return ClassifiedQuery {
            class: MarketClass::ForeignName,
            query: query.to_string(),
        };
    }

    ClassifiedQuery {
        class: MarketClass::DomesticName,
        query: query.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticker_detection() {
        for q in ["AAPL", "A", "GOOGL", "  TSLA  "] {
            let c = classify(q);
            assert_eq!(c.class, MarketClass::ForeignTicker, "query: {q}");
            assert_eq!(c.query, q.trim());
        }
    }

    #[test]
    fn test_ticker_length_limit() {
        // Six uppercase letters no longer look like a ticker
        assert_eq!(classify("GOOGLE").class, MarketClass::ForeignName);
    }

    #[test]
    fn test_latin_name_detection() {
        for q in ["Apple", "Berkshire Hathaway", "Johnson & Johnson", "AT&T Inc.", "Coca-Cola"] {
            assert_eq!(classify(q).class, MarketClass::ForeignName, "query: {q}");
            assert_eq!(classify(q).query, q);
        }
    }

    #[test]
    fn test_domestic_detection() {
        for q in ["삼성전자", "SK하이닉스", "카카오", "LG화학", "005930"] {
            assert_eq!(classify(q).class, MarketClass::DomesticName, "query: {q}");
        }
    }

    #[test]
    fn test_mixed_case_latin_is_name_not_ticker() {
        assert_eq!(classify("Aapl").class, MarketClass::ForeignName);
    }

    #[test]
    fn test_class_to_market() {
        assert_eq!(MarketClass::DomesticName.market(), Market::Domestic);
        assert_eq!(MarketClass::ForeignTicker.market(), Market::Foreign);
        assert_eq!(MarketClass::ForeignName.market(), Market::Foreign);
    }
}
