//! Yahoo Finance API client
//!
//! Wraps the `yahoo_finance_api` connector for the three things the analyst
//! needs: trailing price history for charts, ticker validation, and
//! name-to-symbol search.

use crate::error::{AnalystError, Result};
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use yahoo_finance_api as yahoo;

/// Stock quote data point
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    pub adjclose: f64,
}

/// One candidate from a name search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub symbol: String,
    pub short_name: String,
    pub long_name: String,
    /// Instrument type as reported by the provider, e.g. "EQUITY", "ETF"
    pub quote_type: String,
}

impl SearchHit {
    /// Best available display name, falling back through short and long name.
    pub fn display_name(&self, fallback: &str) -> String {
        if !self.short_name.is_empty() {
            self.short_name.clone()
        } else if !self.long_name.is_empty() {
            self.long_name.clone()
        } else {
            fallback.to_string()
        }
    }
}

/// Change over a history window: last close, absolute and percent change
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChangeSummary {
    pub last: f64,
    pub change: f64,
    pub percent: f64,
}

/// Percent return over a window, first close to last close.
pub fn window_return(quotes: &[Quote]) -> Option<f64> {
    let first = quotes.first()?.close;
    let last = quotes.last()?.close;
    if first == 0.0 {
        return None;
    }
    Some((last - first) / first * 100.0)
}

/// Last close versus the previous close. Needs at least two data points.
pub fn change_summary(quotes: &[Quote]) -> Option<ChangeSummary> {
    if quotes.len() < 2 {
        return None;
    }
    let prev = quotes[quotes.len() - 2].close;
    let last = quotes[quotes.len() - 1].close;
    if prev == 0.0 {
        return None;
    }
    let change = last - prev;
    Some(ChangeSummary {
        last,
        change,
        percent: change / prev * 100.0,
    })
}

/// Yahoo Finance API client
pub struct YahooClient {}

impl YahooClient {
    pub fn new() -> Self {
        Self {}
    }

    /// Get historical quotes for a symbol between two instants
    pub async fn history(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Quote>> {
        let provider = yahoo::YahooConnector::new()
            .map_err(|e| AnalystError::Yahoo(e.to_string()))?;

        // Convert chrono DateTime to time OffsetDateTime
        let start_odt = OffsetDateTime::from_unix_timestamp(start.timestamp())
            .map_err(|e| AnalystError::Yahoo(format!("Invalid start timestamp: {e}")))?;
        let end_odt = OffsetDateTime::from_unix_timestamp(end.timestamp())
            .map_err(|e| AnalystError::Yahoo(format!("Invalid end timestamp: {e}")))?;

        let response = provider
            .get_quote_history(symbol, start_odt, end_odt)
            .await
            .map_err(|e| AnalystError::Yahoo(e.to_string()))?;

        let quotes = response
            .quotes()
            .map_err(|e| AnalystError::Yahoo(e.to_string()))?;

        Ok(quotes
            .iter()
            .map(|q| Quote {
                symbol: symbol.to_string(),
                timestamp: DateTime::from_timestamp(q.timestamp as i64, 0)
                    .unwrap_or_else(Utc::now),
                open: q.open,
                high: q.high,
                low: q.low,
                close: q.close,
                volume: q.volume,
                adjclose: q.adjclose,
            })
            .collect())
    }

    /// Get historical quotes for a named trailing range, e.g. "5d", "6mo"
    pub async fn history_range(&self, symbol: &str, range: &str) -> Result<Vec<Quote>> {
        let end = Utc::now();
        let start = match range {
            "1d" => end - chrono::Duration::days(1),
            "5d" => end - chrono::Duration::days(5),
            "1mo" => end - chrono::Duration::days(30),
            "3mo" => end - chrono::Duration::days(90),
            "6mo" => end - chrono::Duration::days(180),
            "1y" => end - chrono::Duration::days(365),
            "ytd" => {
                let year = end.year();
                chrono::NaiveDate::from_ymd_opt(year, 1, 1)
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
                    .map(|d| d.and_utc())
                    .unwrap_or(end)
            },
            _ => return Err(AnalystError::Yahoo(format!("Invalid range: {range}"))),
        };

        self.history(symbol, start, end).await
    }

    /// Search for instruments by free-text name, returning at most `limit` hits
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        let provider = yahoo::YahooConnector::new()
            .map_err(|e| AnalystError::Yahoo(e.to_string()))?;

        let result = provider
            .search_ticker(query)
            .await
            .map_err(|e| AnalystError::Yahoo(e.to_string()))?;

        Ok(result
            .quotes
            .into_iter()
            .take(limit)
            .map(|q| SearchHit {
                symbol: q.symbol,
                short_name: q.short_name,
                long_name: q.long_name,
                quote_type: q.quote_type,
            })
            .collect())
    }
}

impl Default for YahooClient {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for YahooClient {
    fn clone(&self) -> Self {
        Self::new()
    }
}
