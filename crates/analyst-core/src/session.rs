//! Per-interaction session state
//!
//! One immutable snapshot per resolved instrument. Actions that enrich the
//! session (news report) return a new snapshot instead of mutating shared
//! state; a new search replaces the whole snapshot.

use crate::api::news::NewsArticle;
use crate::resolver::SymbolRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// AI-written news report with the articles it was based on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsReport {
    pub report: String,
    pub articles: Vec<NewsArticle>,
}

/// Immutable session snapshot for the currently analyzed instrument
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub record: SymbolRecord,
    pub news: Option<NewsReport>,
    pub resolved_at: DateTime<Utc>,
}

impl SessionState {
    /// Fresh snapshot for a newly resolved instrument. Any previously cached
    /// report is gone by construction.
    pub fn new(record: SymbolRecord) -> Self {
        Self {
            record,
            news: None,
            resolved_at: Utc::now(),
        }
    }

    /// Snapshot with a news report attached.
    pub fn with_news(&self, report: NewsReport) -> Self {
        Self {
            record: self.record.clone(),
            news: Some(report),
            resolved_at: self.resolved_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::Market;

    fn record() -> SymbolRecord {
        SymbolRecord {
            symbol: "005930.KS".to_string(),
            name: "삼성전자".to_string(),
            market: Market::Domestic,
        }
    }

    #[test]
    fn test_new_state_has_no_report() {
        let state = SessionState::new(record());
        assert!(state.news.is_none());
        assert_eq!(state.record.symbol, "005930.KS");
    }

    #[test]
    fn test_with_news_leaves_original_untouched() {
        let state = SessionState::new(record());
        let enriched = state.with_news(NewsReport {
            report: "리포트".to_string(),
            articles: vec![],
        });
        assert!(state.news.is_none());
        assert_eq!(
            enriched.news.as_ref().map(|n| n.report.as_str()),
            Some("리포트")
        );
        assert_eq!(enriched.record, state.record);
    }
}
