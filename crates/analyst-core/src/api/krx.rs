//! KRX listing provider
//!
//! Downloads the full Korean market listing (every listed code with its name
//! and exchange) from the KRX open data endpoint. Used only to build the
//! local listing snapshot; lookups run against the snapshot, never this API.

use crate::error::{AnalystError, Result};
use crate::listing::{Exchange, ListingEntry, ListingProvider};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const KRX_DATA_URL: &str = "http://data.krx.co.kr/comm/bldAttendant/getJsonData.cmd";
const LISTING_BLD: &str = "dbms/MDC/STAT/standard/MDCSTAT01901";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
struct KrxListingResponse {
    #[serde(rename = "OutBlock_1", default)]
    rows: Vec<KrxListingRow>,
}

#[derive(Debug, Deserialize)]
struct KrxListingRow {
    /// Short issue code, e.g. "005930"
    #[serde(rename = "ISU_SRT_CD")]
    code: String,
    /// Abbreviated issue name, e.g. "삼성전자"
    #[serde(rename = "ISU_ABBRV")]
    name: String,
    /// Market name: "KOSPI", "KOSDAQ", "KONEX"
    #[serde(rename = "MKT_NM")]
    market: String,
}

/// KRX open data client for the full listing snapshot
pub struct KrxListingClient {
    client: Client,
}

impl KrxListingClient {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client })
    }

    fn map_exchange(market: &str) -> Exchange {
        // Anything that is not the main board maps to the KOSDAQ suffix
        if market.eq_ignore_ascii_case("KOSPI") {
            Exchange::Kospi
        } else {
            Exchange::Kosdaq
        }
    }
}

#[async_trait]
impl ListingProvider for KrxListingClient {
    async fn fetch_listing(&self) -> Result<Vec<ListingEntry>> {
        let params = [
            ("bld", LISTING_BLD),
            ("locale", "ko_KR"),
            ("mktId", "ALL"),
            ("share", "1"),
            ("csvxls_isNo", "false"),
        ];

        let response = self
            .client
            .post(KRX_DATA_URL)
            .form(&params)
            .send()
            .await
            .map_err(|e| AnalystError::Listing(format!("KRX request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AnalystError::Listing(format!("KRX API error {status}")));
        }

        let body: KrxListingResponse = response
            .json()
            .await
            .map_err(|e| AnalystError::Listing(format!("Failed to parse KRX response: {e}")))?;

        tracing::debug!(rows = body.rows.len(), "fetched KRX listing");

        Ok(body
            .rows
            .into_iter()
            .map(|row| ListingEntry {
                exchange: Self::map_exchange(&row.market),
                code: row.code,
                name: row.name,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exchange_mapping() {
        assert_eq!(KrxListingClient::map_exchange("KOSPI"), Exchange::Kospi);
        assert_eq!(KrxListingClient::map_exchange("KOSDAQ"), Exchange::Kosdaq);
        // KONEX and anything unknown fall through to the KOSDAQ suffix
        assert_eq!(KrxListingClient::map_exchange("KONEX"), Exchange::Kosdaq);
        assert_eq!(KrxListingClient::map_exchange(""), Exchange::Kosdaq);
    }

    #[test]
    fn test_response_parsing() {
        let json = r#"{
            "OutBlock_1": [
                {"ISU_SRT_CD": "005930", "ISU_ABBRV": "삼성전자", "MKT_NM": "KOSPI"},
                {"ISU_SRT_CD": "293490", "ISU_ABBRV": "카카오게임즈", "MKT_NM": "KOSDAQ"}
            ]
        }"#;
        let parsed: KrxListingResponse = serde_json::from_str(json).expect("parse");
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.rows[0].code, "005930");
        assert_eq!(parsed.rows[1].market, "KOSDAQ");
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_fetch_listing() {
        let client = KrxListingClient::new().expect("client");
        let entries = client.fetch_listing().await.expect("listing");
        assert!(entries.len() > 1000);
        assert!(entries.iter().any(|e| e.name == "삼성전자"));
    }
}
