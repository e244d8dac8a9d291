//! Local reference table of domestic (KRX) listings
//!
//! The table is a flat (code, name, exchange) snapshot fetched wholesale from
//! a listing provider and kept on disk as JSON. There is no incremental
//! update: either the snapshot file is loaded as-is, or the whole table is
//! rebuilt from the provider. Building happens once, explicitly, at startup.

use crate::error::{AnalystError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Korean exchange a listed code trades on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Exchange {
    Kospi,
    Kosdaq,
}

impl Exchange {
    /// Yahoo Finance symbol suffix for this exchange
    pub fn symbol_suffix(self) -> &'static str {
        match self {
            Self::Kospi => ".KS",
            Self::Kosdaq => ".KQ",
        }
    }
}

/// One row of the listing table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingEntry {
    /// Exchange-local code, e.g. "005930"
    pub code: String,
    /// Listed company name, e.g. "삼성전자"
    pub name: String,
    pub exchange: Exchange,
}

impl ListingEntry {
    /// Fully-qualified trading symbol, code plus exchange suffix
    pub fn symbol(&self) -> String {
        format!("{}{}", self.code, self.exchange.symbol_suffix())
    }
}

/// Source of a full listing snapshot
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingProvider: Send + Sync {
    /// Fetch the complete current listing. Called once per (re)build.
    async fn fetch_listing(&self) -> Result<Vec<ListingEntry>>;
}

/// In-memory listing table with name lookup
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListingTable {
    entries: Vec<ListingEntry>,
}

impl ListingTable {
    pub fn new(entries: Vec<ListingEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find the entry best matching a company-name query.
    ///
    /// Matching is a case-sensitive substring test against the listed name.
    /// Among matches the shortest name wins, on the theory that the shortest
    /// containing name is the most exact match ("삼성전자" beats "삼성전자우").
    /// Equal-length names tie-break on the lexicographically smallest code so
    /// the result does not depend on provider row order.
    pub fn find_by_name(&self, query: &str) -> Option<&ListingEntry> {
        if query.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .filter(|e| e.name.contains(query))
            .min_by(|a, b| {
                (a.name.chars().count(), &a.code).cmp(&(b.name.chars().count(), &b.code))
            })
    }
}

/// Disk-backed listing snapshot
///
/// `load_or_build` is the explicit initialization step invoked by the
/// composition root; lookups never trigger a fetch on their own.
pub struct ListingStore {
    path: PathBuf,
}

impl ListingStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the snapshot from disk, or build it from the provider when the
    /// snapshot file is absent. A build failure is reported, not retried.
    pub async fn load_or_build(&self, provider: &dyn ListingProvider) -> Result<ListingTable> {
        if self.path.exists() {
            return self.load().await;
        }
        self.rebuild(provider).await
    }

    /// Read and parse the snapshot file.
    pub async fn load(&self) -> Result<ListingTable> {
        let raw = tokio::fs::read(&self.path).await?;
        let table: ListingTable = serde_json::from_slice(&raw)?;
        tracing::info!(
            entries = table.len(),
            path = %self.path.display(),
            "loaded listing snapshot"
        );
        Ok(table)
    }

    /// Fetch a fresh full listing and overwrite the snapshot wholesale.
    pub async fn rebuild(&self, provider: &dyn ListingProvider) -> Result<ListingTable> {
        let entries = provider.fetch_listing().await?;
        if entries.is_empty() {
            return Err(AnalystError::Listing(
                "listing provider returned an empty table".to_string(),
            ));
        }
        let table = ListingTable::new(entries);
        let json = serde_json::to_vec(&table)?;
        tokio::fs::write(&self.path, json).await?;
        tracing::info!(
            entries = table.len(),
            path = %self.path.display(),
            "rebuilt listing snapshot"
        );
        Ok(table)
    }
}
