//! Dashboard snapshot loading
//!
//! Each period is published by the reporting ETL as two JSON documents:
//! - `<prefix>-dashboard-data-<period>.json` — store facts
//! - `<prefix>-pl-data-<period>.json`        — per-store cost breakdown
//!
//! Documents are read either from a local directory or over HTTP. The P&L
//! document is optional: without it every cost component defaults to 0.

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::analyzer::{analyze, EfficiencyReport};
use crate::error::{SnapshotError, SnapshotResult};
use crate::period::Period;
use crate::policy::AnalysisPolicy;
use crate::types::{CostDetail, DashboardSnapshot, PlSnapshot, StoreFact};

pub fn dashboard_file_name(dataset: &str, period: &Period) -> String {
    format!("{dataset}-dashboard-data-{period}.json")
}

pub fn pl_file_name(dataset: &str, period: &Period) -> String {
    format!("{dataset}-pl-data-{period}.json")
}

/// Where snapshot documents are read from
#[derive(Clone)]
pub enum SnapshotSource {
    Directory(PathBuf),
    Http { client: Client, base_url: String },
}

impl SnapshotSource {
    pub fn directory(path: impl Into<PathBuf>) -> Self {
        Self::Directory(path.into())
    }

    pub fn http(base_url: impl Into<String>) -> Self {
        Self::http_with_client(Client::new(), base_url)
    }

    pub fn http_with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self::Http {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Directory(dir) => dir.display().to_string(),
            Self::Http { base_url, .. } => base_url.clone(),
        }
    }

    /// Raw document bytes, `None` if the document does not exist
    async fn fetch(&self, name: &str) -> SnapshotResult<Option<Vec<u8>>> {
        match self {
            Self::Directory(dir) => {
                let path = dir.join(name);
                debug!(path = %path.display(), "Reading snapshot file");
                match tokio::fs::read(&path).await {
                    Ok(bytes) => Ok(Some(bytes)),
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                    Err(e) => Err(SnapshotError::Io {
                        path: path.display().to_string(),
                        source: e,
                    }),
                }
            }
            Self::Http { client, base_url } => {
                let url = format!("{base_url}/{name}");
                debug!(url = %url, "Fetching snapshot");
                let resp = client.get(&url).send().await?;
                if resp.status() == StatusCode::NOT_FOUND {
                    return Ok(None);
                }
                let bytes = resp.error_for_status()?.bytes().await?;
                Ok(Some(bytes.to_vec()))
            }
        }
    }

    /// Load and join both documents for one dataset and period
    pub async fn load(&self, dataset: &str, period: &Period) -> SnapshotResult<LoadedSnapshot> {
        let dashboard_name = dashboard_file_name(dataset, period);
        let bytes = self
            .fetch(&dashboard_name)
            .await?
            .ok_or_else(|| SnapshotError::NotFound(dashboard_name.clone()))?;
        let dashboard: DashboardSnapshot = decode(&dashboard_name, &bytes)?;
        check_period(&dashboard_name, dashboard.period.as_deref(), period)?;

        let pl_name = pl_file_name(dataset, period);
        let costs = match self.fetch(&pl_name).await? {
            Some(bytes) => {
                let pl: PlSnapshot = decode(&pl_name, &bytes)?;
                check_period(&pl_name, pl.period.as_deref(), period)?;
                index_costs(pl.stores)
            }
            None => {
                warn!(name = %pl_name, "P&L snapshot missing, cost rates default to 0");
                HashMap::new()
            }
        };

        info!(
            dataset,
            period = %period,
            stores = dashboard.stores.len(),
            cost_rows = costs.len(),
            "Snapshot loaded"
        );

        Ok(LoadedSnapshot {
            dataset: dataset.to_string(),
            period: *period,
            stores: dashboard.stores,
            costs,
        })
    }
}

fn decode<T: DeserializeOwned>(name: &str, bytes: &[u8]) -> SnapshotResult<T> {
    serde_json::from_slice(bytes).map_err(|e| SnapshotError::Parse {
        name: name.to_string(),
        source: e,
    })
}

/// Documents that state their period must match the one requested
fn check_period(name: &str, found: Option<&str>, expected: &Period) -> SnapshotResult<()> {
    match found {
        Some(code) if Period::parse(code).ok().as_ref() != Some(expected) => {
            Err(SnapshotError::PeriodMismatch {
                name: name.to_string(),
                expected: expected.code(),
                found: code.to_string(),
            })
        }
        _ => Ok(()),
    }
}

/// Later rows for the same store code replace earlier ones
pub fn index_costs(rows: Vec<CostDetail>) -> HashMap<String, CostDetail> {
    rows.into_iter()
        .map(|c| (c.store_code.clone(), c))
        .collect()
}

/// One period's joined store facts and cost table
#[derive(Debug, Clone)]
pub struct LoadedSnapshot {
    pub dataset: String,
    pub period: Period,
    pub stores: Vec<StoreFact>,
    pub costs: HashMap<String, CostDetail>,
}

impl LoadedSnapshot {
    pub fn analyze(&self, policy: &AnalysisPolicy) -> EfficiencyReport {
        analyze(&self.stores, &self.costs, policy)
    }
}
