//! Store Efficiency Engine — sales-per-pyeong analysis for store dashboards
//!
//! Provides:
//! - Store Efficiency Analyzer (ranking, profit tiers, breakeven heuristic)
//! - Heatmap banding over the observed efficiency range
//! - ko-KR presentation formatting for numbers, percentages and deltas
//! - Period codes and dashboard snapshot loading (directory or HTTP)

pub mod analyzer;
pub mod error;
pub mod format;
pub mod heatmap;
pub mod period;
pub mod policy;
pub mod snapshot;
pub mod types;

// Re-exports for convenience
pub use analyzer::{
    analyze, compute_metric, compute_stats, group_by_category, report_to_record,
    summarize_categories, EfficiencyReport,
};
pub use error::{SnapshotError, SnapshotResult};
pub use format::{
    format_delta, format_number, format_percent, format_sales_per_area, format_yoy, Direction,
    Favorable, FormattedDelta,
};
pub use heatmap::{band_ratio, heatmap_band, HeatmapBand};
pub use period::Period;
pub use policy::{AnalysisPolicy, DEFAULT_ONLINE_PREFIXES, LARGE_PROFIT_THRESHOLD};
pub use snapshot::{LoadedSnapshot, SnapshotSource};
pub use types::*;
