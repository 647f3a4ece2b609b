//! Types for the store efficiency analyzer

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Snapshot input
// ---------------------------------------------------------------------------

/// One operating store as delivered by the dashboard data snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreFact {
    pub store_code: String,
    #[serde(default)]
    pub store_name: String,
    #[serde(default)]
    pub net_sales: Decimal,
    /// Same metric for the comparable prior-year period. `None` or 0 means no baseline.
    #[serde(default)]
    pub net_sales_prev: Option<Decimal>,
    #[serde(default)]
    pub direct_profit: Decimal,
    /// Floor area in pyeong
    #[serde(default)]
    pub area: Option<Decimal>,
    #[serde(default)]
    pub rent: Option<Decimal>,
    #[serde(default)]
    pub labor_cost: Option<Decimal>,
    #[serde(default)]
    pub depreciation: Option<Decimal>,
}

/// Cost breakdown for one store, delivered by the P&L snapshot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostDetail {
    pub store_code: String,
    #[serde(default)]
    pub rent: Option<Decimal>,
    #[serde(default)]
    pub labor_cost: Option<Decimal>,
    #[serde(default)]
    pub depreciation: Option<Decimal>,
}

/// `<prefix>-dashboard-data-<period>.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    #[serde(default)]
    pub period: Option<String>,
    #[serde(default)]
    pub stores: Vec<StoreFact>,
}

/// `<prefix>-pl-data-<period>.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlSnapshot {
    #[serde(default)]
    pub period: Option<String>,
    #[serde(default)]
    pub stores: Vec<CostDetail>,
}

// ---------------------------------------------------------------------------
// Derived output
// ---------------------------------------------------------------------------

/// Profitability tier of a store
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    LargeProfit,
    SmallMediumProfit,
    Loss,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::LargeProfit,
        Category::SmallMediumProfit,
        Category::Loss,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::LargeProfit => "대형 흑자점",
            Self::SmallMediumProfit => "중소형 흑자점",
            Self::Loss => "적자점",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Self::LargeProfit => "blue",
            Self::SmallMediumProfit => "green",
            Self::Loss => "red",
        }
    }
}

/// Year-over-year sales ratio.
///
/// A store without a strictly positive prior-year baseline has no YOY at all;
/// it must never be rendered as a 0% (i.e. total decline) entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Yoy {
    /// Current sales as a percentage of prior-year sales (100 = flat)
    Comparable(Decimal),
    NotApplicable,
}

impl Yoy {
    pub fn from_sales(current: Decimal, prior: Option<Decimal>) -> Self {
        match prior {
            // A ratio too large for Decimal is treated like a missing baseline
            Some(prev) if prev > Decimal::ZERO => current
                .checked_div(prev)
                .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
                .map_or(Self::NotApplicable, Self::Comparable),
            _ => Self::NotApplicable,
        }
    }

    pub fn value(&self) -> Option<Decimal> {
        match self {
            Self::Comparable(v) => Some(*v),
            Self::NotApplicable => None,
        }
    }

    pub fn is_applicable(&self) -> bool {
        matches!(self, Self::Comparable(_))
    }

    /// Percentage-point growth over the prior year (YOY 112 → +12)
    pub fn growth(&self) -> Option<Decimal> {
        self.value().map(|v| v.saturating_sub(Decimal::ONE_HUNDRED))
    }
}

/// Derived efficiency row for one included store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreMetric {
    /// 1-based position by sales per area, descending. 0 until ranked.
    pub rank: usize,
    pub store_code: String,
    pub store_name: String,
    pub net_sales: Decimal,
    pub net_sales_prev: Decimal,
    pub direct_profit: Decimal,
    pub area: Decimal,
    pub sales_per_area: Decimal,
    pub yoy: Yoy,
    pub rent: Decimal,
    pub labor_cost: Decimal,
    pub depreciation: Decimal,
    pub rent_rate: Decimal,
    pub labor_rate: Decimal,
    pub depreciation_rate: Decimal,
    /// Direct profit as a percentage of net sales
    pub profit_rate: Decimal,
    pub category: Category,
}

/// Store holding an extreme sales-per-area value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreExtreme {
    pub store_code: String,
    pub store_name: String,
    pub sales_per_area: Decimal,
}

/// Snapshot-wide statistics over the included store set.
///
/// Every optional field is `None` when the set it ranges over is empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregateStats {
    pub store_count: usize,
    pub profit_store_count: usize,
    pub loss_store_count: usize,
    /// Stores with a prior-year baseline
    pub comparable_store_count: usize,
    pub new_store_count: usize,
    pub max_sales_per_area: Option<StoreExtreme>,
    pub min_sales_per_area: Option<StoreExtreme>,
    pub avg_profit_sales_per_area: Option<Decimal>,
    pub breakeven_threshold: Option<Decimal>,
    /// Mean YOY over comparable stores only
    pub avg_yoy: Option<Decimal>,
    pub total_sales: Decimal,
    pub total_direct_profit: Decimal,
    pub total_area: Decimal,
    /// total_sales / total_area
    pub overall_sales_per_area: Option<Decimal>,
}

/// Per-category totals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: Category,
    pub store_count: usize,
    pub total_sales: Decimal,
    pub total_direct_profit: Decimal,
    pub total_area: Decimal,
    /// Area-weighted: total_sales / total_area
    pub avg_sales_per_area: Option<Decimal>,
}

/// Why a store was left out of the analysis set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    OnlineChannel,
    MissingArea,
    NoSales,
    /// Sales per area does not fit in a Decimal (area is vanishingly small)
    OutOfRange,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExcludedStore {
    pub store_code: String,
    pub store_name: String,
    pub reason: ExclusionReason,
}

/// Stores dropped during filtering, in input order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExclusionReport {
    pub excluded: Vec<ExcludedStore>,
}

impl ExclusionReport {
    pub fn count(&self) -> usize {
        self.excluded.len()
    }

    pub fn count_by(&self, reason: ExclusionReason) -> usize {
        self.excluded.iter().filter(|e| e.reason == reason).count()
    }

    pub fn contains(&self, store_code: &str) -> bool {
        self.excluded.iter().any(|e| e.store_code == store_code)
    }
}
