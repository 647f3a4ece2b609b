//! Display rows for the efficiency dashboard
//!
//! Turns an `EfficiencyReport` into pre-formatted values so the UI only lays
//! them out. No computation beyond formatting happens here.

use engine::{
    format_delta, format_number, format_percent, format_sales_per_area, format_yoy, Category,
    EfficiencyReport, Favorable, FormattedDelta, Period, StoreMetric,
};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct StoreRow {
    pub rank: usize,
    pub store_code: String,
    pub store_name: String,
    pub net_sales: String,
    pub direct_profit: String,
    pub area: String,
    pub sales_per_area: String,
    pub yoy: String,
    /// false for stores without a prior-year baseline; callers must not color these
    pub yoy_applicable: bool,
    pub yoy_delta: Option<FormattedDelta>,
    pub profit_rate: String,
    pub rent_rate: String,
    pub labor_rate: String,
    pub depreciation_rate: String,
    pub category: Category,
    pub category_label: &'static str,
    pub heat_level: u8,
    pub heat_class: &'static str,
    pub above_breakeven: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryRow {
    pub category: Category,
    pub label: &'static str,
    pub color: &'static str,
    pub store_count: usize,
    pub total_sales: String,
    pub total_direct_profit: String,
    pub avg_sales_per_area: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryView {
    pub period: String,
    pub period_label: String,
    pub has_data: bool,
    pub store_count: usize,
    pub excluded_count: usize,
    pub max_sales_per_area: String,
    pub min_sales_per_area: String,
    pub avg_profit_sales_per_area: String,
    pub breakeven_threshold: String,
    pub avg_yoy: String,
    pub total_sales: String,
    pub total_direct_profit: String,
}

const DASH: &str = "-";

fn or_dash(value: Option<String>) -> String {
    value.unwrap_or_else(|| DASH.to_string())
}

pub fn store_row(report: &EfficiencyReport, m: &StoreMetric) -> StoreRow {
    let band = report.heatmap_band(m);
    StoreRow {
        rank: m.rank,
        store_code: m.store_code.clone(),
        store_name: m.store_name.clone(),
        net_sales: format_number(m.net_sales, 0),
        direct_profit: format_number(m.direct_profit, 0),
        area: format_number(m.area, 1),
        sales_per_area: format_sales_per_area(m.sales_per_area),
        yoy: format_yoy(&m.yoy),
        yoy_applicable: m.yoy.is_applicable(),
        yoy_delta: m.yoy.growth().map(|g| format_delta(g, 1, Favorable::Increase)),
        profit_rate: format_percent(m.profit_rate),
        rent_rate: format_percent(m.rent_rate),
        labor_rate: format_percent(m.labor_rate),
        depreciation_rate: format_percent(m.depreciation_rate),
        category: m.category,
        category_label: m.category.label(),
        heat_level: band.level(),
        heat_class: band.css_class(),
        above_breakeven: report.above_breakeven(m),
    }
}

pub fn store_rows(report: &EfficiencyReport) -> Vec<StoreRow> {
    report.metrics.iter().map(|m| store_row(report, m)).collect()
}

pub fn category_rows(report: &EfficiencyReport) -> Vec<CategoryRow> {
    report
        .category_summaries
        .iter()
        .map(|s| CategoryRow {
            category: s.category,
            label: s.category.label(),
            color: s.category.color(),
            store_count: s.store_count,
            total_sales: format_number(s.total_sales, 0),
            total_direct_profit: format_number(s.total_direct_profit, 0),
            avg_sales_per_area: or_dash(s.avg_sales_per_area.map(format_sales_per_area)),
        })
        .collect()
}

pub fn summary(period: &Period, report: &EfficiencyReport) -> SummaryView {
    let stats = &report.stats;
    SummaryView {
        period: period.code(),
        period_label: period.label(),
        has_data: !report.is_empty(),
        store_count: stats.store_count,
        excluded_count: report.exclusions.count(),
        max_sales_per_area: or_dash(
            stats
                .max_sales_per_area
                .as_ref()
                .map(|e| format!("{} ({})", format_sales_per_area(e.sales_per_area), e.store_name)),
        ),
        min_sales_per_area: or_dash(
            stats
                .min_sales_per_area
                .as_ref()
                .map(|e| format!("{} ({})", format_sales_per_area(e.sales_per_area), e.store_name)),
        ),
        avg_profit_sales_per_area: or_dash(stats.avg_profit_sales_per_area.map(format_sales_per_area)),
        breakeven_threshold: or_dash(stats.breakeven_threshold.map(format_sales_per_area)),
        avg_yoy: or_dash(stats.avg_yoy.map(format_percent)),
        total_sales: format_number(stats.total_sales, 0),
        total_direct_profit: format_number(stats.total_direct_profit, 0),
    }
}
