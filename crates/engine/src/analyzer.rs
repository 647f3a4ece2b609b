//! Store Efficiency Analyzer — rank and classify stores by sales per pyeong
//!
//! Takes one period's store facts plus the P&L cost breakdown and produces
//! the ranked efficiency table, profitability tiers, and snapshot statistics
//! the dashboards render. Pure: no I/O, no shared state, fresh output per call.

use persistence::repository::analysis::AnalysisRunRecord;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

use crate::heatmap::{heatmap_band, HeatmapBand};
use crate::period::Period;
use crate::policy::AnalysisPolicy;
use crate::types::{
    AggregateStats, Category, CategorySummary, CostDetail, ExcludedStore, ExclusionReason,
    ExclusionReport, StoreExtreme, StoreFact, StoreMetric, Yoy,
};

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Full analyzer output for one snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EfficiencyReport {
    /// Ranked by sales per area, descending
    pub metrics: Vec<StoreMetric>,
    pub stats: AggregateStats,
    /// Every category key is present, possibly with an empty list
    pub categories: BTreeMap<Category, Vec<StoreMetric>>,
    pub category_summaries: Vec<CategorySummary>,
    pub exclusions: ExclusionReport,
}

impl EfficiencyReport {
    /// No store survived filtering. Distinct from "every store is a loss store".
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    pub fn top(&self, n: usize) -> &[StoreMetric] {
        &self.metrics[..n.min(self.metrics.len())]
    }

    /// Lowest `n` stores, weakest last
    pub fn bottom(&self, n: usize) -> &[StoreMetric] {
        let len = self.metrics.len();
        &self.metrics[len - n.min(len)..]
    }

    pub fn find(&self, store_code: &str) -> Option<&StoreMetric> {
        self.metrics.iter().find(|m| m.store_code == store_code)
    }

    /// `None` when there is no threshold to compare against
    pub fn above_breakeven(&self, metric: &StoreMetric) -> Option<bool> {
        self.stats
            .breakeven_threshold
            .map(|t| metric.sales_per_area >= t)
    }

    /// Heatmap band of a store within this snapshot's sales-per-area range
    pub fn heatmap_band(&self, metric: &StoreMetric) -> HeatmapBand {
        match (&self.stats.min_sales_per_area, &self.stats.max_sales_per_area) {
            (Some(min), Some(max)) => {
                heatmap_band(metric.sales_per_area, min.sales_per_area, max.sales_per_area)
            }
            _ => heatmap_band(metric.sales_per_area, metric.sales_per_area, metric.sales_per_area),
        }
    }
}

// ---------------------------------------------------------------------------
// Metrics computation
// ---------------------------------------------------------------------------

/// `numerator / denominator`, saturating at the Decimal range when the
/// quotient is too large. `None` for a non-positive denominator.
fn ratio(numerator: Decimal, denominator: Decimal) -> Option<Decimal> {
    if denominator <= Decimal::ZERO {
        return None;
    }
    Some(numerator.checked_div(denominator).unwrap_or(
        if numerator.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        },
    ))
}

fn rate(part: Decimal, whole: Decimal) -> Decimal {
    ratio(part, whole)
        .map(|r| r.saturating_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::ZERO)
}

fn total(values: impl Iterator<Item = Decimal>) -> Decimal {
    values.fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Why `fact` cannot be analyzed, checked in a fixed order
fn exclusion_reason(fact: &StoreFact, policy: &AnalysisPolicy) -> Option<ExclusionReason> {
    if policy.is_online(&fact.store_code) {
        return Some(ExclusionReason::OnlineChannel);
    }
    if fact.area.map_or(true, |a| a <= Decimal::ZERO) {
        return Some(ExclusionReason::MissingArea);
    }
    if fact.net_sales <= Decimal::ZERO {
        return Some(ExclusionReason::NoSales);
    }
    let area = fact.area.unwrap_or_default();
    if fact.net_sales.checked_div(area).is_none() {
        return Some(ExclusionReason::OutOfRange);
    }
    None
}

/// Derive the unranked metric row for a store that passed filtering.
///
/// A matching `CostDetail` overrides the fact's own cost fields; anything
/// still missing counts as 0.
pub fn compute_metric(
    fact: &StoreFact,
    cost: Option<&CostDetail>,
    policy: &AnalysisPolicy,
) -> StoreMetric {
    let area = fact.area.unwrap_or(Decimal::ZERO);
    let sales_per_area = ratio(fact.net_sales, area).unwrap_or_default();

    let rent = cost.and_then(|c| c.rent).or(fact.rent).unwrap_or_default();
    let labor_cost = cost
        .and_then(|c| c.labor_cost)
        .or(fact.labor_cost)
        .unwrap_or_default();
    let depreciation = cost
        .and_then(|c| c.depreciation)
        .or(fact.depreciation)
        .unwrap_or_default();

    StoreMetric {
        rank: 0,
        store_code: fact.store_code.clone(),
        store_name: fact.store_name.clone(),
        net_sales: fact.net_sales,
        net_sales_prev: fact.net_sales_prev.unwrap_or_default(),
        direct_profit: fact.direct_profit,
        area,
        sales_per_area,
        yoy: Yoy::from_sales(fact.net_sales, fact.net_sales_prev),
        rent,
        labor_cost,
        depreciation,
        rent_rate: rate(rent, fact.net_sales),
        labor_rate: rate(labor_cost, fact.net_sales),
        depreciation_rate: rate(depreciation, fact.net_sales),
        profit_rate: rate(fact.direct_profit, fact.net_sales),
        category: policy.classify(fact.direct_profit),
    }
}

/// Stable sort by sales per area descending, then assign 1-based ranks
fn rank_metrics(metrics: &mut [StoreMetric]) {
    metrics.sort_by(|a, b| b.sales_per_area.cmp(&a.sales_per_area));
    for (i, m) in metrics.iter_mut().enumerate() {
        m.rank = i + 1;
    }
}

fn extreme(m: &StoreMetric) -> StoreExtreme {
    StoreExtreme {
        store_code: m.store_code.clone(),
        store_name: m.store_name.clone(),
        sales_per_area: m.sales_per_area,
    }
}

fn mean(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        None
    } else {
        ratio(total(values.iter().copied()), Decimal::from(values.len()))
    }
}

/// Snapshot statistics over an already-filtered metric set
pub fn compute_stats(metrics: &[StoreMetric]) -> AggregateStats {
    // First occurrence wins on ties, so ranked input yields the top-ranked store
    let max = metrics.iter().fold(None::<&StoreMetric>, |best, m| match best {
        Some(b) if b.sales_per_area >= m.sales_per_area => Some(b),
        _ => Some(m),
    });
    let min = metrics.iter().fold(None::<&StoreMetric>, |best, m| match best {
        Some(b) if b.sales_per_area <= m.sales_per_area => Some(b),
        _ => Some(m),
    });

    let profit_ratios: Vec<Decimal> = metrics
        .iter()
        .filter(|m| m.direct_profit > Decimal::ZERO && m.sales_per_area > Decimal::ZERO)
        .map(|m| m.sales_per_area)
        .collect();
    let loss_ratios: Vec<Decimal> = metrics
        .iter()
        .filter(|m| m.direct_profit <= Decimal::ZERO)
        .map(|m| m.sales_per_area)
        .collect();

    let lowest_profitable = profit_ratios.iter().min().copied();
    let highest_loss = loss_ratios.iter().max().copied();
    let breakeven_threshold = match (lowest_profitable, highest_loss) {
        (Some(p), Some(l)) => Some(p.max(l)),
        (p, l) => p.or(l),
    };

    let yoy_values: Vec<Decimal> = metrics.iter().filter_map(|m| m.yoy.value()).collect();

    let total_sales = total(metrics.iter().map(|m| m.net_sales));
    let total_direct_profit = total(metrics.iter().map(|m| m.direct_profit));
    let total_area = total(metrics.iter().map(|m| m.area));
    let overall_sales_per_area = ratio(total_sales, total_area);

    AggregateStats {
        store_count: metrics.len(),
        profit_store_count: metrics
            .iter()
            .filter(|m| m.direct_profit > Decimal::ZERO)
            .count(),
        loss_store_count: loss_ratios.len(),
        comparable_store_count: yoy_values.len(),
        new_store_count: metrics.len() - yoy_values.len(),
        max_sales_per_area: max.map(extreme),
        min_sales_per_area: min.map(extreme),
        avg_profit_sales_per_area: mean(&profit_ratios),
        breakeven_threshold,
        avg_yoy: mean(&yoy_values),
        total_sales,
        total_direct_profit,
        total_area,
        overall_sales_per_area,
    }
}

/// Partition metrics into the three profit tiers, preserving order
pub fn group_by_category(metrics: &[StoreMetric]) -> BTreeMap<Category, Vec<StoreMetric>> {
    let mut groups: BTreeMap<Category, Vec<StoreMetric>> =
        Category::ALL.iter().map(|c| (*c, Vec::new())).collect();
    for m in metrics {
        groups.entry(m.category).or_default().push(m.clone());
    }
    groups
}

/// Per-category totals with an area-weighted sales per area
pub fn summarize_categories(
    groups: &BTreeMap<Category, Vec<StoreMetric>>,
) -> Vec<CategorySummary> {
    groups
        .iter()
        .map(|(category, stores)| {
            let total_sales = total(stores.iter().map(|m| m.net_sales));
            let total_direct_profit = total(stores.iter().map(|m| m.direct_profit));
            let total_area = total(stores.iter().map(|m| m.area));
            CategorySummary {
                category: *category,
                store_count: stores.len(),
                total_sales,
                total_direct_profit,
                total_area,
                avg_sales_per_area: ratio(total_sales, total_area),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Analyze one snapshot.
///
/// Filtering runs before any computation: online channels, then stores
/// without floor area, then stores without sales this period. A store whose
/// sales per area would overflow is excluded last.
pub fn analyze(
    stores: &[StoreFact],
    costs: &HashMap<String, CostDetail>,
    policy: &AnalysisPolicy,
) -> EfficiencyReport {
    let mut exclusions = ExclusionReport::default();
    let mut metrics = Vec::with_capacity(stores.len());

    for fact in stores {
        if let Some(reason) = exclusion_reason(fact, policy) {
            debug!(store = %fact.store_code, ?reason, "Excluding store from efficiency analysis");
            exclusions.excluded.push(ExcludedStore {
                store_code: fact.store_code.clone(),
                store_name: fact.store_name.clone(),
                reason,
            });
            continue;
        }
        metrics.push(compute_metric(fact, costs.get(&fact.store_code), policy));
    }

    rank_metrics(&mut metrics);
    let stats = compute_stats(&metrics);
    let categories = group_by_category(&metrics);
    let category_summaries = summarize_categories(&categories);

    info!(
        stores = stats.store_count,
        excluded = exclusions.count(),
        loss_stores = stats.loss_store_count,
        "Store efficiency analysis complete"
    );

    EfficiencyReport {
        metrics,
        stats,
        categories,
        category_summaries,
        exclusions,
    }
}

// ---------------------------------------------------------------------------
// Persistence mapping
// ---------------------------------------------------------------------------

fn text(value: Decimal) -> String {
    value.normalize().to_string()
}

fn opt_text(value: Option<Decimal>) -> Option<String> {
    value.map(text)
}

/// Convert a report into the stored run summary
pub fn report_to_record(
    dataset: &str,
    period: &Period,
    report: &EfficiencyReport,
) -> AnalysisRunRecord {
    let stats = &report.stats;
    AnalysisRunRecord {
        id: None,
        dataset: dataset.to_string(),
        period: period.code(),
        store_count: stats.store_count as i64,
        excluded_count: report.exclusions.count() as i64,
        loss_store_count: stats.loss_store_count as i64,
        total_sales: text(stats.total_sales),
        total_direct_profit: text(stats.total_direct_profit),
        max_sales_per_area: opt_text(stats.max_sales_per_area.as_ref().map(|e| e.sales_per_area)),
        min_sales_per_area: opt_text(stats.min_sales_per_area.as_ref().map(|e| e.sales_per_area)),
        avg_profit_sales_per_area: opt_text(stats.avg_profit_sales_per_area),
        breakeven_threshold: opt_text(stats.breakeven_threshold),
        avg_yoy: opt_text(stats.avg_yoy),
        stats_json: serde_json::to_string(stats).ok(),
        analyzed_at: None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn make_store(code: &str, sales: Decimal, area: Decimal, profit: Decimal) -> StoreFact {
        StoreFact {
            store_code: code.into(),
            store_name: format!("{code} 매장"),
            net_sales: sales,
            net_sales_prev: Some(sales),
            direct_profit: profit,
            area: Some(area),
            rent: None,
            labor_cost: None,
            depreciation: None,
        }
    }

    fn run(stores: &[StoreFact]) -> EfficiencyReport {
        analyze(stores, &HashMap::new(), &AnalysisPolicy::default())
    }

    #[test]
    fn test_scenario_two_stores() {
        let report = run(&[
            make_store("S1", dec!(1000), dec!(10), dec!(150)),
            make_store("S2", dec!(200), dec!(20), dec!(-5)),
        ]);

        let s1 = &report.metrics[0];
        assert_eq!(s1.store_code, "S1");
        assert_eq!(s1.rank, 1);
        assert_eq!(s1.sales_per_area, dec!(100));
        assert_eq!(s1.category, Category::LargeProfit);

        let s2 = &report.metrics[1];
        assert_eq!(s2.store_code, "S2");
        assert_eq!(s2.rank, 2);
        assert_eq!(s2.sales_per_area, dec!(10));
        assert_eq!(s2.category, Category::Loss);

        assert_eq!(report.stats.breakeven_threshold, Some(dec!(100)));
        assert_eq!(report.above_breakeven(s1), Some(true));
        assert_eq!(report.above_breakeven(s2), Some(false));
    }

    #[test]
    fn test_zero_area_and_missing_area_excluded() {
        let mut no_area = make_store("S3", dec!(500), dec!(0), dec!(10));
        no_area.area = None;
        let report = run(&[
            make_store("S1", dec!(1000), dec!(10), dec!(150)),
            make_store("S2", dec!(500), dec!(0), dec!(10)),
            no_area,
        ]);

        assert_eq!(report.metrics.len(), 1);
        assert!(report.find("S2").is_none());
        assert!(report.find("S3").is_none());
        assert_eq!(report.exclusions.count_by(ExclusionReason::MissingArea), 2);
    }

    #[test]
    fn test_closed_store_absent_from_metrics_and_sums() {
        let report = run(&[
            make_store("S1", dec!(1000), dec!(10), dec!(150)),
            make_store("CLOSED", dec!(0), dec!(40), dec!(-30)),
        ]);

        assert!(report.find("CLOSED").is_none());
        assert_eq!(report.stats.total_sales, dec!(1000));
        assert_eq!(report.stats.total_direct_profit, dec!(150));
        assert_eq!(report.stats.total_area, dec!(10));
        let loss = report
            .category_summaries
            .iter()
            .find(|s| s.category == Category::Loss)
            .unwrap();
        assert_eq!(loss.store_count, 0);
        assert_eq!(loss.total_area, Decimal::ZERO);
        assert_eq!(report.exclusions.count_by(ExclusionReason::NoSales), 1);
    }

    #[test]
    fn test_online_channel_excluded_first() {
        // Online store with zero area is reported as an online exclusion
        let report = run(&[
            make_store("ON01", dec!(5000), dec!(0), dec!(300)),
            make_store("S1", dec!(1000), dec!(10), dec!(150)),
        ]);
        assert_eq!(report.metrics.len(), 1);
        assert_eq!(report.exclusions.excluded[0].reason, ExclusionReason::OnlineChannel);
    }

    #[test]
    fn test_rank_monotonic_and_stable_on_ties() {
        let report = run(&[
            make_store("A", dec!(300), dec!(10), dec!(10)),
            make_store("B", dec!(900), dec!(10), dec!(10)),
            make_store("C", dec!(600), dec!(20), dec!(10)),
            make_store("D", dec!(150), dec!(5), dec!(10)),
            make_store("E", dec!(50), dec!(10), dec!(10)),
        ]);

        for pair in report.metrics.windows(2) {
            assert!(pair[0].sales_per_area >= pair[1].sales_per_area);
        }
        // A, C and D all sit at 30/area and keep input order
        let codes: Vec<&str> = report.metrics.iter().map(|m| m.store_code.as_str()).collect();
        assert_eq!(codes, vec!["B", "A", "C", "D", "E"]);
        let ranks: Vec<usize> = report.metrics.iter().map(|m| m.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_categories_partition_metrics() {
        let report = run(&[
            make_store("A", dec!(1000), dec!(10), dec!(100)),
            make_store("B", dec!(800), dec!(10), dec!(99)),
            make_store("C", dec!(600), dec!(10), dec!(0)),
            make_store("D", dec!(400), dec!(10), dec!(-20)),
            make_store("E", dec!(200), dec!(10), dec!(1)),
        ]);

        assert_eq!(report.categories.len(), 3);
        let total: usize = report.categories.values().map(|v| v.len()).sum();
        assert_eq!(total, report.metrics.len());
        for m in &report.metrics {
            let hits = report
                .categories
                .values()
                .filter(|bucket| bucket.iter().any(|b| b.store_code == m.store_code))
                .count();
            assert_eq!(hits, 1, "{} must be in exactly one bucket", m.store_code);
            assert!(report.categories[&m.category]
                .iter()
                .any(|b| b.store_code == m.store_code));
        }
        assert_eq!(report.categories[&Category::LargeProfit].len(), 1);
        assert_eq!(report.categories[&Category::SmallMediumProfit].len(), 2);
        assert_eq!(report.categories[&Category::Loss].len(), 2);
    }

    #[test]
    fn test_new_store_yoy_not_applicable() {
        let mut new_store = make_store("NEW", dec!(500), dec!(10), dec!(20));
        new_store.net_sales_prev = Some(Decimal::ZERO);
        let mut old_store = make_store("OLD", dec!(1100), dec!(10), dec!(20));
        old_store.net_sales_prev = Some(dec!(1000));

        let report = run(&[new_store, old_store]);
        let new_metric = report.find("NEW").unwrap();
        assert_eq!(new_metric.yoy, Yoy::NotApplicable);
        assert_eq!(new_metric.yoy.value(), None);
        assert_eq!(new_metric.category, Category::SmallMediumProfit);

        // Average YOY ignores the new store rather than counting it as 0
        assert_eq!(report.stats.avg_yoy, Some(dec!(110)));
        assert_eq!(report.stats.comparable_store_count, 1);
        assert_eq!(report.stats.new_store_count, 1);
    }

    #[test]
    fn test_category_average_is_area_weighted() {
        let report = run(&[
            make_store("A", dec!(100), dec!(10), dec!(150)),
            make_store("B", dec!(100), dec!(100), dec!(200)),
        ]);
        let large = report
            .category_summaries
            .iter()
            .find(|s| s.category == Category::LargeProfit)
            .unwrap();
        let avg = large.avg_sales_per_area.unwrap();
        assert_eq!(avg.round_dp(3), dec!(1.818));
        assert_ne!(avg, dec!(5.5));
    }

    #[test]
    fn test_category_average_even_split() {
        let report = run(&[
            make_store("A", dec!(100), dec!(10), dec!(-1)),
            make_store("B", dec!(300), dec!(30), dec!(-1)),
        ]);
        let loss = report
            .category_summaries
            .iter()
            .find(|s| s.category == Category::Loss)
            .unwrap();
        assert_eq!(loss.avg_sales_per_area, Some(dec!(10)));
        assert_eq!(loss.total_sales, dec!(400));
        assert_eq!(loss.total_area, dec!(40));
    }

    #[test]
    fn test_empty_after_filtering_is_well_defined() {
        let report = run(&[
            make_store("ON1", dec!(100), dec!(10), dec!(10)),
            make_store("S0", dec!(0), dec!(10), dec!(10)),
        ]);
        assert!(report.is_empty());
        assert_eq!(report.stats.store_count, 0);
        assert!(report.stats.max_sales_per_area.is_none());
        assert!(report.stats.min_sales_per_area.is_none());
        assert!(report.stats.breakeven_threshold.is_none());
        assert!(report.stats.avg_profit_sales_per_area.is_none());
        assert!(report.stats.avg_yoy.is_none());
        assert!(report.stats.overall_sales_per_area.is_none());
        assert_eq!(report.stats.total_sales, Decimal::ZERO);
        assert!(report.category_summaries.iter().all(|s| s.avg_sales_per_area.is_none()));
        assert_eq!(report.exclusions.count(), 2);
        assert!(report.top(3).is_empty());
        assert!(report.bottom(3).is_empty());
    }

    #[test]
    fn test_all_loss_stores_distinct_from_no_data() {
        let report = run(&[
            make_store("A", dec!(100), dec!(10), dec!(-1)),
            make_store("B", dec!(300), dec!(10), dec!(-10)),
        ]);
        assert!(!report.is_empty());
        assert_eq!(report.stats.profit_store_count, 0);
        assert_eq!(report.stats.loss_store_count, 2);
        assert_eq!(report.stats.breakeven_threshold, Some(dec!(30)));
        assert!(report.stats.avg_profit_sales_per_area.is_none());
    }

    #[test]
    fn test_breakeven_uses_highest_loss_when_larger() {
        // A loss store out-performs the weakest profitable store
        let report = run(&[
            make_store("P1", dec!(800), dec!(10), dec!(50)),
            make_store("P2", dec!(300), dec!(10), dec!(5)),
            make_store("L1", dec!(500), dec!(10), dec!(-20)),
        ]);
        assert_eq!(report.stats.breakeven_threshold, Some(dec!(50)));
        assert_eq!(report.stats.avg_profit_sales_per_area, Some(dec!(55)));
    }

    #[test]
    fn test_extremes_and_totals() {
        let report = run(&[
            make_store("A", dec!(300), dec!(10), dec!(10)),
            make_store("B", dec!(900), dec!(10), dec!(120)),
            make_store("C", dec!(100), dec!(20), dec!(-10)),
        ]);
        let max = report.stats.max_sales_per_area.as_ref().unwrap();
        let min = report.stats.min_sales_per_area.as_ref().unwrap();
        assert_eq!(max.store_code, "B");
        assert_eq!(max.sales_per_area, dec!(90));
        assert_eq!(min.store_code, "C");
        assert_eq!(min.sales_per_area, dec!(5));
        assert_eq!(report.stats.overall_sales_per_area, Some(dec!(32.5)));
        assert_eq!(report.top(1)[0].store_code, "B");
        assert_eq!(report.bottom(1)[0].store_code, "C");
    }

    #[test]
    fn test_huge_yoy_ratio_is_not_applicable() {
        let mut big = make_store("BIG", dec!(10000000000000000000000000), dec!(10), dec!(100));
        big.net_sales_prev = Some(dec!(0.01));
        let report = run(&[big]);

        let m = report.find("BIG").unwrap();
        assert_eq!(m.yoy, Yoy::NotApplicable);
        assert_eq!(m.sales_per_area, dec!(1000000000000000000000000));
        assert_eq!(report.stats.avg_yoy, None);
        assert_eq!(report.stats.new_store_count, 1);
    }

    #[test]
    fn test_unrepresentable_sales_per_area_excluded() {
        let report = run(&[
            make_store("TINY", dec!(10000000000000000000000000), dec!(0.000001), dec!(1)),
            make_store("S1", dec!(1000), dec!(10), dec!(150)),
        ]);
        assert_eq!(report.metrics.len(), 1);
        assert_eq!(report.exclusions.count_by(ExclusionReason::OutOfRange), 1);
        assert!(report.exclusions.contains("TINY"));
    }

    #[test]
    fn test_totals_saturate_instead_of_overflowing() {
        let report = run(&[
            make_store("A", dec!(70000000000000000000000000000), dec!(1), dec!(500)),
            make_store("B", dec!(70000000000000000000000000000), dec!(1), dec!(-500)),
        ]);
        assert_eq!(report.stats.store_count, 2);
        assert_eq!(report.stats.total_sales, Decimal::MAX);
        assert_eq!(report.stats.total_direct_profit, dec!(0));
        assert!(report.stats.overall_sales_per_area.is_some());
        assert_eq!(report.stats.avg_yoy, Some(dec!(100)));
    }

    #[test]
    fn test_cost_rates_with_cost_detail_override() {
        let mut fact = make_store("S1", dec!(1000), dec!(10), dec!(150));
        fact.rent = Some(dec!(999));
        fact.labor_cost = Some(dec!(120));
        let mut costs = HashMap::new();
        costs.insert(
            "S1".to_string(),
            CostDetail {
                store_code: "S1".into(),
                rent: Some(dec!(80)),
                labor_cost: None,
                depreciation: Some(dec!(25)),
            },
        );

        let report = analyze(&[fact], &costs, &AnalysisPolicy::default());
        let m = &report.metrics[0];
        assert_eq!(m.rent, dec!(80));
        assert_eq!(m.rent_rate, dec!(8));
        assert_eq!(m.labor_cost, dec!(120));
        assert_eq!(m.labor_rate, dec!(12));
        assert_eq!(m.depreciation_rate, dec!(2.5));
        assert_eq!(m.profit_rate, dec!(15));
    }

    #[test]
    fn test_missing_costs_default_to_zero() {
        let report = run(&[make_store("S1", dec!(1000), dec!(10), dec!(150))]);
        let m = &report.metrics[0];
        assert_eq!(m.rent, Decimal::ZERO);
        assert_eq!(m.rent_rate, Decimal::ZERO);
        assert_eq!(m.depreciation_rate, Decimal::ZERO);
    }

    #[test]
    fn test_single_store_heatmap_is_midpoint() {
        let report = run(&[make_store("S1", dec!(1000), dec!(10), dec!(150))]);
        assert_eq!(report.heatmap_band(&report.metrics[0]), HeatmapBand::Strong);
    }

    #[test]
    fn test_report_to_record() {
        let report = run(&[
            make_store("S1", dec!(1000), dec!(10), dec!(150)),
            make_store("S2", dec!(200), dec!(20), dec!(-5)),
            make_store("ON9", dec!(200), dec!(20), dec!(-5)),
        ]);
        let period = Period::parse("2511").unwrap();
        let record = report_to_record("retail-a", &period, &report);
        assert_eq!(record.period, "2511");
        assert_eq!(record.store_count, 2);
        assert_eq!(record.excluded_count, 1);
        assert_eq!(record.breakeven_threshold.as_deref(), Some("100"));
        assert_eq!(record.total_sales, "1200");
    }
}
