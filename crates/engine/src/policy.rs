//! Classification and exclusion policy for the efficiency analyzer
//!
//! Profit tiers:
//! - direct_profit >= 100      → LargeProfit
//! - 0 < direct_profit < 100   → SmallMediumProfit
//! - direct_profit <= 0        → Loss
//!
//! Online/e-commerce channels are recognised by store code prefix and never
//! take part in floor-area efficiency analysis.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::Category;

/// Direct profit at or above which a store counts as a large-profit store
pub const LARGE_PROFIT_THRESHOLD: Decimal = dec!(100);

/// Store code prefixes reserved for online channels
pub const DEFAULT_ONLINE_PREFIXES: &[&str] = &["ON", "EC"];

/// Policy inputs of the analyzer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisPolicy {
    pub large_profit_threshold: Decimal,
    pub online_prefixes: Vec<String>,
}

impl Default for AnalysisPolicy {
    fn default() -> Self {
        Self {
            large_profit_threshold: LARGE_PROFIT_THRESHOLD,
            online_prefixes: DEFAULT_ONLINE_PREFIXES
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

impl AnalysisPolicy {
    pub fn classify(&self, direct_profit: Decimal) -> Category {
        if direct_profit >= self.large_profit_threshold {
            Category::LargeProfit
        } else if direct_profit > Decimal::ZERO {
            Category::SmallMediumProfit
        } else {
            Category::Loss
        }
    }

    /// Case-insensitive prefix match against the online channel prefixes
    pub fn is_online(&self, store_code: &str) -> bool {
        let code = store_code.trim().to_ascii_uppercase();
        self.online_prefixes
            .iter()
            .filter(|p| !p.is_empty())
            .any(|p| code.starts_with(&p.to_ascii_uppercase()))
    }
}
