//! Heatmap banding for efficiency tables
//!
//! A value is placed in one of 8 discrete bands by its position inside an
//! observed `[min, max]` range: ratio = (value - min) / (max - min).
//! A degenerate range (max <= min) maps every value to ratio 0.5.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Lower ratio bound of each band, strongest first
const BAND_CUTOFFS: [(Decimal, HeatmapBand); 7] = [
    (dec!(0.8), HeatmapBand::Strongest),
    (dec!(0.6), HeatmapBand::VeryStrong),
    (dec!(0.4), HeatmapBand::Strong),
    (dec!(0.3), HeatmapBand::AboveAverage),
    (dec!(0.2), HeatmapBand::Average),
    (dec!(0.1), HeatmapBand::BelowAverage),
    (dec!(0.05), HeatmapBand::Weak),
];

const DEGENERATE_RATIO: Decimal = dec!(0.5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeatmapBand {
    Strongest,
    VeryStrong,
    Strong,
    AboveAverage,
    Average,
    BelowAverage,
    Weak,
    Weakest,
}

impl HeatmapBand {
    /// 7 for the strongest band down to 0 for the weakest
    pub fn level(&self) -> u8 {
        match self {
            Self::Strongest => 7,
            Self::VeryStrong => 6,
            Self::Strong => 5,
            Self::AboveAverage => 4,
            Self::Average => 3,
            Self::BelowAverage => 2,
            Self::Weak => 1,
            Self::Weakest => 0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Strongest => "Strongest",
            Self::VeryStrong => "Very strong",
            Self::Strong => "Strong",
            Self::AboveAverage => "Above average",
            Self::Average => "Average",
            Self::BelowAverage => "Below average",
            Self::Weak => "Weak",
            Self::Weakest => "Weakest",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Strongest => "bg-blue-700 text-white",
            Self::VeryStrong => "bg-blue-600 text-white",
            Self::Strong => "bg-blue-500 text-white",
            Self::AboveAverage => "bg-blue-400 text-white",
            Self::Average => "bg-blue-300 text-gray-900",
            Self::BelowAverage => "bg-blue-200 text-gray-900",
            Self::Weak => "bg-blue-100 text-gray-900",
            Self::Weakest => "bg-gray-50 text-gray-700",
        }
    }
}

/// Position of `value` inside `[min, max]`, clamped to [0, 1]
pub fn band_ratio(value: Decimal, min: Decimal, max: Decimal) -> Decimal {
    if max <= min {
        return DEGENERATE_RATIO;
    }
    // Clamping first keeps offset <= span, so the quotient stays within [0, 1]
    let offset = value.clamp(min, max).saturating_sub(min);
    let span = max.saturating_sub(min);
    (offset / span).clamp(Decimal::ZERO, Decimal::ONE)
}

pub fn heatmap_band(value: Decimal, min: Decimal, max: Decimal) -> HeatmapBand {
    let ratio = band_ratio(value, min, max);
    BAND_CUTOFFS
        .iter()
        .find(|(cutoff, _)| ratio >= *cutoff)
        .map(|(_, band)| *band)
        .unwrap_or(HeatmapBand::Weakest)
}
