//! Display formatting for dashboard values
//!
//! Fixed ko-KR convention: `,` thousands separator, `.` decimal point,
//! percentages with one decimal, deltas prefixed with ▲ / ▼.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::types::Yoy;

pub const NOT_APPLICABLE: &str = "N/A";
const UP_GLYPH: char = '▲';
const DOWN_GLYPH: char = '▼';

/// Which direction of change is good for the metric being shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Favorable {
    Increase,
    /// e.g. cash outflow or cost lines
    Decrease,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Flat,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedDelta {
    pub text: String,
    pub direction: Direction,
    /// `None` when there was no change
    pub favorable: Option<bool>,
}

/// `1234567.891` with 1 decimal → `1,234,567.9`
pub fn format_number(value: Decimal, decimals: u32) -> String {
    let rounded = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let digits = format!("{:.*}", decimals as usize, rounded.abs());

    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits.as_str(), None),
    };

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if negative {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

fn group_thousands(int_part: &str) -> String {
    let len = int_part.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// `112.345` → `112.3%`
pub fn format_percent(value: Decimal) -> String {
    format!("{}%", format_number(value, 1))
}

pub fn format_yoy(yoy: &Yoy) -> String {
    match yoy.value() {
        Some(v) => format_percent(v),
        None => NOT_APPLICABLE.to_string(),
    }
}

pub fn format_sales_per_area(value: Decimal) -> String {
    format_number(value, 1)
}

/// Signed change with an explicit glyph: `▲ 1,234`, `▼ 56.5`, `0`
pub fn format_delta(value: Decimal, decimals: u32, favorable_when: Favorable) -> FormattedDelta {
    let rounded = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    let direction = if rounded.is_zero() {
        Direction::Flat
    } else if rounded.is_sign_positive() {
        Direction::Up
    } else {
        Direction::Down
    };

    let magnitude = format_number(rounded.abs(), decimals);
    let text = match direction {
        Direction::Up => format!("{UP_GLYPH} {magnitude}"),
        Direction::Down => format!("{DOWN_GLYPH} {magnitude}"),
        Direction::Flat => magnitude,
    };

    let favorable = match (direction, favorable_when) {
        (Direction::Flat, _) => None,
        (Direction::Up, Favorable::Increase) | (Direction::Down, Favorable::Decrease) => Some(true),
        _ => Some(false),
    };

    FormattedDelta {
        text,
        direction,
        favorable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_thousands_separator() {
        assert_eq!(format_number(dec!(1234567), 0), "1,234,567");
        assert_eq!(format_number(dec!(999), 0), "999");
        assert_eq!(format_number(dec!(1000), 0), "1,000");
        assert_eq!(format_number(dec!(0), 0), "0");
    }

    #[test]
    fn test_decimals_and_rounding() {
        assert_eq!(format_number(dec!(1234567.891), 1), "1,234,567.9");
        assert_eq!(format_number(dec!(2.25), 1), "2.3");
        assert_eq!(format_number(dec!(10), 2), "10.00");
    }

    #[test]
    fn test_negative_numbers() {
        assert_eq!(format_number(dec!(-1234.5), 0), "-1,235");
        // rounds to zero: no stray minus sign
        assert_eq!(format_number(dec!(-0.04), 1), "0.0");
    }

    #[test]
    fn test_percent_one_decimal() {
        assert_eq!(format_percent(dec!(112.345)), "112.3%");
        assert_eq!(format_percent(dec!(100)), "100.0%");
        assert_eq!(format_percent(dec!(1234.56)), "1,234.6%");
    }

    #[test]
    fn test_yoy_not_applicable() {
        assert_eq!(format_yoy(&Yoy::NotApplicable), "N/A");
        assert_eq!(format_yoy(&Yoy::Comparable(dec!(95.04))), "95.0%");
    }

    #[test]
    fn test_delta_glyphs() {
        let up = format_delta(dec!(1234), 0, Favorable::Increase);
        assert_eq!(up.text, "▲ 1,234");
        assert_eq!(up.direction, Direction::Up);
        assert_eq!(up.favorable, Some(true));

        let down = format_delta(dec!(-56.45), 1, Favorable::Increase);
        assert_eq!(down.text, "▼ 56.5");
        assert_eq!(down.favorable, Some(false));

        let flat = format_delta(dec!(0.001), 1, Favorable::Increase);
        assert_eq!(flat.text, "0.0");
        assert_eq!(flat.direction, Direction::Flat);
        assert_eq!(flat.favorable, None);
    }

    #[test]
    fn test_delta_outflow_decrease_is_favorable() {
        let delta = format_delta(dec!(-300), 0, Favorable::Decrease);
        assert_eq!(delta.text, "▼ 300");
        assert_eq!(delta.favorable, Some(true));
    }
}
