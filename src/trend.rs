use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::schema::Snapshot;
use crate::utils::{parse_month, round2};

/// One observation in a time-ordered series.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrendPoint {
    pub period: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendClassification {
    /// Percent change >= 20.
    StrongGrowth,
    /// Percent change in [0, 20).
    MildGrowth,
    /// Percent change < 0.
    Decline,
}

impl TrendClassification {
    fn for_percent_change(percent_change: f64) -> Self {
        if percent_change >= 20.0 {
            TrendClassification::StrongGrowth
        } else if percent_change >= 0.0 {
            TrendClassification::MildGrowth
        } else {
            TrendClassification::Decline
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendReport {
    pub start_period: NaiveDate,
    pub end_period: NaiveDate,
    pub start_value: f64,
    pub end_value: f64,
    pub change: f64,
    /// 0 when the start value is 0.
    pub percent_change: f64,
    pub classification: TrendClassification,
}

/// Trend over a series, or a sentinel when the series is empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TrendAnalysis {
    NoData,
    Trend(TrendReport),
}

/// Computes start/end/change over the series, sorted ascending by period.
/// A single-point series reports zero change.
pub fn analyze_trend(points: &[TrendPoint]) -> TrendAnalysis {
    if points.is_empty() {
        return TrendAnalysis::NoData;
    }

    let mut sorted = points.to_vec();
    sorted.sort_by_key(|p| p.period);

    let first = sorted[0];
    let last = sorted[sorted.len() - 1];

    let change = last.value - first.value;
    let percent_change = if first.value != 0.0 {
        change / first.value * 100.0
    } else {
        0.0
    };
    let percent_change = round2(percent_change);

    TrendAnalysis::Trend(TrendReport {
        start_period: first.period,
        end_period: last.period,
        start_value: first.value,
        end_value: last.value,
        change: round2(change),
        percent_change,
        classification: TrendClassification::for_percent_change(percent_change),
    })
}

/// Trend over the snapshot's net worth history.
pub fn net_worth_trend(snapshot: &Snapshot) -> Result<TrendAnalysis> {
    let points = snapshot
        .net_worth_history
        .iter()
        .map(|p| {
            Ok(TrendPoint {
                period: parse_month(&p.month)?,
                value: p.value,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(analyze_trend(&points))
}

/// Trend over the snapshot's monthly expenses.
pub fn expense_trend(snapshot: &Snapshot) -> Result<TrendAnalysis> {
    let points = snapshot
        .expense_history
        .iter()
        .map(|p| {
            Ok(TrendPoint {
                period: parse_month(&p.month)?,
                value: p.expenses,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(analyze_trend(&points))
}
