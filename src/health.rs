use serde::{Deserialize, Serialize};

use crate::schema::Snapshot;
use crate::utils::{cap_percent, round2};

/// Asset categories that count towards diversification. A category
/// counts when it holds more than 5% of total assets.
pub const DIVERSIFICATION_CATEGORIES: [&str; 5] = [
    "mutual_funds",
    "stocks",
    "epf",
    "fixed_deposits",
    "real_estate",
];

const MEANINGFUL_ALLOCATION: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthTier {
    /// Score >= 75.
    Healthy,
    /// 50 <= score < 75.
    Caution,
    /// Score < 50.
    Critical,
}

impl HealthTier {
    fn for_score(score: f64) -> Self {
        if score >= 75.0 {
            HealthTier::Healthy
        } else if score >= 50.0 {
            HealthTier::Caution
        } else {
            HealthTier::Critical
        }
    }
}

/// The capped inputs to the weighted score, kept alongside the final
/// number so the presentation layer can explain it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthComponents {
    /// Monthly savings as a percent of salary, capped to [0, 100].
    pub savings_percent: f64,
    /// Total liabilities as a percent of annual salary (uncapped).
    pub debt_to_income_percent: f64,
    /// Share of diversification categories holding > 5% of assets, as a percent.
    pub diversification_percent: f64,
    /// (bank balance + emergency fund) / total debt; 1.0 when debt-free.
    pub liquidity_ratio: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthScore {
    /// Weighted score in [0, 100], rounded to 2 decimals.
    pub score: f64,
    pub tier: HealthTier,
    pub components: HealthComponents,
}

/// Combines savings rate, debt-to-income, diversification, and liquidity
/// into a single 0-100 score. Pure and deterministic: identical snapshots
/// always yield identical scores.
pub fn financial_health_score(snapshot: &Snapshot) -> HealthScore {
    let monthly_salary = snapshot.monthly_salary();
    let total_debt = snapshot.total_liabilities();
    let total_assets = snapshot.total_assets();

    let savings_percent = if monthly_salary > 0.0 {
        snapshot.monthly_savings() / monthly_salary * 100.0
    } else {
        0.0
    };

    let debt_to_income_percent = if monthly_salary > 0.0 {
        total_debt / (monthly_salary * 12.0) * 100.0
    } else {
        0.0
    };

    let diversified_count = DIVERSIFICATION_CATEGORIES
        .iter()
        .filter(|&&category| {
            total_assets > 0.0
                && snapshot.asset_value(category) / total_assets > MEANINGFUL_ALLOCATION
        })
        .count();
    let diversification_percent =
        diversified_count as f64 / DIVERSIFICATION_CATEGORIES.len() as f64 * 100.0;

    let liquidity_ratio = if total_debt > 0.0 {
        (snapshot.bank_balance() + snapshot.emergency_fund) / total_debt
    } else {
        1.0
    };

    let score = 0.3 * cap_percent(savings_percent)
        + 0.3 * (100.0 - debt_to_income_percent).max(0.0)
        + 0.2 * diversification_percent
        + 0.2 * cap_percent(liquidity_ratio * 100.0);

    let score = round2(score);

    HealthScore {
        score,
        tier: HealthTier::for_score(score),
        components: HealthComponents {
            savings_percent: round2(cap_percent(savings_percent)),
            debt_to_income_percent: round2(debt_to_income_percent),
            diversification_percent: round2(diversification_percent),
            liquidity_ratio: round2(liquidity_ratio),
        },
    }
}
