use serde::{Deserialize, Serialize};

use crate::allocation::AgeEquityBands;
use crate::schema::Snapshot;
use crate::utils::round2;

/// Compound growth of a lump sum over whole years.
pub fn future_value(present_value: f64, annual_rate: f64, years: u32) -> f64 {
    present_value * (1.0 + annual_rate).powi(years as i32)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetirementScenario {
    pub scenario: String,
    pub annual_rate: f64,
    pub projected_amount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquityCheck {
    BelowRecommended,
    WithinRecommended,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquityAllocationCheck {
    pub current_equity_percent: f64,
    pub recommended_equity_percent: f64,
    pub verdict: EquityCheck,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section80cStatus {
    pub limit: f64,
    pub utilized: f64,
    /// Headroom left under the ceiling; 0 when fully utilized.
    pub remaining: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerReport {
    /// 0 once the retirement age has been reached or passed.
    pub years_to_retirement: u32,
    /// How many months the emergency fund covers at the average monthly
    /// spend; absent without expense history.
    pub cash_reserve_months: Option<f64>,
    pub equity_allocation: EquityAllocationCheck,
    /// Savings accumulated by the target age, compounding yearly at the
    /// snapshot's assumed real return (equity return minus inflation).
    pub target_age: u32,
    pub savings_at_target_age: f64,
    pub retirement_scenarios: Vec<RetirementScenario>,
    pub section_80c: Section80cStatus,
}

const RETIREMENT_SCENARIOS: [(&str, f64); 3] = [
    ("Conservative", 0.04),
    ("Moderate", 0.06),
    ("Aggressive", 0.08),
];

/// Derives the personalized planning insights: retirement runway, cash
/// reserve coverage, equity positioning for the user's age, and savings
/// projections under three return scenarios.
pub fn plan(snapshot: &Snapshot, target_age: u32, age_bands: &AgeEquityBands) -> PlannerReport {
    let profile = &snapshot.user_profile;
    let years_to_retirement = profile.retirement_age.saturating_sub(profile.age);

    let cash_reserve_months = snapshot
        .average_monthly_expenses()
        .filter(|&avg| avg > 0.0)
        .map(|avg| round2(snapshot.emergency_fund / avg));

    let recommended_equity = age_bands.recommended_equity_percent(profile.age);
    let current_equity = snapshot.asset_allocation.equity;
    let equity_allocation = EquityAllocationCheck {
        current_equity_percent: current_equity,
        recommended_equity_percent: recommended_equity,
        verdict: if current_equity < recommended_equity {
            EquityCheck::BelowRecommended
        } else {
            EquityCheck::WithinRecommended
        },
    };

    let assumptions = &snapshot.projection_assumptions;
    let real_rate =
        (assumptions.equity_return_percent - assumptions.inflation_rate_percent) / 100.0;
    let annual_savings = snapshot.monthly_savings() * 12.0;

    let years_to_target = target_age.saturating_sub(profile.age);
    let mut corpus = 0.0;
    for _ in 0..years_to_target {
        corpus = (corpus + annual_savings) * (1.0 + real_rate);
    }

    let retirement_scenarios = RETIREMENT_SCENARIOS
        .iter()
        .map(|&(name, rate)| RetirementScenario {
            scenario: name.to_string(),
            annual_rate: rate,
            projected_amount: round2(future_value(corpus, rate, years_to_retirement)),
        })
        .collect();

    let deductions = &snapshot.tax_info.deductions;
    let section_80c = Section80cStatus {
        limit: deductions.limit_80c,
        utilized: deductions.utilized_80c,
        remaining: (deductions.limit_80c - deductions.utilized_80c).max(0.0),
    };

    PlannerReport {
        years_to_retirement,
        cash_reserve_months,
        equity_allocation,
        target_age,
        savings_at_target_age: round2(corpus),
        retirement_scenarios,
        section_80c,
    }
}
