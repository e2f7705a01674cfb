use serde::{Deserialize, Serialize};

use crate::emi::emi;
use crate::schema::Snapshot;
use crate::utils::round2;

/// The loan the user is asking about.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LoanRequest {
    pub amount: f64,
    pub annual_rate_percent: f64,
    pub tenure_years: u32,
}

impl Default for LoanRequest {
    fn default() -> Self {
        Self {
            amount: 5_000_000.0,
            annual_rate_percent: 8.0,
            tenure_years: 20,
        }
    }
}

/// Rate and tenure assumed when converting outstanding liability amounts
/// into a monthly EMI burden. The snapshot only records outstanding
/// principal, so the terms of existing debt have to be assumed; they are
/// an explicit knob here rather than a buried constant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ExistingDebtAssumptions {
    pub annual_rate_percent: f64,
    pub tenure_years: u32,
}

impl Default for ExistingDebtAssumptions {
    fn default() -> Self {
        Self {
            annual_rate_percent: 8.0,
            tenure_years: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanDecision {
    pub eligible: bool,
    pub requested_emi: f64,
    pub existing_emi: f64,
    pub max_affordable_emi: f64,
}

/// Outcome of an eligibility check. A snapshot without salary data gets
/// its own variant instead of a misleading numeric answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoanAssessment {
    NoSalaryData,
    Assessed(LoanDecision),
}

/// Eligible iff the requested EMI plus the assumed EMI burden of existing
/// liabilities fits within `affordability_ratio` of monthly salary.
pub fn assess_loan(
    snapshot: &Snapshot,
    request: &LoanRequest,
    affordability_ratio: f64,
    existing_debt: &ExistingDebtAssumptions,
) -> LoanAssessment {
    let monthly_salary = snapshot.monthly_salary();
    if monthly_salary == 0.0 {
        return LoanAssessment::NoSalaryData;
    }

    let max_affordable_emi = monthly_salary * affordability_ratio;
    let requested_emi = emi(request.amount, request.annual_rate_percent, request.tenure_years);

    let existing_emi: f64 = snapshot
        .liabilities
        .values()
        .map(|&amount| {
            emi(
                amount,
                existing_debt.annual_rate_percent,
                existing_debt.tenure_years,
            )
        })
        .sum();

    LoanAssessment::Assessed(LoanDecision {
        eligible: existing_emi + requested_emi <= max_affordable_emi,
        requested_emi: round2(requested_emi),
        existing_emi: round2(existing_emi),
        max_affordable_emi: round2(max_affordable_emi),
    })
}
