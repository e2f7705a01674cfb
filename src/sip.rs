use serde::{Deserialize, Serialize};

use crate::schema::Snapshot;
use crate::utils::round2;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundPerformance {
    pub name: String,
    pub current_value: f64,
    /// Annualized return percent; 0 when the snapshot omits it.
    pub returns: f64,
}

/// Review of the snapshot's SIP holdings against a return threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SipPerformance {
    NoFunds,
    Reviewed {
        threshold_percent: f64,
        underperformers: Vec<FundPerformance>,
        fund_count: usize,
    },
}

/// Flags mutual funds returning less than `threshold_percent` per annum.
/// Funds without a recorded return are treated as 0% and flagged.
pub fn review_sip_performance(snapshot: &Snapshot, threshold_percent: f64) -> SipPerformance {
    let funds = snapshot.mutual_funds();
    if funds.is_empty() {
        return SipPerformance::NoFunds;
    }

    let underperformers = funds
        .iter()
        .filter(|fund| fund.returns.unwrap_or(0.0) < threshold_percent)
        .map(|fund| FundPerformance {
            name: fund.name.clone(),
            current_value: fund.current_value,
            returns: fund.returns.unwrap_or(0.0),
        })
        .collect();

    SipPerformance::Reviewed {
        threshold_percent,
        underperformers,
        fund_count: funds.len(),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SipProjection {
    pub name: String,
    pub monthly_contribution: f64,
    pub annual_rate_percent: f64,
    pub horizon_years: u32,
    pub total_invested: f64,
    /// Future value of the contributions, annuity-due.
    pub projected_value: f64,
}

/// Future value of a recurring monthly contribution compounded monthly
/// with contributions at the start of each month. A zero rate degenerates
/// to the plain contribution total.
pub fn sip_future_value(monthly: f64, annual_rate_percent: f64, years: u32) -> f64 {
    let months = (years * 12) as f64;
    if monthly <= 0.0 || years == 0 {
        return 0.0;
    }

    let i = annual_rate_percent / 1200.0;
    if i == 0.0 {
        return monthly * months;
    }

    monthly * (((1.0 + i).powf(months) - 1.0) / i) * (1.0 + i)
}

/// Projects each fund's monthly SIP forward over `horizon_years` at the
/// fund's own recorded return rate. Funds without a SIP contribution are
/// skipped.
pub fn project_sips(snapshot: &Snapshot, horizon_years: u32) -> Vec<SipProjection> {
    snapshot
        .mutual_funds()
        .iter()
        .filter_map(|fund| {
            let monthly = snapshot
                .contributions
                .monthly_sip
                .get(&fund.name)
                .copied()
                .unwrap_or(0.0);
            if monthly <= 0.0 {
                return None;
            }

            let rate = fund.returns.unwrap_or(0.0);
            Some(SipProjection {
                name: fund.name.clone(),
                monthly_contribution: monthly,
                annual_rate_percent: rate,
                horizon_years,
                total_invested: monthly * (horizon_years * 12) as f64,
                projected_value: round2(sip_future_value(monthly, rate, horizon_years)),
            })
        })
        .collect()
}
