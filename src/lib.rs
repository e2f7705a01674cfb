//! # Financial Insights
//!
//! A library for computing deterministic personal-finance insights from a
//! point-in-time JSON snapshot of a user's finances.
//!
//! ## Core Concepts
//!
//! - **Snapshot**: one immutable record (income, assets, liabilities,
//!   histories) loaded by the caller and passed by reference
//! - **Calculators**: independent, stateless functions — health score,
//!   loan eligibility, trend analysis, rebalancing advice, SIP review,
//!   anomaly screening, planning projections
//! - **Structured results**: numbers, enumerated labels, and records;
//!   formatting is the presentation layer's concern
//! - **Totality**: every calculator returns a well-formed value for any
//!   well-typed snapshot, including an empty one; missing data yields
//!   zero defaults or an explicit "insufficient data" variant
//!
//! ## Example
//!
//! ```rust,ignore
//! use financial_insights::{AnalyzerConfig, Snapshot, SnapshotAnalyzer};
//!
//! let snapshot = Snapshot::from_path("snapshot.json".as_ref())?;
//! let analyzer = SnapshotAnalyzer::new(AnalyzerConfig::default())?;
//! let report = analyzer.analyze(&snapshot)?;
//! println!("health score: {}", report.health.score);
//! ```

pub mod allocation;
pub mod anomaly;
pub mod emi;
pub mod error;
pub mod health;
pub mod loan;
pub mod planner;
pub mod schema;
pub mod sip;
pub mod trend;
pub mod utils;

pub use allocation::{
    rebalance_portfolio, recommended_allocation, AgeEquityBands, AllocationPolicy, AssetClass,
    CategoryClassMap, RebalanceAction, RebalanceVerdict, RecommendedAllocation,
};
pub use anomaly::{detect_anomalies, Anomaly, AnomalyThresholds};
pub use emi::emi;
pub use error::{InsightError, Result};
pub use health::{financial_health_score, HealthComponents, HealthScore, HealthTier};
pub use loan::{assess_loan, ExistingDebtAssumptions, LoanAssessment, LoanDecision, LoanRequest};
pub use planner::{plan, PlannerReport, RetirementScenario, Section80cStatus};
pub use schema::*;
pub use sip::{project_sips, review_sip_performance, SipPerformance, SipProjection};
pub use trend::{
    analyze_trend, expense_trend, net_worth_trend, TrendAnalysis, TrendClassification,
    TrendPoint, TrendReport,
};

use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Every tunable the calculators accept, with defaults matching the
/// behavior the heuristics were tuned with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Fraction of monthly salary considered a serviceable EMI load.
    pub affordability_ratio: f64,
    /// Assumed terms for converting existing liabilities into EMIs.
    pub existing_debt: ExistingDebtAssumptions,
    /// Annual return below which a SIP counts as underperforming.
    pub sip_underperformance_threshold: f64,
    /// Horizon for SIP future-value projections.
    pub sip_horizon_years: u32,
    /// Age by which the savings projection is evaluated.
    pub planning_target_age: u32,
    pub anomaly_thresholds: AnomalyThresholds,
    pub category_class_map: CategoryClassMap,
    pub allocation_policy: AllocationPolicy,
    pub age_equity_bands: AgeEquityBands,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            affordability_ratio: 0.35,
            existing_debt: ExistingDebtAssumptions::default(),
            sip_underperformance_threshold: 8.0,
            sip_horizon_years: 5,
            planning_target_age: 40,
            anomaly_thresholds: AnomalyThresholds::default(),
            category_class_map: CategoryClassMap::default(),
            allocation_policy: AllocationPolicy::default(),
            age_equity_bands: AgeEquityBands::default(),
        }
    }
}

impl AnalyzerConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.affordability_ratio > 0.0 && self.affordability_ratio <= 1.0) {
            return Err(InsightError::InvalidAffordabilityRatio(
                self.affordability_ratio,
            ));
        }
        if self.sip_horizon_years == 0 {
            return Err(InsightError::ValidationError {
                field: "sip_horizon_years".to_string(),
                details: "projection horizon must be at least one year".to_string(),
            });
        }
        self.allocation_policy.validate()?;
        Ok(())
    }
}

/// Everything the calculators derive from one snapshot, serializable for
/// the presentation or agent layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightReport {
    pub health: HealthScore,
    pub net_worth: TrendAnalysis,
    pub expenses: TrendAnalysis,
    pub rebalance: Vec<RebalanceAction>,
    pub recommended_allocation: RecommendedAllocation,
    pub sip_performance: SipPerformance,
    pub sip_projections: Vec<SipProjection>,
    pub anomalies: Vec<Anomaly>,
    pub planner: PlannerReport,
}

/// Runs every calculator over one snapshot with a validated configuration.
/// Holds no per-snapshot state; one analyzer can serve any number of
/// independent snapshots.
pub struct SnapshotAnalyzer {
    config: AnalyzerConfig,
}

impl SnapshotAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn analyze(&self, snapshot: &Snapshot) -> Result<InsightReport> {
        info!(
            "Analyzing snapshot: {} asset categories, {} liabilities",
            snapshot.assets.len(),
            snapshot.liabilities.len()
        );

        let health = financial_health_score(snapshot);
        debug!("Health score {} ({:?})", health.score, health.tier);

        let anomalies = detect_anomalies(snapshot, &self.config.anomaly_thresholds);
        if !anomalies.is_empty() {
            debug!("{} anomalies flagged", anomalies.len());
        }

        Ok(InsightReport {
            health,
            net_worth: net_worth_trend(snapshot)?,
            expenses: expense_trend(snapshot)?,
            rebalance: rebalance_portfolio(snapshot, &self.config.category_class_map),
            recommended_allocation: recommended_allocation(
                snapshot,
                &self.config.allocation_policy,
                &self.config.age_equity_bands,
            ),
            sip_performance: review_sip_performance(
                snapshot,
                self.config.sip_underperformance_threshold,
            ),
            sip_projections: project_sips(snapshot, self.config.sip_horizon_years),
            anomalies,
            planner: plan(
                snapshot,
                self.config.planning_target_age,
                &self.config.age_equity_bands,
            ),
        })
    }

    /// Loan eligibility for an explicit request, using the configured
    /// affordability ratio and existing-debt assumptions.
    pub fn assess_loan(&self, snapshot: &Snapshot, request: &LoanRequest) -> LoanAssessment {
        assess_loan(
            snapshot,
            request,
            self.config.affordability_ratio,
            &self.config.existing_debt,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AnalyzerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_bad_affordability_ratio_rejected() {
        let mut config = AnalyzerConfig::default();
        config.affordability_ratio = 0.0;
        assert!(SnapshotAnalyzer::new(config).is_err());

        let mut config = AnalyzerConfig::default();
        config.affordability_ratio = 1.5;
        assert!(SnapshotAnalyzer::new(config).is_err());
    }

    #[test]
    fn test_empty_snapshot_produces_full_report() {
        let analyzer = SnapshotAnalyzer::new(AnalyzerConfig::default()).unwrap();
        let report = analyzer.analyze(&Snapshot::default()).unwrap();

        assert_eq!(report.health.score, 50.0);
        assert!(matches!(report.net_worth, TrendAnalysis::NoData));
        assert!(matches!(report.expenses, TrendAnalysis::NoData));
        assert!(matches!(report.sip_performance, SipPerformance::NoFunds));
        assert!(report.sip_projections.is_empty());
        assert_eq!(report.rebalance.len(), 3);
    }

    #[test]
    fn test_report_round_trips_through_json() {
        let analyzer = SnapshotAnalyzer::new(AnalyzerConfig::default()).unwrap();
        let report = analyzer.analyze(&Snapshot::default()).unwrap();

        let json = serde_json::to_string(&report).unwrap();
        let back: InsightReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.health.score, report.health.score);
    }

    #[test]
    fn test_analysis_is_deterministic() {
        let analyzer = SnapshotAnalyzer::new(AnalyzerConfig::default()).unwrap();
        let mut snapshot = Snapshot::default();
        snapshot.income.monthly_salary = 60_000.0;
        snapshot.contributions.monthly_savings = 15_000.0;

        let first = analyzer.analyze(&snapshot).unwrap();
        let second = analyzer.analyze(&snapshot).unwrap();
        assert_eq!(first.health.score, second.health.score);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
