use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{InsightError, Result};
use crate::schema::{RiskProfile, Snapshot};
use crate::utils::round2;

/// The three macro asset classes the advisor reasons about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetClass {
    Equity,
    Debt,
    Cash,
}

impl AssetClass {
    pub const ALL: [AssetClass; 3] = [AssetClass::Equity, AssetClass::Debt, AssetClass::Cash];
}

/// Maps raw snapshot asset categories onto macro classes. The default
/// mapping is a deliberate simplification (real estate is treated as
/// cash-like); it is a table precisely so callers can tune it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryClassMap {
    pub categories: BTreeMap<String, AssetClass>,
}

impl Default for CategoryClassMap {
    fn default() -> Self {
        let mut categories = BTreeMap::new();
        categories.insert("mutual_funds".to_string(), AssetClass::Equity);
        categories.insert("stocks".to_string(), AssetClass::Equity);
        categories.insert("epf".to_string(), AssetClass::Debt);
        categories.insert("fixed_deposits".to_string(), AssetClass::Debt);
        categories.insert("bank_balance".to_string(), AssetClass::Cash);
        categories.insert("real_estate".to_string(), AssetClass::Cash);
        Self { categories }
    }
}

/// Target class weights (fractions summing to 1.0) per risk profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationPolicy {
    pub conservative: BTreeMap<AssetClass, f64>,
    pub moderate: BTreeMap<AssetClass, f64>,
    pub aggressive: BTreeMap<AssetClass, f64>,
}

fn weights(equity: f64, debt: f64, cash: f64) -> BTreeMap<AssetClass, f64> {
    let mut map = BTreeMap::new();
    map.insert(AssetClass::Equity, equity);
    map.insert(AssetClass::Debt, debt);
    map.insert(AssetClass::Cash, cash);
    map
}

impl Default for AllocationPolicy {
    fn default() -> Self {
        Self {
            conservative: weights(0.3, 0.5, 0.2),
            moderate: weights(0.5, 0.3, 0.2),
            aggressive: weights(0.7, 0.2, 0.1),
        }
    }
}

impl AllocationPolicy {
    pub fn for_profile(&self, profile: RiskProfile) -> &BTreeMap<AssetClass, f64> {
        match profile {
            RiskProfile::Conservative => &self.conservative,
            RiskProfile::Moderate => &self.moderate,
            RiskProfile::Aggressive => &self.aggressive,
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (name, table) in [
            ("conservative", &self.conservative),
            ("moderate", &self.moderate),
            ("aggressive", &self.aggressive),
        ] {
            if table.values().any(|&w| w < 0.0) {
                return Err(InsightError::InvalidPolicy {
                    profile: name.to_string(),
                    details: "all weights must be non-negative".to_string(),
                });
            }
            let sum: f64 = table.values().sum();
            if (sum - 1.0).abs() > 0.01 {
                return Err(InsightError::InvalidPolicy {
                    profile: name.to_string(),
                    details: format!("weights must sum to 1.0 (got {})", sum),
                });
            }
        }
        Ok(())
    }
}

/// Recommended equity share by age bracket: each band applies to ages
/// strictly below its bound, checked in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgeEquityBands {
    pub bands: Vec<(u32, f64)>,
    pub fallback_percent: f64,
}

impl Default for AgeEquityBands {
    fn default() -> Self {
        Self {
            bands: vec![(30, 50.0), (51, 40.0)],
            fallback_percent: 30.0,
        }
    }
}

impl AgeEquityBands {
    pub fn recommended_equity_percent(&self, age: u32) -> f64 {
        for &(upper, percent) in &self.bands {
            if age < upper {
                return percent;
            }
        }
        self.fallback_percent
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RebalanceVerdict {
    Buy,
    Sell,
    Hold,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RebalanceAction {
    pub class: AssetClass,
    /// Current aggregated weight, in percentage points.
    pub current_weight: f64,
    /// Target weight from the snapshot's allocation, in percentage points.
    pub target_weight: f64,
    pub verdict: RebalanceVerdict,
    /// Monetary amount to move for Buy/Sell; absent for Hold.
    pub amount: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendedAllocation {
    pub age: u32,
    pub risk_profile: RiskProfile,
    /// Recommended class split in percentage points.
    pub allocation: BTreeMap<AssetClass, f64>,
    pub recommended_equity_percent_for_age: f64,
}

const REBALANCE_THRESHOLD: f64 = 0.05;

/// Compares aggregated current weights against the snapshot's target
/// allocation per class. A gap of strictly more than 5 percentage points
/// triggers Buy/Sell; the boundary itself holds.
pub fn rebalance_portfolio(snapshot: &Snapshot, class_map: &CategoryClassMap) -> Vec<RebalanceAction> {
    let total_value: f64 = class_map
        .categories
        .keys()
        .map(|category| snapshot.asset_value(category))
        .sum();

    let mut current: BTreeMap<AssetClass, f64> = BTreeMap::new();
    for (category, class) in &class_map.categories {
        let weight = if total_value > 0.0 {
            snapshot.asset_value(category) / total_value
        } else {
            0.0
        };
        *current.entry(*class).or_insert(0.0) += weight;
    }

    let target = [
        (AssetClass::Equity, snapshot.asset_allocation.equity / 100.0),
        (AssetClass::Debt, snapshot.asset_allocation.debt / 100.0),
        (AssetClass::Cash, snapshot.asset_allocation.cash / 100.0),
    ];

    target
        .iter()
        .map(|&(class, target_weight)| {
            let current_weight = current.get(&class).copied().unwrap_or(0.0);
            let diff = target_weight - current_weight;

            let verdict = if diff > REBALANCE_THRESHOLD {
                RebalanceVerdict::Buy
            } else if diff < -REBALANCE_THRESHOLD {
                RebalanceVerdict::Sell
            } else {
                RebalanceVerdict::Hold
            };

            let amount = match verdict {
                RebalanceVerdict::Hold => None,
                _ => Some(round2(diff.abs() * total_value)),
            };

            RebalanceAction {
                class,
                current_weight: round2(current_weight * 100.0),
                target_weight: round2(target_weight * 100.0),
                verdict,
                amount,
            }
        })
        .collect()
}

/// Static recommendation from age and risk profile alone, independent of
/// current holdings.
pub fn recommended_allocation(
    snapshot: &Snapshot,
    policy: &AllocationPolicy,
    age_bands: &AgeEquityBands,
) -> RecommendedAllocation {
    let profile = &snapshot.user_profile;
    let table = policy.for_profile(profile.risk_profile);

    RecommendedAllocation {
        age: profile.age,
        risk_profile: profile.risk_profile,
        allocation: table
            .iter()
            .map(|(class, weight)| (*class, round2(weight * 100.0)))
            .collect(),
        recommended_equity_percent_for_age: age_bands.recommended_equity_percent(profile.age),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::AssetValue;

    fn snapshot_with_weights(equity_value: f64, debt_value: f64, cash_value: f64) -> Snapshot {
        let mut snapshot = Snapshot::default();
        snapshot
            .assets
            .insert("stocks".to_string(), AssetValue::Scalar(equity_value));
        snapshot
            .assets
            .insert("epf".to_string(), AssetValue::Scalar(debt_value));
        snapshot
            .assets
            .insert("bank_balance".to_string(), AssetValue::Scalar(cash_value));
        snapshot
    }

    fn action_for(actions: &[RebalanceAction], class: AssetClass) -> &RebalanceAction {
        actions.iter().find(|a| a.class == class).unwrap()
    }

    #[test]
    fn test_underweight_equity_is_a_buy() {
        // Current: equity 40%, debt 30%, cash 30%. Target equity 60%.
        let mut snapshot = snapshot_with_weights(400_000.0, 300_000.0, 300_000.0);
        snapshot.asset_allocation.equity = 60.0;
        snapshot.asset_allocation.debt = 30.0;
        snapshot.asset_allocation.cash = 10.0;

        let actions = rebalance_portfolio(&snapshot, &CategoryClassMap::default());

        let equity = action_for(&actions, AssetClass::Equity);
        assert_eq!(equity.verdict, RebalanceVerdict::Buy);
        assert_eq!(equity.amount, Some(200_000.0)); // 0.20 * 1,000,000

        let cash = action_for(&actions, AssetClass::Cash);
        assert_eq!(cash.verdict, RebalanceVerdict::Sell);

        let debt = action_for(&actions, AssetClass::Debt);
        assert_eq!(debt.verdict, RebalanceVerdict::Hold);
        assert!(debt.amount.is_none());
    }

    #[test]
    fn test_five_point_gap_holds() {
        // Exactly 5pp under target: strict inequality means Hold.
        let mut snapshot = snapshot_with_weights(550_000.0, 250_000.0, 200_000.0);
        snapshot.asset_allocation.equity = 60.0;
        snapshot.asset_allocation.debt = 25.0;
        snapshot.asset_allocation.cash = 15.0;

        let actions = rebalance_portfolio(&snapshot, &CategoryClassMap::default());
        assert_eq!(
            action_for(&actions, AssetClass::Equity).verdict,
            RebalanceVerdict::Hold
        );
    }

    #[test]
    fn test_empty_portfolio_never_panics() {
        let mut snapshot = Snapshot::default();
        snapshot.asset_allocation.equity = 60.0;

        let actions = rebalance_portfolio(&snapshot, &CategoryClassMap::default());
        let equity = action_for(&actions, AssetClass::Equity);
        assert_eq!(equity.verdict, RebalanceVerdict::Buy);
        assert_eq!(equity.amount, Some(0.0));
    }

    #[test]
    fn test_holdings_lists_aggregate_into_classes() {
        use crate::schema::Holding;

        let mut snapshot = Snapshot::default();
        snapshot.assets.insert(
            "mutual_funds".to_string(),
            AssetValue::Holdings(vec![
                Holding {
                    name: "Fund A".to_string(),
                    current_value: 300_000.0,
                    returns: Some(11.0),
                },
                Holding {
                    name: "Fund B".to_string(),
                    current_value: 100_000.0,
                    returns: Some(6.0),
                },
            ]),
        );
        snapshot
            .assets
            .insert("bank_balance".to_string(), AssetValue::Scalar(600_000.0));
        snapshot.asset_allocation.equity = 40.0;
        snapshot.asset_allocation.cash = 60.0;

        let actions = rebalance_portfolio(&snapshot, &CategoryClassMap::default());
        assert_eq!(action_for(&actions, AssetClass::Equity).current_weight, 40.0);
        assert_eq!(action_for(&actions, AssetClass::Cash).current_weight, 60.0);
    }

    #[test]
    fn test_recommended_allocation_per_profile() {
        let mut snapshot = Snapshot::default();
        snapshot.user_profile.age = 26;
        snapshot.user_profile.risk_profile = RiskProfile::Aggressive;

        let rec = recommended_allocation(
            &snapshot,
            &AllocationPolicy::default(),
            &AgeEquityBands::default(),
        );
        assert_eq!(rec.allocation[&AssetClass::Equity], 70.0);
        assert_eq!(rec.allocation[&AssetClass::Cash], 10.0);
        assert_eq!(rec.recommended_equity_percent_for_age, 50.0);
    }

    #[test]
    fn test_age_bands() {
        let bands = AgeEquityBands::default();
        assert_eq!(bands.recommended_equity_percent(29), 50.0);
        assert_eq!(bands.recommended_equity_percent(30), 40.0);
        assert_eq!(bands.recommended_equity_percent(50), 40.0);
        assert_eq!(bands.recommended_equity_percent(51), 30.0);
    }

    #[test]
    fn test_policy_validation() {
        assert!(AllocationPolicy::default().validate().is_ok());

        let mut bad = AllocationPolicy::default();
        bad.moderate = weights(0.9, 0.9, 0.2);
        assert!(bad.validate().is_err());

        let mut negative = AllocationPolicy::default();
        negative.conservative = weights(1.2, -0.4, 0.2);
        assert!(negative.validate().is_err());
    }
}
