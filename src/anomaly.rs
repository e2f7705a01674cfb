use serde::{Deserialize, Serialize};

use crate::schema::Snapshot;
use crate::utils::round2;

/// Screening thresholds for the anomaly checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnomalyThresholds {
    pub low_bank_balance: f64,
    pub low_credit_score: u32,
    pub high_liabilities: f64,
    /// Expense months above mean + this many standard deviations flag.
    pub expense_sigma: f64,
}

impl Default for AnomalyThresholds {
    fn default() -> Self {
        Self {
            low_bank_balance: 10_000.0,
            low_credit_score: 650,
            high_liabilities: 1_000_000.0,
            expense_sigma: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Anomaly {
    LowBankBalance {
        balance: f64,
    },
    NegativeFundReturn {
        fund: String,
        returns: f64,
    },
    LowCreditScore {
        score: u32,
    },
    HighLiabilities {
        total: f64,
    },
    ExpenseOutlier {
        month: String,
        expenses: f64,
        threshold: f64,
    },
}

/// Screens the snapshot for unusual conditions: a drained bank balance,
/// funds losing money, a weak credit score, an outsized debt load, and
/// expense months far above the historical mean. Returns an empty list
/// for a clean snapshot; missing sections are skipped, never an error.
pub fn detect_anomalies(snapshot: &Snapshot, thresholds: &AnomalyThresholds) -> Vec<Anomaly> {
    let mut anomalies = Vec::new();

    let balance = snapshot.bank_balance();
    if balance < thresholds.low_bank_balance {
        anomalies.push(Anomaly::LowBankBalance { balance });
    }

    for fund in snapshot.mutual_funds() {
        if let Some(returns) = fund.returns {
            if returns < 0.0 {
                anomalies.push(Anomaly::NegativeFundReturn {
                    fund: fund.name.clone(),
                    returns,
                });
            }
        }
    }

    if let Some(score) = snapshot.credit_score {
        if score > 0 && score < thresholds.low_credit_score {
            anomalies.push(Anomaly::LowCreditScore { score });
        }
    }

    let total_liabilities = snapshot.total_liabilities();
    if total_liabilities > thresholds.high_liabilities {
        anomalies.push(Anomaly::HighLiabilities {
            total: total_liabilities,
        });
    }

    anomalies.extend(expense_outliers(snapshot, thresholds.expense_sigma));

    anomalies
}

fn expense_outliers(snapshot: &Snapshot, sigma: f64) -> Vec<Anomaly> {
    let history = &snapshot.expense_history;
    if history.len() < 2 {
        return Vec::new();
    }

    let n = history.len() as f64;
    let mean = history.iter().map(|p| p.expenses).sum::<f64>() / n;
    let variance = history
        .iter()
        .map(|p| (p.expenses - mean).powi(2))
        .sum::<f64>()
        / n;
    let threshold = mean + sigma * variance.sqrt();

    history
        .iter()
        .filter(|p| p.expenses > threshold)
        .map(|p| Anomaly::ExpenseOutlier {
            month: p.month.clone(),
            expenses: p.expenses,
            threshold: round2(threshold),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{AssetValue, ExpensePoint, Holding};

    #[test]
    fn test_clean_snapshot_with_no_sections() {
        // An empty snapshot has a 0 bank balance, which is itself a flag;
        // everything else is silent.
        let anomalies = detect_anomalies(&Snapshot::default(), &AnomalyThresholds::default());
        assert_eq!(anomalies, vec![Anomaly::LowBankBalance { balance: 0.0 }]);
    }

    #[test]
    fn test_healthy_snapshot_is_clean() {
        let mut snapshot = Snapshot::default();
        snapshot
            .assets
            .insert("bank_balance".to_string(), AssetValue::Scalar(520_000.0));
        snapshot.credit_score = Some(765);
        snapshot
            .liabilities
            .insert("car_loan".to_string(), 200_000.0);

        let anomalies = detect_anomalies(&snapshot, &AnomalyThresholds::default());
        assert!(anomalies.is_empty());
    }

    #[test]
    fn test_negative_returns_and_low_score() {
        let mut snapshot = Snapshot::default();
        snapshot
            .assets
            .insert("bank_balance".to_string(), AssetValue::Scalar(50_000.0));
        snapshot.assets.insert(
            "mutual_funds".to_string(),
            AssetValue::Holdings(vec![Holding {
                name: "Sinking Fund".to_string(),
                current_value: 40_000.0,
                returns: Some(-3.2),
            }]),
        );
        snapshot.credit_score = Some(610);

        let anomalies = detect_anomalies(&snapshot, &AnomalyThresholds::default());
        assert!(anomalies.contains(&Anomaly::NegativeFundReturn {
            fund: "Sinking Fund".to_string(),
            returns: -3.2,
        }));
        assert!(anomalies.contains(&Anomaly::LowCreditScore { score: 610 }));
    }

    #[test]
    fn test_high_liabilities_flag() {
        let mut snapshot = Snapshot::default();
        snapshot
            .assets
            .insert("bank_balance".to_string(), AssetValue::Scalar(100_000.0));
        snapshot
            .liabilities
            .insert("home_loan".to_string(), 1_800_000.0);

        let anomalies = detect_anomalies(&snapshot, &AnomalyThresholds::default());
        assert!(anomalies.contains(&Anomaly::HighLiabilities { total: 1_800_000.0 }));
    }

    #[test]
    fn test_expense_outlier_detection() {
        let mut snapshot = Snapshot::default();
        snapshot
            .assets
            .insert("bank_balance".to_string(), AssetValue::Scalar(100_000.0));
        snapshot.expense_history = (1..=8)
            .map(|m| ExpensePoint {
                month: format!("2024-{:02}", m),
                expenses: 30_000.0,
            })
            .chain(std::iter::once(ExpensePoint {
                month: "2024-09".to_string(),
                expenses: 90_000.0,
            }))
            .collect();

        let anomalies = detect_anomalies(&snapshot, &AnomalyThresholds::default());
        let outliers: Vec<_> = anomalies
            .iter()
            .filter(|a| matches!(a, Anomaly::ExpenseOutlier { .. }))
            .collect();
        assert_eq!(outliers.len(), 1);
        match outliers[0] {
            Anomaly::ExpenseOutlier { month, .. } => assert_eq!(month, "2024-09"),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_short_history_skips_outlier_check() {
        let mut snapshot = Snapshot::default();
        snapshot
            .assets
            .insert("bank_balance".to_string(), AssetValue::Scalar(100_000.0));
        snapshot.expense_history = vec![ExpensePoint {
            month: "2024-01".to_string(),
            expenses: 500_000.0,
        }];

        let anomalies = detect_anomalies(&snapshot, &AnomalyThresholds::default());
        assert!(anomalies.is_empty());
    }
}
