use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::Result;

/// A single valued holding inside an asset category (e.g. one mutual fund).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Holding {
    #[schemars(description = "Display name of the holding (e.g. 'Axis Bluechip Fund')")]
    pub name: String,

    #[schemars(description = "Current market value of the holding in the account currency")]
    #[serde(default)]
    pub current_value: f64,

    #[schemars(
        description = "Annualized return percentage for this holding, if known (e.g. 12.5 for 12.5% p.a.)"
    )]
    #[serde(default)]
    pub returns: Option<f64>,
}

/// An asset category's value: either a direct scalar amount (e.g.
/// 'bank_balance': 520000) or a list of individual holdings (e.g.
/// 'mutual_funds': [...]). The accessor methods on [`Snapshot`] are the
/// single normalization point for this union.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum AssetValue {
    #[schemars(description = "Direct monetary value of the category")]
    Scalar(f64),

    #[schemars(description = "Individual holdings whose current values sum to the category total")]
    Holdings(Vec<Holding>),
}

impl AssetValue {
    /// Total monetary value of the category. Holdings missing a value
    /// contribute 0.
    pub fn total(&self) -> f64 {
        match self {
            AssetValue::Scalar(value) => *value,
            AssetValue::Holdings(holdings) => holdings.iter().map(|h| h.current_value).sum(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct Income {
    #[schemars(description = "Gross monthly salary. 0 or absent when unknown.")]
    #[serde(default)]
    pub monthly_salary: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct Contributions {
    #[schemars(description = "Total amount saved per month across all instruments")]
    #[serde(default)]
    pub monthly_savings: f64,

    #[schemars(description = "Monthly SIP contribution per mutual fund, keyed by fund name")]
    #[serde(default)]
    pub monthly_sip: BTreeMap<String, f64>,
}

/// Target asset-class split, in percentage points summing to roughly 100.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct AssetAllocation {
    #[serde(default)]
    pub equity: f64,
    #[serde(default)]
    pub debt: f64,
    #[serde(default)]
    pub cash: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HistoryPoint {
    #[schemars(description = "Calendar month in YYYY-MM format")]
    pub month: String,

    #[schemars(description = "Net worth at the end of that month")]
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExpensePoint {
    #[schemars(description = "Calendar month in YYYY-MM format")]
    pub month: String,

    #[schemars(description = "Total expenses for that month")]
    pub expenses: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum RiskProfile {
    #[schemars(description = "Capital preservation first; low equity exposure")]
    Conservative,

    #[default]
    #[schemars(description = "Balanced growth and stability (default)")]
    Moderate,

    #[schemars(description = "Growth first; high equity exposure")]
    Aggressive,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UserProfile {
    #[schemars(description = "Current age in years")]
    #[serde(default)]
    pub age: u32,

    #[schemars(description = "Intended retirement age in years")]
    #[serde(default = "default_retirement_age")]
    pub retirement_age: u32,

    #[schemars(description = "Self-declared risk appetite")]
    #[serde(default)]
    pub risk_profile: RiskProfile,
}

fn default_retirement_age() -> u32 {
    60
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            age: 0,
            retirement_age: default_retirement_age(),
            risk_profile: RiskProfile::default(),
        }
    }
}

/// Section 80C tax-deduction status, carried through as snapshot data.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Deductions {
    #[schemars(description = "Statutory 80C deduction ceiling for the fiscal year")]
    #[serde(rename = "80C_limit", default = "default_80c_limit")]
    pub limit_80c: f64,

    #[schemars(description = "Amount of the 80C ceiling already utilized")]
    #[serde(rename = "80C_utilized", default)]
    pub utilized_80c: f64,
}

fn default_80c_limit() -> f64 {
    150_000.0
}

impl Default for Deductions {
    fn default() -> Self {
        Self {
            limit_80c: default_80c_limit(),
            utilized_80c: 0.0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct TaxInfo {
    #[serde(default)]
    pub deductions: Deductions,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ProjectionAssumptions {
    #[schemars(description = "Assumed long-run equity return, percent per annum")]
    #[serde(default = "default_equity_return")]
    pub equity_return_percent: f64,

    #[schemars(description = "Assumed inflation rate, percent per annum")]
    #[serde(default = "default_inflation")]
    pub inflation_rate_percent: f64,
}

fn default_equity_return() -> f64 {
    10.0
}

fn default_inflation() -> f64 {
    5.0
}

impl Default for ProjectionAssumptions {
    fn default() -> Self {
        Self {
            equity_return_percent: default_equity_return(),
            inflation_rate_percent: default_inflation(),
        }
    }
}

/// A point-in-time structured record of a user's financial state. Every
/// section is optional; absent sections normalize to zero/empty so that
/// every calculator stays total over any well-typed input.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct Snapshot {
    #[serde(default)]
    pub income: Income,

    #[schemars(description = "Outstanding amount per liability, keyed by liability name")]
    #[serde(default)]
    pub liabilities: BTreeMap<String, f64>,

    #[schemars(
        description = "Asset categories keyed by name (e.g. 'bank_balance', 'mutual_funds'). Values are either a direct amount or a list of holdings."
    )]
    #[serde(default)]
    pub assets: BTreeMap<String, AssetValue>,

    #[schemars(description = "Target equity/debt/cash split in percentage points")]
    #[serde(default)]
    pub asset_allocation: AssetAllocation,

    #[serde(default)]
    pub contributions: Contributions,

    #[schemars(description = "Liquid emergency reserve held outside the bank balance")]
    #[serde(default)]
    pub emergency_fund: f64,

    #[schemars(description = "Monthly expense totals, oldest first")]
    #[serde(default)]
    pub expense_history: Vec<ExpensePoint>,

    #[schemars(description = "Monthly net worth values, oldest first")]
    #[serde(default)]
    pub net_worth_history: Vec<HistoryPoint>,

    #[schemars(description = "Bureau credit score, typically 300-900")]
    #[serde(default)]
    pub credit_score: Option<u32>,

    #[serde(default)]
    pub user_profile: UserProfile,

    #[serde(default)]
    pub tax_info: TaxInfo,

    #[serde(default)]
    pub projection_assumptions: ProjectionAssumptions,
}

impl Snapshot {
    /// Total value of one asset category; 0 when the category is absent.
    pub fn asset_value(&self, category: &str) -> f64 {
        self.assets.get(category).map_or(0.0, AssetValue::total)
    }

    /// Sum of all asset categories.
    pub fn total_assets(&self) -> f64 {
        self.assets.values().map(AssetValue::total).sum()
    }

    /// Sum of all outstanding liabilities.
    pub fn total_liabilities(&self) -> f64 {
        self.liabilities.values().sum()
    }

    pub fn bank_balance(&self) -> f64 {
        self.asset_value("bank_balance")
    }

    pub fn monthly_salary(&self) -> f64 {
        self.income.monthly_salary
    }

    pub fn monthly_savings(&self) -> f64 {
        self.contributions.monthly_savings
    }

    /// Mean of the recorded monthly expenses; `None` without history.
    pub fn average_monthly_expenses(&self) -> Option<f64> {
        if self.expense_history.is_empty() {
            return None;
        }
        let total: f64 = self.expense_history.iter().map(|p| p.expenses).sum();
        Some(total / self.expense_history.len() as f64)
    }

    /// The mutual fund holdings, if the category is present as a list.
    pub fn mutual_funds(&self) -> &[Holding] {
        match self.assets.get("mutual_funds") {
            Some(AssetValue::Holdings(holdings)) => holdings,
            _ => &[],
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a snapshot from an explicitly configured path. Path
    /// discovery (environment, defaults) is the caller's concern.
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(Snapshot)
    }

    pub fn schema_as_json() -> std::result::Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}
