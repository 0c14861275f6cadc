//! Core budget domain types and the derived utilization figures.

use serde::{Serialize, Serializer};

use crate::{Error, UserID, budget::Period};

/// Database identifier for a budget.
pub type BudgetId = i64;

/// Utilization at or above this percentage marks a budget as [BudgetStatus::Moderate].
pub const MODERATE_THRESHOLD: f64 = 50.0;
/// Utilization at or above this percentage marks a budget as [BudgetStatus::Warning].
pub const WARNING_THRESHOLD: f64 = 80.0;
/// Utilization at or above this percentage marks a budget as [BudgetStatus::Exceeded].
pub const EXCEEDED_THRESHOLD: f64 = 100.0;

/// How much of a budget has been used, from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetStatus {
    /// Less than half of the budget has been spent.
    Good,
    /// At least half of the budget has been spent.
    Moderate,
    /// At least 80% of the budget has been spent.
    Warning,
    /// The whole budget has been spent.
    Exceeded,
}

impl BudgetStatus {
    /// The status for a utilization percentage.
    pub fn from_utilization(percentage: f64) -> Self {
        if percentage >= EXCEEDED_THRESHOLD {
            Self::Exceeded
        } else if percentage >= WARNING_THRESHOLD {
            Self::Warning
        } else if percentage >= MODERATE_THRESHOLD {
            Self::Moderate
        } else {
            Self::Good
        }
    }
}

/// The figures derived from a budget's spent and budgeted amounts.
///
/// These are never stored, they are computed whenever a budget is serialized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Utilization {
    /// The amount left to spend, never negative.
    pub remaining_amount: f64,
    /// Spent as a percentage of budgeted, clamped to [0, 100].
    pub utilization_percentage: f64,
    /// The status bucket for `utilization_percentage`.
    pub status: BudgetStatus,
}

impl Utilization {
    /// Derive the utilization of a budget of `budget_amount` with `spent_amount` spent.
    ///
    /// A zero budget is always at 0% utilization regardless of spending.
    pub fn new(spent_amount: f64, budget_amount: f64) -> Self {
        let remaining_amount = (budget_amount - spent_amount).max(0.0);

        let utilization_percentage = if budget_amount > 0.0 {
            (spent_amount / budget_amount * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };

        Self {
            remaining_amount,
            utilization_percentage,
            status: BudgetStatus::from_utilization(utilization_percentage),
        }
    }
}

/// A monthly spending limit for one category.
#[derive(Debug, Clone, PartialEq)]
pub struct Budget {
    /// The id for the budget.
    pub id: BudgetId,
    /// The user that created the budget.
    pub user_id: UserID,
    /// The expense category that counts towards the budget.
    pub category: String,
    /// The month of the year, 1-12.
    pub month: u8,
    /// The calendar year.
    pub year: i32,
    /// The spending limit.
    pub budget_amount: f64,
    /// The sum of the matching expenses when the budget was last read.
    pub spent_amount: f64,
    /// False once the budget has been deleted.
    pub is_active: bool,
}

impl Budget {
    /// The calendar month this budget covers.
    ///
    /// # Errors
    /// Returns [Error::InvalidPeriod] if the stored month or year is out of range.
    pub fn period(&self) -> Result<Period, Error> {
        Period::new(self.month, self.year)
    }

    /// The derived figures for the budget's current spent amount.
    pub fn utilization(&self) -> Utilization {
        Utilization::new(self.spent_amount, self.budget_amount)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BudgetJson<'a> {
    id: BudgetId,
    user_id: UserID,
    category: &'a str,
    month: u8,
    year: i32,
    budget_amount: f64,
    spent_amount: f64,
    is_active: bool,
    #[serde(flatten)]
    utilization: Utilization,
}

impl Serialize for Budget {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        BudgetJson {
            id: self.id,
            user_id: self.user_id,
            category: &self.category,
            month: self.month,
            year: self.year,
            budget_amount: self.budget_amount,
            spent_amount: self.spent_amount,
            is_active: self.is_active,
            utilization: self.utilization(),
        }
        .serialize(serializer)
    }
}
