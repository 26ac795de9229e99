//! Investment plans users can put wallet balance into.

use crate::{models::DatabaseID, money::Money};

/// The ID of an [InvestmentPlan].
pub type PlanId = DatabaseID;

/// The longest plan name accepted.
pub const MAX_PLAN_NAME_LENGTH: usize = 100;

/// A fixed-term investment product.
///
/// Plans are reference data: they are added with the management tool and
/// never change once users subscribe to them.
#[derive(Debug, Clone, PartialEq)]
pub struct InvestmentPlan {
    /// The plan's ID in the application database.
    pub id: PlanId,
    /// The name shown on the plan card.
    pub name: String,
    /// A free text description of the plan.
    pub description: String,
    /// The yearly return as a percentage, e.g. `5.5` for 5.5%.
    pub annual_rate: f64,
    /// The smallest amount that can be invested in the plan.
    pub min_amount: Money,
    /// How long the money stays invested.
    pub duration_months: u32,
    /// Inactive plans are hidden and cannot be subscribed to.
    pub is_active: bool,
}

/// Reasons a new plan is rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlanError {
    /// The plan name is empty or only whitespace.
    #[error("plan name cannot be empty")]
    EmptyName,

    /// The plan name is longer than [MAX_PLAN_NAME_LENGTH].
    #[error("plan name cannot be longer than {MAX_PLAN_NAME_LENGTH} characters")]
    NameTooLong,

    /// The annual rate is negative or not a number.
    #[error("annual rate must be a non-negative number, got {0}")]
    InvalidRate(f64),

    /// The minimum amount is negative.
    #[error("minimum amount cannot be negative, got {0}")]
    NegativeMinimum(Money),

    /// The duration is zero months.
    #[error("duration must be at least one month")]
    ZeroDuration,
}

/// A validated plan that has not been saved yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPlan {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) annual_rate: f64,
    pub(crate) min_amount: Money,
    pub(crate) duration_months: u32,
    pub(crate) is_active: bool,
}

impl NewPlan {
    /// Check the plan details.
    ///
    /// # Errors
    ///
    /// Returns a [PlanError] for the first invalid field.
    pub fn new(
        name: &str,
        description: &str,
        annual_rate: f64,
        min_amount: Money,
        duration_months: u32,
        is_active: bool,
    ) -> Result<Self, PlanError> {
        let name = name.trim();

        if name.is_empty() {
            return Err(PlanError::EmptyName);
        }

        if name.chars().count() > MAX_PLAN_NAME_LENGTH {
            return Err(PlanError::NameTooLong);
        }

        if !annual_rate.is_finite() || annual_rate < 0.0 {
            return Err(PlanError::InvalidRate(annual_rate));
        }

        if min_amount < Money::ZERO {
            return Err(PlanError::NegativeMinimum(min_amount));
        }

        if duration_months == 0 {
            return Err(PlanError::ZeroDuration);
        }

        Ok(Self {
            name: name.to_owned(),
            description: description.trim().to_owned(),
            annual_rate,
            min_amount,
            duration_months,
            is_active,
        })
    }
}
