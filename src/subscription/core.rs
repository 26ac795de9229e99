//! The rules a new subscription has to pass.

use crate::{
    Error,
    models::{InvestmentPlan, NewSubscription, Subscription, UserID},
    money::Money,
    stores::{BalanceStore, SubscriptionStore},
};

/// Reasons a subscription is refused.
///
/// The `Display` text is shown to the user on the subscription form.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum SubscriptionError {
    /// The plan has been withdrawn.
    #[error("هذه الخطة غير متاحة حالياً.")]
    PlanUnavailable,

    /// The amount is less than the plan's minimum.
    #[error("الحد الأدنى للاستثمار في هذه الخطة هو {0} دينار.")]
    BelowMinimum(Money),

    /// The amount is more than the wallet balance.
    #[error("رصيد المحفظة غير كافٍ!")]
    InsufficientFunds,

    /// The store failed.
    #[error(transparent)]
    Internal(#[from] Error),
}

/// Invest `amount` of `user_id`'s wallet balance in `plan`.
///
/// The checks run in this order: the plan is active, the amount reaches the
/// plan minimum (only when `enforce_plan_minimum` is set), and the amount is
/// covered by the wallet balance.
///
/// Callers that serve concurrent requests must run this inside a SQL
/// transaction while holding the connection lock, otherwise two requests can
/// both pass the balance check.
///
/// # Errors
///
/// Returns the first [SubscriptionError] that applies.
pub fn subscribe_to_plan<S>(
    store: &S,
    user_id: UserID,
    plan: &InvestmentPlan,
    amount: Money,
    enforce_plan_minimum: bool,
) -> Result<Subscription, SubscriptionError>
where
    S: BalanceStore + SubscriptionStore,
{
    if !plan.is_active {
        return Err(SubscriptionError::PlanUnavailable);
    }

    if enforce_plan_minimum && amount < plan.min_amount {
        return Err(SubscriptionError::BelowMinimum(plan.min_amount));
    }

    if amount > store.wallet_balance(user_id)? {
        return Err(SubscriptionError::InsufficientFunds);
    }

    let subscription = store.create_subscription(NewSubscription {
        user_id,
        plan_id: plan.id,
        invested_amount: amount,
    })?;

    Ok(subscription)
}
