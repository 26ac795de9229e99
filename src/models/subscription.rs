use time::OffsetDateTime;

use crate::{
    models::{DatabaseID, PlanId, UserID, Username},
    money::Money,
};

/// The ID of a [Subscription].
pub type SubscriptionId = DatabaseID;

/// Money a user has put into an investment plan.
#[derive(Debug, Clone, PartialEq)]
pub struct Subscription {
    /// The ID of the subscription.
    pub id: SubscriptionId,
    /// The user who invested.
    pub user_id: UserID,
    /// The plan the money was put into.
    pub plan_id: PlanId,
    /// How much was invested.
    pub invested_amount: Money,
    /// When the subscription was made, in UTC.
    pub subscribed_at: OffsetDateTime,
}

/// A subscription that has not been saved yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubscription {
    /// The user who invests.
    pub user_id: UserID,
    /// The plan to invest in.
    pub plan_id: PlanId,
    /// How much to invest.
    pub invested_amount: Money,
}

/// A subscription with the names needed to display it.
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionDetails {
    /// The stored subscription.
    pub subscription: Subscription,
    /// The name of the user who invested.
    pub username: Username,
    /// The name of the plan.
    pub plan_name: String,
}
