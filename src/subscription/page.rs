//! The page and endpoint for subscribing to an investment plan.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Redirect, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error, endpoints,
    endpoints::format_endpoint,
    html::{BUTTON_PRIMARY_STYLE, PAGE_CONTAINER_STYLE, amount_input, base, error_alert},
    models::{InvestmentPlan, PlanId, User},
    money::{MIN_FORM_AMOUNT, Money},
    navigation::NavBar,
    stores::{BalanceStore, PlanStore},
    subscription::{SubscriptionError, subscribe_to_plan},
};

/// The state needed to subscribe users to plans.
#[derive(Debug, Clone)]
pub struct SubscriptionState {
    pub db_connection: Arc<Mutex<Connection>>,
    /// Whether the invested amount must reach the plan's minimum.
    pub enforce_plan_minimum: bool,
}

impl FromRef<AppState> for SubscriptionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            enforce_plan_minimum: state.enforce_plan_minimum,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubscribeForm {
    /// Echoes the plan in the URL. Older forms may omit it.
    pub plan_id: Option<String>,
    #[serde(default)]
    pub invested_amount: String,
}

#[derive(Debug, Default)]
struct SubscribeFormErrors {
    form: Option<String>,
    invested_amount: Option<String>,
}

fn subscribe_view(
    user: &User,
    plan: &InvestmentPlan,
    balance: Money,
    invested_amount: &str,
    errors: &SubscribeFormErrors,
) -> Markup {
    let action = format_endpoint(endpoints::SUBSCRIBE, plan.id);

    let content = html! {
        (NavBar::new(&action, user.is_staff).into_html())

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="row justify-content-center"
            {
                div class="col-md-6"
                {
                    h1 class="h4 mb-3" { "الاشتراك في " (plan.name) }

                    ul class="list-group mb-4"
                    {
                        li class="list-group-item" { "العائد السنوي: " (plan.annual_rate) "%" }
                        li class="list-group-item" { "الحد الأدنى: " (plan.min_amount) " دينار" }
                        li class="list-group-item" { "المدة: " (plan.duration_months) " شهر" }
                        li class="list-group-item" { "رصيدك الحالي: " (balance) " دينار" }
                    }

                    form action=(action) method="post" class="card card-body shadow-sm"
                    {
                        @if let Some(error_message) = &errors.form {
                            (error_alert(error_message))
                        }

                        input type="hidden" name="plan_id" value=(plan.id);

                        (amount_input(
                            "المبلغ المستثمر",
                            "invested_amount",
                            invested_amount,
                            errors.invested_amount.as_deref(),
                        ))

                        button type="submit" class=(BUTTON_PRIMARY_STYLE) { "اشترك" }
                    }
                }
            }
        }
    };

    base("الاشتراك في خطة", &content)
}

/// A plan ID in the URL that is not a number names no plan.
fn parse_plan_id(raw_plan_id: &str) -> Result<PlanId, Error> {
    raw_plan_id.parse().map_err(|_| Error::NotFound)
}

/// Display the subscription form for a plan.
pub async fn get_subscribe_page(
    State(state): State<SubscriptionState>,
    Extension(user): Extension<User>,
    Path(plan_id): Path<String>,
) -> Result<Response, Error> {
    let plan_id = parse_plan_id(&plan_id)?;
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let plan = connection.get_plan(plan_id)?;
    let balance = connection.wallet_balance(user.id)?;

    let errors = SubscribeFormErrors {
        form: (!plan.is_active).then(|| SubscriptionError::PlanUnavailable.to_string()),
        invested_amount: None,
    };

    Ok(subscribe_view(&user, &plan, balance, "", &errors).into_response())
}

/// Invest in a plan and return to the dashboard.
///
/// The balance check and the insert run in one SQL transaction while the
/// connection lock is held.
pub async fn post_subscribe(
    State(state): State<SubscriptionState>,
    Extension(user): Extension<User>,
    Path(plan_id): Path<String>,
    Form(form): Form<SubscribeForm>,
) -> Result<Response, Error> {
    let plan_id = parse_plan_id(&plan_id)?;
    let mut connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let plan = connection.get_plan(plan_id)?;

    let form_plan_id = form.plan_id.as_deref().map(str::trim);
    if form_plan_id.is_some_and(|form_plan_id| form_plan_id != plan_id.to_string()) {
        tracing::warn!(
            "Subscription form for plan {form_plan_id:?} was posted to plan {plan_id}, rejecting."
        );
        return Err(Error::NotFound);
    }

    let amount = match Money::parse_form_input(&form.invested_amount, MIN_FORM_AMOUNT) {
        Ok(amount) => amount,
        Err(error) => {
            let balance = connection.wallet_balance(user.id)?;
            let errors = SubscribeFormErrors {
                form: None,
                invested_amount: Some(error.to_string()),
            };
            return Ok(
                subscribe_view(&user, &plan, balance, &form.invested_amount, &errors)
                    .into_response(),
            );
        }
    };

    let transaction = connection.transaction()?;
    let result = subscribe_to_plan(
        &*transaction,
        user.id,
        &plan,
        amount,
        state.enforce_plan_minimum,
    );

    match result {
        Ok(subscription) => {
            transaction.commit()?;
            tracing::info!(
                "User {} invested {} in plan {}",
                user.id,
                subscription.invested_amount,
                plan.id
            );
            Ok(Redirect::to(endpoints::DASHBOARD).into_response())
        }
        Err(SubscriptionError::Internal(error)) => Err(error),
        Err(error) => {
            let balance = transaction.wallet_balance(user.id)?;
            let errors = SubscribeFormErrors {
                form: Some(error.to_string()),
                invested_amount: None,
            };
            Ok(
                subscribe_view(&user, &plan, balance, &form.invested_amount, &errors)
                    .into_response(),
            )
        }
    }
}
