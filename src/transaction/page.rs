//! The page and endpoint for requesting a deposit or a withdrawal.

use std::{
    str::FromStr,
    sync::{Arc, Mutex},
};

use axum::{
    Extension, Form,
    extract::{FromRef, State},
    response::{IntoResponse, Redirect, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error, endpoints,
    html::{BUTTON_PRIMARY_STYLE, PAGE_CONTAINER_STYLE, amount_input, base, select_input},
    models::{NewTransaction, PaymentMethod, TransactionType, User},
    money::{MIN_FORM_AMOUNT, Money},
    navigation::NavBar,
    stores::TransactionStore,
};

const INVALID_CHOICE_ERROR_MSG: &str = "اختر خياراً صالحاً.";

/// The state needed to record a deposit or withdrawal request.
#[derive(Debug, Clone)]
pub struct TransactionState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The raw form data, kept as text so that it can be shown again with errors.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionForm {
    #[serde(default)]
    pub transaction_type: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub method: String,
}

impl Default for TransactionForm {
    fn default() -> Self {
        Self {
            transaction_type: TransactionType::Deposit.as_str().to_owned(),
            amount: String::new(),
            method: PaymentMethod::Bank.as_str().to_owned(),
        }
    }
}

#[derive(Debug, Default)]
struct TransactionFormErrors {
    transaction_type: Option<String>,
    amount: Option<String>,
    method: Option<String>,
}

fn transaction_view(user: &User, form: &TransactionForm, errors: &TransactionFormErrors) -> Markup {
    let type_options: Vec<(&str, &str)> = TransactionType::ALL
        .iter()
        .map(|transaction_type| (transaction_type.as_str(), transaction_type.label()))
        .collect();
    let method_options: Vec<(&str, &str)> = PaymentMethod::ALL
        .iter()
        .map(|method| (method.as_str(), method.label()))
        .collect();

    let content = html! {
        (NavBar::new(endpoints::TRANSACTION, user.is_staff).into_html())

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="row justify-content-center"
            {
                div class="col-md-6"
                {
                    h1 class="h4 mb-4" { "طلب إيداع أو سحب" }

                    form action=(endpoints::TRANSACTION) method="post" class="card card-body shadow-sm"
                    {
                        (select_input(
                            "نوع العملية",
                            "transaction_type",
                            &type_options,
                            &form.transaction_type,
                            errors.transaction_type.as_deref(),
                        ))
                        (amount_input("المبلغ", "amount", &form.amount, errors.amount.as_deref()))
                        (select_input(
                            "طريقة الدفع",
                            "method",
                            &method_options,
                            &form.method,
                            errors.method.as_deref(),
                        ))

                        button type="submit" class=(BUTTON_PRIMARY_STYLE) { "إرسال الطلب" }
                    }
                }
            }
        }
    };

    base("إيداع / سحب", &content)
}

/// Display the deposit and withdrawal form.
pub async fn get_transaction_page(Extension(user): Extension<User>) -> Response {
    transaction_view(
        &user,
        &TransactionForm::default(),
        &TransactionFormErrors::default(),
    )
    .into_response()
}

fn validate(
    form: &TransactionForm,
) -> Result<(TransactionType, Money, PaymentMethod), TransactionFormErrors> {
    let transaction_type = TransactionType::from_str(&form.transaction_type);
    let amount = Money::parse_form_input(&form.amount, MIN_FORM_AMOUNT);
    let method = PaymentMethod::from_str(&form.method);

    match (transaction_type, amount, method) {
        (Ok(transaction_type), Ok(amount), Ok(method)) => Ok((transaction_type, amount, method)),
        (transaction_type, amount, method) => Err(TransactionFormErrors {
            transaction_type: transaction_type
                .err()
                .map(|_| INVALID_CHOICE_ERROR_MSG.to_owned()),
            amount: amount.err().map(|error| error.to_string()),
            method: method.err().map(|_| INVALID_CHOICE_ERROR_MSG.to_owned()),
        }),
    }
}

/// Record a pending deposit or withdrawal for the logged in user and return
/// to the dashboard.
///
/// Withdrawals are not checked against the wallet balance.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(user): Extension<User>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let (transaction_type, amount, method) = match validate(&form) {
        Ok(values) => values,
        Err(errors) => return transaction_view(&user, &form, &errors).into_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match connection.create_transaction(NewTransaction {
        user_id: user.id,
        transaction_type,
        amount,
        method,
    }) {
        Ok(transaction) => {
            tracing::info!(
                "User {} requested a {} of {} by {}",
                user.id,
                transaction.transaction_type,
                transaction.amount,
                transaction.method
            );
            Redirect::to(endpoints::DASHBOARD).into_response()
        }
        Err(error) => {
            tracing::error!("could not create transaction: {error}");
            error.into_response()
        }
    }
}
