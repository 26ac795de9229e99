//! The page and endpoint for sending balance to another user.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error, endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, PAGE_CONTAINER_STYLE, amount_input, base, error_alert,
        success_alert, text_input,
    },
    models::User,
    money::{MIN_FORM_AMOUNT, Money},
    navigation::NavBar,
    stores::BalanceStore,
    transfer::{TransferError, transfer_funds},
};

/// The state needed to transfer balance between users.
#[derive(Debug, Clone)]
pub struct TransferState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransferState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TransferForm {
    pub receiver_username: String,
    pub amount: String,
}

/// What to show above and inside the form.
#[derive(Debug, Default)]
struct TransferFeedback {
    success: Option<String>,
    error: Option<String>,
    amount_error: Option<String>,
}

fn transfer_view(
    user: &User,
    balance: Money,
    form: &TransferForm,
    feedback: &TransferFeedback,
) -> Markup {
    let content = html! {
        (NavBar::new(endpoints::TRANSFER, user.is_staff).into_html())

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="row justify-content-center"
            {
                div class="col-md-6"
                {
                    h1 class="h4 mb-3" { "تحويل رصيد إلى مستخدم آخر" }
                    p { "رصيدك الحالي: " strong { (balance) " دينار" } }

                    @if let Some(message) = &feedback.success {
                        (success_alert(message))
                    }

                    form action=(endpoints::TRANSFER) method="post" class="card card-body shadow-sm"
                    {
                        @if let Some(message) = &feedback.error {
                            (error_alert(message))
                        }

                        (text_input(
                            "اسم المستخدم المستقبل",
                            "receiver_username",
                            "text",
                            &form.receiver_username,
                            None,
                        ))
                        (amount_input("المبلغ", "amount", &form.amount, feedback.amount_error.as_deref()))

                        button type="submit" class=(BUTTON_PRIMARY_STYLE) { "تحويل" }
                    }
                }
            }
        }
    };

    base("تحويل رصيد", &content)
}

/// Display the transfer form.
pub async fn get_transfer_page(
    State(state): State<TransferState>,
    Extension(user): Extension<User>,
) -> Result<Response, Error> {
    let balance = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?
        .wallet_balance(user.id)?;

    Ok(transfer_view(
        &user,
        balance,
        &TransferForm::default(),
        &TransferFeedback::default(),
    )
    .into_response())
}

/// Send balance to another user.
///
/// On success the page is shown again with an empty form and a confirmation
/// message. On failure the form keeps its values and shows why.
pub async fn post_transfer(
    State(state): State<TransferState>,
    Extension(user): Extension<User>,
    Form(form): Form<TransferForm>,
) -> Result<Response, Error> {
    let mut connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let amount = match Money::parse_form_input(&form.amount, MIN_FORM_AMOUNT) {
        Ok(amount) => amount,
        Err(error) => {
            let balance = connection.wallet_balance(user.id)?;
            let feedback = TransferFeedback {
                amount_error: Some(error.to_string()),
                ..Default::default()
            };
            return Ok(transfer_view(&user, balance, &form, &feedback).into_response());
        }
    };

    let transaction = connection.transaction()?;
    let result = transfer_funds(&*transaction, &user, &form.receiver_username, amount);

    match result {
        Ok(details) => {
            transaction.commit()?;
            tracing::info!(
                "User {} sent {} to user {}",
                user.id,
                details.transfer.amount,
                details.transfer.receiver_id
            );

            let balance = connection.wallet_balance(user.id)?;
            let feedback = TransferFeedback {
                success: Some(format!(
                    "تم تحويل {} دينار إلى المستخدم {} بنجاح.",
                    details.transfer.amount, details.receiver_username
                )),
                ..Default::default()
            };
            Ok(transfer_view(&user, balance, &TransferForm::default(), &feedback).into_response())
        }
        Err(TransferError::Internal(error)) => Err(error),
        Err(error) => {
            let balance = transaction.wallet_balance(user.id)?;
            let feedback = TransferFeedback {
                error: Some(error.to_string()),
                ..Default::default()
            };
            Ok(transfer_view(&user, balance, &form, &feedback).into_response())
        }
    }
}

#[cfg(test)]
mod transfer_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, Form, extract::State, http::StatusCode, response::IntoResponse};
    use scraper::Selector;

    use crate::{
        endpoints,
        models::{NewTransaction, PaymentMethod, TransactionType, User},
        money::Money,
        stores::{
            BalanceStore, TransactionStore, TransferStore,
            test_utils::{get_test_connection, insert_test_user},
        },
        test_utils::{
            assert_form_action, assert_form_error_message, assert_form_input,
            assert_form_input_with_value, assert_valid_html, must_get_form, parse_html_document,
        },
    };

    use super::{TransferForm, TransferState, get_transfer_page, post_transfer};

    fn get_state() -> (TransferState, User, User) {
        let connection = get_test_connection();
        let sender = insert_test_user(&connection, "layla");
        let receiver = insert_test_user(&connection, "omar");
        connection
            .create_transaction(NewTransaction {
                user_id: sender.id,
                transaction_type: TransactionType::Deposit,
                amount: Money::from_dinar(100),
                method: PaymentMethod::Bank,
            })
            .unwrap();

        (
            TransferState {
                db_connection: Arc::new(Mutex::new(connection)),
            },
            sender,
            receiver,
        )
    }

    fn form(receiver_username: &str, amount: &str) -> TransferForm {
        TransferForm {
            receiver_username: receiver_username.to_owned(),
            amount: amount.to_owned(),
        }
    }

    #[tokio::test]
    async fn page_displays_form() {
        let (state, sender, _) = get_state();

        let response = get_transfer_page(State(state), Extension(sender))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let document = parse_html_document(response).await;
        assert_valid_html(&document);
        let form = must_get_form(&document);
        assert_form_action(&form, endpoints::TRANSFER);
        assert_form_input(&form, "receiver_username", "text");
        assert_form_input(&form, "amount", "number");
        assert!(document.html().contains("100.00"));
    }

    #[tokio::test]
    async fn successful_transfer_shows_message_and_empty_form() {
        let (state, sender, receiver) = get_state();

        let response = post_transfer(
            State(state.clone()),
            Extension(sender.clone()),
            Form(form("omar", "25")),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let document = parse_html_document(response).await;
        assert_valid_html(&document);
        let alert = document
            .select(&Selector::parse("div.alert-success").unwrap())
            .next()
            .expect("No success message found");
        assert_eq!(
            alert.text().collect::<String>(),
            "تم تحويل 25.00 دينار إلى المستخدم omar بنجاح."
        );
        let form = must_get_form(&document);
        assert_form_input_with_value(&form, "receiver_username", "text", "");
        assert_form_input_with_value(&form, "amount", "number", "");

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(
            connection.wallet_balance(sender.id).unwrap(),
            Money::from_dinar(75)
        );
        assert_eq!(
            connection.wallet_balance(receiver.id).unwrap(),
            Money::from_dinar(25)
        );
    }

    #[tokio::test]
    async fn insufficient_balance_shows_error_and_keeps_values() {
        let (state, sender, _) = get_state();

        let response = post_transfer(
            State(state.clone()),
            Extension(sender.clone()),
            Form(form("omar", "100.01")),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let document = parse_html_document(response).await;
        let form = must_get_form(&document);
        assert_form_error_message(&form, "رصيدك لا يكفي لإتمام التحويل.");
        assert_form_input_with_value(&form, "receiver_username", "text", "omar");
        assert_form_input_with_value(&form, "amount", "number", "100.01");

        let connection = state.db_connection.lock().unwrap();
        assert!(connection.get_sent_transfers(sender.id).unwrap().is_empty());
    }

    #[tokio::test]
    async fn self_transfer_shows_error() {
        let (state, sender, _) = get_state();

        let response = post_transfer(State(state), Extension(sender), Form(form("layla", "5")))
            .await
            .into_response();

        let document = parse_html_document(response).await;
        assert_form_error_message(&must_get_form(&document), "لا يمكنك تحويل رصيد لنفسك.");
    }

    #[tokio::test]
    async fn unknown_receiver_shows_error() {
        let (state, sender, _) = get_state();

        let response = post_transfer(State(state), Extension(sender), Form(form("nobody", "5")))
            .await
            .into_response();

        let document = parse_html_document(response).await;
        assert_form_error_message(&must_get_form(&document), "المستخدم المستقبل غير موجود.");
    }

    #[tokio::test]
    async fn invalid_amount_shows_field_error() {
        let (state, sender, _) = get_state();

        let response = post_transfer(
            State(state),
            Extension(sender),
            Form(form("omar", "12.345")),
        )
        .await
        .into_response();

        let document = parse_html_document(response).await;
        assert_form_error_message(
            &must_get_form(&document),
            "تأكد من ألا يوجد أكثر من 2 منازل عشرية.",
        );
    }
}
