//! The wallet overview shown to logged in users.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::UtcOffset;

use crate::{
    AppState, Error, endpoints,
    html::{PAGE_CONTAINER_STYLE, TABLE_STYLE, base, plan_cards},
    models::{InvestmentPlan, SubscriptionDetails, Transaction, TransferDetails, User},
    money::Money,
    navigation::NavBar,
    stores::{BalanceStore, PlanStore, SubscriptionStore, TransactionStore, TransferStore},
    timezone::{format_local_date, format_local_date_time, get_local_offset},
};

/// The state needed to show a user's wallet.
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Everything shown on the dashboard for one user.
struct DashboardData {
    balance: Money,
    subscriptions: Vec<SubscriptionDetails>,
    transactions: Vec<Transaction>,
    sent_transfers: Vec<TransferDetails>,
    received_transfers: Vec<TransferDetails>,
    plans: Vec<InvestmentPlan>,
}

fn load_dashboard_data(connection: &Connection, user: &User) -> Result<DashboardData, Error> {
    Ok(DashboardData {
        balance: connection.wallet_balance(user.id)?,
        subscriptions: connection.get_subscriptions_for_user(user.id)?,
        transactions: connection.get_transactions_for_user(user.id)?,
        sent_transfers: connection.get_sent_transfers(user.id)?,
        received_transfers: connection.get_received_transfers(user.id)?,
        plans: connection.get_active_plans()?,
    })
}

fn empty_row(columns: usize, message: &str) -> Markup {
    html! {
        tr { td colspan=(columns) class="text-center text-muted" { (message) } }
    }
}

fn subscriptions_table(subscriptions: &[SubscriptionDetails], offset: UtcOffset) -> Markup {
    html! {
        table class=(TABLE_STYLE) id="subscriptions"
        {
            thead { tr { th { "الخطة" } th { "المبلغ المستثمر" } th { "تاريخ الاشتراك" } } }
            tbody
            {
                @for details in subscriptions {
                    tr
                    {
                        td { (details.plan_name) }
                        td { (details.subscription.invested_amount) " دينار" }
                        td { (format_local_date(details.subscription.subscribed_at, offset)) }
                    }
                }
                @if subscriptions.is_empty() {
                    (empty_row(3, "لم تشترك في أي خطة بعد."))
                }
            }
        }
    }
}

fn transactions_table(transactions: &[Transaction], offset: UtcOffset) -> Markup {
    html! {
        table class=(TABLE_STYLE) id="transactions"
        {
            thead
            {
                tr { th { "النوع" } th { "المبلغ" } th { "الطريقة" } th { "التاريخ" } th { "الحالة" } }
            }
            tbody
            {
                @for transaction in transactions {
                    tr
                    {
                        td { (transaction.transaction_type.label()) }
                        td { (transaction.amount) " دينار" }
                        td { (transaction.method.label()) }
                        td { (format_local_date(transaction.created_at, offset)) }
                        td { (transaction.status.label()) }
                    }
                }
                @if transactions.is_empty() {
                    (empty_row(5, "لا توجد عمليات إيداع أو سحب."))
                }
            }
        }
    }
}

fn transfers_table(
    id: &str,
    transfers: &[TransferDetails],
    offset: UtcOffset,
    empty_message: &str,
) -> Markup {
    html! {
        table class=(TABLE_STYLE) id=(id)
        {
            thead
            {
                tr { th { "المرسل" } th { "المستقبل" } th { "المبلغ" } th { "التاريخ" } th { "الحالة" } }
            }
            tbody
            {
                @for details in transfers {
                    tr
                    {
                        td { (details.sender_username) }
                        td { (details.receiver_username) }
                        td { (details.transfer.amount) " دينار" }
                        td { (format_local_date_time(details.transfer.timestamp, offset)) }
                        td { (details.transfer.status.label()) }
                    }
                }
                @if transfers.is_empty() {
                    (empty_row(5, empty_message))
                }
            }
        }
    }
}

fn dashboard_view(user: &User, data: &DashboardData, offset: UtcOffset) -> Markup {
    let content = html! {
        (NavBar::new(endpoints::DASHBOARD, user.is_staff).into_html())

        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="h3 mb-4" { "مرحباً، " (user.username) }

            div class="card text-bg-primary mb-4 shadow-sm"
            {
                div class="card-body"
                {
                    h2 class="h6 card-title" { "رصيد المحفظة" }
                    p class="display-6 mb-0" id="wallet-balance" { (data.balance) " دينار" }
                }
            }

            section class="mb-5"
            {
                h2 class="h5" { "اشتراكاتي" }
                (subscriptions_table(&data.subscriptions, offset))
            }

            section class="mb-5"
            {
                h2 class="h5" { "طلبات الإيداع والسحب" }
                (transactions_table(&data.transactions, offset))
            }

            section class="mb-5"
            {
                h2 class="h5" { "سجل التحويلات" }
                h3 class="h6 mt-3" { "المرسلة" }
                (transfers_table("sent-transfers", &data.sent_transfers, offset, "لم ترسل أي تحويل."))
                h3 class="h6 mt-3" { "المستلمة" }
                (transfers_table(
                    "received-transfers",
                    &data.received_transfers,
                    offset,
                    "لم تستلم أي تحويل.",
                ))
            }

            section
            {
                h2 class="h5 mb-3" { "الخطط المتاحة" }
                (plan_cards(&data.plans, true))
            }
        }
    };

    base("لوحة التحكم", &content)
}

/// Display the balance, subscriptions, requests and transfers of the logged
/// in user along with the plans they can invest in.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Extension(user): Extension<User>,
) -> Result<Response, Error> {
    let offset = get_local_offset(&state.local_timezone)
        .ok_or_else(|| Error::InvalidTimezoneError(state.local_timezone.clone()))?;

    let data = {
        let connection = state
            .db_connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;
        load_dashboard_data(&connection, &user)?
    };

    Ok(dashboard_view(&user, &data, offset).into_response())
}

#[cfg(test)]
mod dashboard_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State, http::StatusCode};
    use rusqlite::Connection;
    use scraper::{Html, Selector};

    use crate::{
        Error,
        models::{NewSubscription, NewTransaction, NewTransfer, PaymentMethod, TransactionType, User},
        money::Money,
        stores::{
            SubscriptionStore, TransactionStore, TransferStore,
            test_utils::{get_test_connection, insert_test_plan, insert_test_user},
        },
        test_utils::{assert_valid_html, parse_html_document},
    };

    use super::{DashboardState, get_dashboard_page};

    fn get_state(connection: Connection) -> DashboardState {
        DashboardState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: "Asia/Amman".to_owned(),
        }
    }

    fn table_rows(document: &Html, table_id: &str) -> Vec<String> {
        let selector = Selector::parse(&format!("table#{table_id} tbody tr")).unwrap();
        document
            .select(&selector)
            .map(|row| row.text().collect::<String>())
            .collect()
    }

    fn seed(connection: &Connection) -> (User, User) {
        let layla = insert_test_user(connection, "layla");
        let omar = insert_test_user(connection, "omar");
        let plan = insert_test_plan(connection, "Gold", Money::from_dinar(50));

        connection
            .create_transaction(NewTransaction {
                user_id: layla.id,
                transaction_type: TransactionType::Deposit,
                amount: Money::from_dinar(300),
                method: PaymentMethod::Cash,
            })
            .unwrap();
        connection
            .create_subscription(NewSubscription {
                user_id: layla.id,
                plan_id: plan.id,
                invested_amount: Money::from_dinar(100),
            })
            .unwrap();
        connection
            .create_transfer(NewTransfer {
                sender_id: layla.id,
                receiver_id: omar.id,
                amount: Money::from_dinar(40),
            })
            .unwrap();
        connection
            .create_transfer(NewTransfer {
                sender_id: omar.id,
                receiver_id: layla.id,
                amount: Money::from_dinar(15),
            })
            .unwrap();

        (layla, omar)
    }

    #[tokio::test]
    async fn shows_balance_and_history() {
        let connection = get_test_connection();
        let (layla, _) = seed(&connection);

        let response = get_dashboard_page(State(get_state(connection)), Extension(layla))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let document = parse_html_document(response).await;
        assert_valid_html(&document);

        let balance = document
            .select(&Selector::parse("#wallet-balance").unwrap())
            .next()
            .expect("No balance found")
            .text()
            .collect::<String>();
        // 300 - 100 - 40 + 15
        assert_eq!(balance, "175.00 دينار");

        let subscriptions = table_rows(&document, "subscriptions");
        assert_eq!(subscriptions.len(), 1);
        assert!(subscriptions[0].contains("Gold"));
        assert!(subscriptions[0].contains("100.00"));

        let transactions = table_rows(&document, "transactions");
        assert_eq!(transactions.len(), 1);
        assert!(transactions[0].contains("إيداع"));
        assert!(transactions[0].contains("قيد المعالجة"));

        let sent = table_rows(&document, "sent-transfers");
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("omar"));
        assert!(sent[0].contains("40.00"));

        let received = table_rows(&document, "received-transfers");
        assert_eq!(received.len(), 1);
        assert!(received[0].contains("15.00"));
    }

    #[tokio::test]
    async fn shows_subscribe_links_for_active_plans() {
        let connection = get_test_connection();
        let user = insert_test_user(&connection, "layla");
        let plan = insert_test_plan(&connection, "Silver", Money::from_dinar(20));

        let response = get_dashboard_page(State(get_state(connection)), Extension(user))
            .await
            .unwrap();

        let document = parse_html_document(response).await;
        let selector = Selector::parse(&format!("a[href='/subscribe/{}/']", plan.id)).unwrap();
        assert_eq!(document.select(&selector).count(), 1);
    }

    #[tokio::test]
    async fn new_user_sees_empty_tables() {
        let connection = get_test_connection();
        let user = insert_test_user(&connection, "layla");

        let response = get_dashboard_page(State(get_state(connection)), Extension(user))
            .await
            .unwrap();

        let document = parse_html_document(response).await;
        assert!(document.html().contains("0.00 دينار"));
        assert_eq!(table_rows(&document, "subscriptions"), ["لم تشترك في أي خطة بعد."]);
        assert_eq!(table_rows(&document, "sent-transfers"), ["لم ترسل أي تحويل."]);
    }

    #[tokio::test]
    async fn unknown_timezone_is_an_error() {
        let connection = get_test_connection();
        let user = insert_test_user(&connection, "layla");
        let state = DashboardState {
            local_timezone: "Nowhere/Land".to_owned(),
            ..get_state(connection)
        };

        let result = get_dashboard_page(State(state), Extension(user)).await;

        assert_eq!(
            result.unwrap_err(),
            Error::InvalidTimezoneError("Nowhere/Land".to_owned())
        );
    }
}
