//! A read-only overview of every record for staff users.

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
    html::{PAGE_CONTAINER_STYLE, TABLE_STYLE, base},
    models::{InvestmentPlan, SubscriptionDetails, TransactionDetails, TransferDetails, User},
    navigation::NavBar,
    stores::{PlanStore, SubscriptionStore, TransactionStore, TransferStore},
    timezone::{format_local_date_time, get_local_offset},
};

/// The state needed to list all records.
#[derive(Debug, Clone)]
pub struct AdminState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub local_timezone: String,
}

impl FromRef<AppState> for AdminState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

struct AdminData {
    plans: Vec<InvestmentPlan>,
    transactions: Vec<TransactionDetails>,
    subscriptions: Vec<SubscriptionDetails>,
    transfers: Vec<TransferDetails>,
}

fn plans_table(plans: &[InvestmentPlan]) -> Markup {
    html! {
        table class=(TABLE_STYLE) id="plans"
        {
            thead
            {
                tr
                {
                    th { "الاسم" } th { "العائد السنوي" } th { "الحد الأدنى" }
                    th { "المدة (شهر)" } th { "نشطة" }
                }
            }
            tbody
            {
                @for plan in plans {
                    tr
                    {
                        td { (plan.name) }
                        td { (plan.annual_rate) "%" }
                        td { (plan.min_amount) }
                        td { (plan.duration_months) }
                        td { @if plan.is_active { "نعم" } @else { "لا" } }
                    }
                }
            }
        }
    }
}

fn transactions_table(transactions: &[TransactionDetails], offset: UtcOffset) -> Markup {
    html! {
        table class=(TABLE_STYLE) id="transactions"
        {
            thead
            {
                tr
                {
                    th { "المستخدم" } th { "النوع" } th { "المبلغ" } th { "الطريقة" }
                    th { "الحالة" } th { "التاريخ" }
                }
            }
            tbody
            {
                @for details in transactions {
                    tr
                    {
                        td { (details.username) }
                        td { (details.transaction.transaction_type.label()) }
                        td { (details.transaction.amount) }
                        td { (details.transaction.method.label()) }
                        td { (details.transaction.status.label()) }
                        td { (format_local_date_time(details.transaction.created_at, offset)) }
                    }
                }
            }
        }
    }
}

fn subscriptions_table(subscriptions: &[SubscriptionDetails], offset: UtcOffset) -> Markup {
    html! {
        table class=(TABLE_STYLE) id="subscriptions"
        {
            thead
            {
                tr { th { "المستخدم" } th { "الخطة" } th { "المبلغ المستثمر" } th { "تاريخ الاشتراك" } }
            }
            tbody
            {
                @for details in subscriptions {
                    tr
                    {
                        td { (details.username) }
                        td { (details.plan_name) }
                        td { (details.subscription.invested_amount) }
                        td { (format_local_date_time(details.subscription.subscribed_at, offset)) }
                    }
                }
            }
        }
    }
}

fn transfers_table(transfers: &[TransferDetails], offset: UtcOffset) -> Markup {
    html! {
        table class=(TABLE_STYLE) id="transfers"
        {
            thead
            {
                tr
                {
                    th { "المرسل" } th { "المستقبل" } th { "المبلغ" } th { "الحالة" } th { "التاريخ" }
                }
            }
            tbody
            {
                @for details in transfers {
                    tr
                    {
                        td { (details.sender_username) }
                        td { (details.receiver_username) }
                        td { (details.transfer.amount) }
                        td { (details.transfer.status.label()) }
                        td { (format_local_date_time(details.transfer.timestamp, offset)) }
                    }
                }
            }
        }
    }
}

fn admin_view(user: &User, data: &AdminData, offset: UtcOffset) -> Markup {
    let content = html! {
        (NavBar::new(endpoints::ADMIN, user.is_staff).into_html())

        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="h3 mb-4" { "الإدارة" }

            section class="mb-5"
            {
                h2 class="h5" { "الخطط الاستثمارية" }
                (plans_table(&data.plans))
            }

            section class="mb-5"
            {
                h2 class="h5" { "عمليات الإيداع والسحب" }
                (transactions_table(&data.transactions, offset))
            }

            section class="mb-5"
            {
                h2 class="h5" { "الاشتراكات" }
                (subscriptions_table(&data.subscriptions, offset))
            }

            section
            {
                h2 class="h5" { "التحويلات" }
                (transfers_table(&data.transfers, offset))
            }
        }
    };

    base("الإدارة", &content)
}

/// Display every plan, transaction, subscription and transfer.
///
/// Only staff users may see this page; everyone else gets a 403 page.
pub async fn get_admin_page(
    State(state): State<AdminState>,
    Extension(user): Extension<User>,
) -> Result<Response, Error> {
    if !user.is_staff {
        tracing::warn!("User {} tried to open the admin page without staff rights.", user.id);
        return Err(Error::Forbidden);
    }

    let offset = get_local_offset(&state.local_timezone)
        .ok_or_else(|| Error::InvalidTimezoneError(state.local_timezone.clone()))?;

    let data = {
        let connection = state
            .db_connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        AdminData {
            plans: connection.get_all_plans()?,
            transactions: connection.get_all_transactions()?,
            subscriptions: connection.get_all_subscriptions()?,
            transfers: connection.get_all_transfers()?,
        }
    };

    Ok(admin_view(&user, &data, offset).into_response())
}
