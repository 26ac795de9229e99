//! The public landing page.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    html::{PAGE_CONTAINER_STYLE, SITE_NAME, base, plan_cards},
    models::InvestmentPlan,
    stores::PlanStore,
};

/// The state needed to list the plans on the landing page.
#[derive(Debug, Clone)]
pub struct IndexState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for IndexState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn index_view(plans: &[InvestmentPlan]) -> Markup {
    let content = html! {
        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="p-5 mb-4 bg-white rounded-3 shadow-sm text-center"
            {
                h1 class="display-5 fw-bold" { (SITE_NAME) }
                p class="fs-5" { "استثمر أموالك بالدينار الأردني وأدر محفظتك بسهولة." }
                a href=(endpoints::REGISTER) class="btn btn-primary btn-lg ms-2" { "إنشاء حساب" }
                a href=(endpoints::LOG_IN) class="btn btn-outline-primary btn-lg" { "تسجيل الدخول" }
            }

            h2 class="h4 mb-3" { "الخطط الاستثمارية" }
            (plan_cards(plans, false))
        }
    };

    base("الرئيسية", &content)
}

/// Display the landing page with the plans that are open for investment.
pub async fn get_index_page(State(state): State<IndexState>) -> Result<Response, Error> {
    let plans = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?
        .get_active_plans()?;

    Ok(index_view(&plans).into_response())
}
