//! The registration page for creating a new wallet account.

use std::{
    str::FromStr,
    sync::{Arc, Mutex},
};

use axum::{
    Form,
    extract::{FromRef, State},
    response::{IntoResponse, Redirect, Response},
};
use email_address::EmailAddress;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error, PasswordHash, ValidatedPassword,
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, base, form_card, password_input, text_input},
    models::{NewUser, Username},
    stores::UserStore,
};

pub const DUPLICATE_USERNAME_ERROR_MSG: &str = "يوجد مستخدم بهذا الاسم مسبقاً.";
pub const INVALID_EMAIL_ERROR_MSG: &str = "أدخل عنوان بريد إلكتروني صالح.";

/// The state needed for creating a new user.
#[derive(Debug, Clone)]
pub struct RegistrationState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The raw data entered by the user in the registration form.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Per-field messages shown when the form is rejected.
#[derive(Debug, Default, PartialEq)]
struct RegisterErrors {
    username: Option<String>,
    email: Option<String>,
    password: Option<String>,
}

fn register_view(form: &RegisterForm, errors: &RegisterErrors) -> Markup {
    let form = html! {
        form action=(endpoints::REGISTER) method="post"
        {
            (text_input("اسم المستخدم", "username", "text", &form.username, errors.username.as_deref()))
            (text_input("البريد الإلكتروني", "email", "email", &form.email, errors.email.as_deref()))
            (password_input(errors.password.as_deref()))

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "إنشاء الحساب" }
        }

        p class="mt-3 mb-0 text-center"
        {
            "لديك حساب؟ "
            a href=(endpoints::LOG_IN) { "سجل الدخول" }
        }
    };

    base("إنشاء حساب", &form_card("إنشاء حساب", &form))
}

/// Display the registration page.
pub async fn get_register_page() -> Response {
    register_view(&RegisterForm::default(), &RegisterErrors::default()).into_response()
}

/// Check every field of `form`, returning the validated user details or the
/// messages for the fields that failed.
fn validate(form: &RegisterForm) -> Result<(Username, EmailAddress, ValidatedPassword), RegisterErrors> {
    let username = Username::new(&form.username);
    let email = EmailAddress::from_str(form.email.trim());
    let password = ValidatedPassword::new(&form.password, &[form.username.trim(), form.email.trim()]);

    match (username, email, password) {
        (Ok(username), Ok(email), Ok(password)) => Ok((username, email, password)),
        (username, email, password) => Err(RegisterErrors {
            username: username.err().map(|error| error.to_string()),
            email: email.err().map(|_| INVALID_EMAIL_ERROR_MSG.to_owned()),
            password: password.err().map(|error| match error {
                Error::TooWeak(message) => message,
                error => error.to_string(),
            }),
        }),
    }
}

/// Create a user from the registration form and send them to the log-in page.
///
/// The form is shown again with inline messages when a field is invalid or
/// the username is taken.
pub async fn register_user(
    State(state): State<RegistrationState>,
    Form(form): Form<RegisterForm>,
) -> Response {
    let (username, email, password) = match validate(&form) {
        Ok(details) => details,
        Err(errors) => return register_view(&form, &errors).into_response(),
    };

    let password_hash = match PasswordHash::new(password, PasswordHash::DEFAULT_COST) {
        Ok(password_hash) => password_hash,
        Err(error) => return error.into_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(_) => return Error::DatabaseLockError.into_response(),
    };

    let result = connection.create_user(NewUser {
        username,
        email,
        password_hash,
        is_staff: false,
    });

    match result {
        Ok(user) => {
            tracing::info!("Registered user {} with ID {}", user.username, user.id);
            Redirect::to(endpoints::LOG_IN).into_response()
        }
        Err(Error::DuplicateUsername) => {
            let errors = RegisterErrors {
                username: Some(DUPLICATE_USERNAME_ERROR_MSG.to_owned()),
                ..Default::default()
            };
            register_view(&form, &errors).into_response()
        }
        Err(error) => error.into_response(),
    }
}
