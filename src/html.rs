//! The shared page layout, styles and form widgets.
//!
//! Pages are styled with the right-to-left build of Bootstrap loaded from a CDN.

use maud::{DOCTYPE, Markup, html};

use crate::{endpoints, endpoints::format_endpoint, models::InvestmentPlan};

/// The right-to-left Bootstrap stylesheet.
const BOOTSTRAP_RTL_CSS: &str =
    "https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.rtl.min.css";

/// The name of the site shown in titles and the navigation bar.
pub const SITE_NAME: &str = "محفظة الدينار";

// Button styles
pub const BUTTON_PRIMARY_STYLE: &str = "btn btn-primary w-100";
pub const BUTTON_SUCCESS_STYLE: &str = "btn btn-success btn-sm";

// Form styles
pub const FORM_CONTAINER_STYLE: &str = "container py-4";
pub const FORM_LABEL_STYLE: &str = "form-label";
pub const FORM_TEXT_INPUT_STYLE: &str = "form-control";
pub const FORM_SELECT_STYLE: &str = "form-select";
pub const FORM_ERROR_STYLE: &str = "invalid-feedback d-block";

// Table styles
pub const TABLE_STYLE: &str = "table table-striped table-sm align-middle";

// Page container
pub const PAGE_CONTAINER_STYLE: &str = "container py-4";

/// Wrap `content` in a complete Arabic, right-to-left HTML document.
pub fn base(title: &str, content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="ar" dir="rtl"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - " (SITE_NAME) }
                link rel="stylesheet" href=(BOOTSTRAP_RTL_CSS);
            }

            body class="bg-light"
            {
                (content)
            }
        }
    }
}

/// A full page explaining that something went wrong.
pub fn error_view(title: &str, header: &str, description: &str, fix: &str) -> Markup {
    let content = html!(
        section class="container py-5 text-center"
        {
            h1 class="display-1 fw-bold text-primary" { (header) }
            p class="fs-3 fw-bold" { (description) }
            p class="fs-5" { (fix) }
            a href=(endpoints::ROOT) class="btn btn-primary my-4" { "العودة إلى الصفحة الرئيسية" }
        }
    );

    base(title, &content)
}

/// Center a form in a card under a heading, as on the log-in and registration pages.
pub fn form_card(form_title: &str, form: &Markup) -> Markup {
    html! {
        div class=(FORM_CONTAINER_STYLE)
        {
            div class="row justify-content-center"
            {
                div class="col-md-6 col-lg-5"
                {
                    div class="card shadow-sm"
                    {
                        div class="card-body p-4"
                        {
                            h1 class="h4 mb-4" { (form_title) }
                            (form)
                        }
                    }
                }
            }
        }
    }
}

/// A labelled, required text-like input with an optional error message below it.
pub fn text_input(
    label: &str,
    name: &str,
    input_type: &str,
    value: &str,
    error_message: Option<&str>,
) -> Markup {
    html! {
        div class="mb-3"
        {
            label for=(name) class=(FORM_LABEL_STYLE) { (label) }

            input
                type=(input_type)
                name=(name)
                id=(name)
                value=(value)
                class=(FORM_TEXT_INPUT_STYLE)
                required;

            @if let Some(error_message) = error_message {
                p class=(FORM_ERROR_STYLE) { (error_message) }
            }
        }
    }
}

/// A password input that is never pre-filled.
pub fn password_input(error_message: Option<&str>) -> Markup {
    html! {
        div class="mb-3"
        {
            label for="password" class=(FORM_LABEL_STYLE) { "كلمة المرور" }

            input
                type="password"
                name="password"
                id="password"
                placeholder="••••••••"
                class=(FORM_TEXT_INPUT_STYLE)
                required;

            @if let Some(error_message) = error_message {
                p class=(FORM_ERROR_STYLE) { (error_message) }
            }
        }
    }
}

/// An input for an amount in dinar with two decimal places.
pub fn amount_input(label: &str, name: &str, value: &str, error_message: Option<&str>) -> Markup {
    html! {
        div class="mb-3"
        {
            label for=(name) class=(FORM_LABEL_STYLE) { (label) }

            div class="input-group"
            {
                input
                    type="number"
                    name=(name)
                    id=(name)
                    value=(value)
                    min="1"
                    step="0.01"
                    class=(FORM_TEXT_INPUT_STYLE)
                    required;

                span class="input-group-text" { "دينار" }
            }

            @if let Some(error_message) = error_message {
                p class=(FORM_ERROR_STYLE) { (error_message) }
            }
        }
    }
}

/// A select box. `options` are `(value, label)` pairs.
pub fn select_input(
    label: &str,
    name: &str,
    options: &[(&str, &str)],
    selected: &str,
    error_message: Option<&str>,
) -> Markup {
    html! {
        div class="mb-3"
        {
            label for=(name) class=(FORM_LABEL_STYLE) { (label) }

            select name=(name) id=(name) class=(FORM_SELECT_STYLE) required
            {
                @for (value, option_label) in options {
                    option value=(value) selected[*value == selected] { (option_label) }
                }
            }

            @if let Some(error_message) = error_message {
                p class=(FORM_ERROR_STYLE) { (error_message) }
            }
        }
    }
}

/// A green message box.
pub fn success_alert(message: &str) -> Markup {
    html! {
        div class="alert alert-success" role="alert" { (message) }
    }
}

/// A red message box for errors that do not belong to a single field.
pub fn error_alert(message: &str) -> Markup {
    html! {
        div class="alert alert-danger" role="alert" { (message) }
    }
}

/// Cards describing `plans`, with a subscribe link on each when
/// `show_subscribe_links` is set.
pub fn plan_cards(plans: &[InvestmentPlan], show_subscribe_links: bool) -> Markup {
    html! {
        @if plans.is_empty() {
            p class="text-muted" { "لا توجد خطط استثمارية متاحة حالياً." }
        } @else {
            div class="row row-cols-1 row-cols-md-3 g-3"
            {
                @for plan in plans {
                    div class="col"
                    {
                        div class="card h-100 shadow-sm plan-card"
                        {
                            div class="card-body"
                            {
                                h3 class="card-title h5" { (plan.name) }
                                @if !plan.description.is_empty() {
                                    p class="card-text" { (plan.description) }
                                }
                                ul class="list-unstyled mb-0"
                                {
                                    li { "العائد السنوي: " (plan.annual_rate) "%" }
                                    li { "الحد الأدنى: " (plan.min_amount) " دينار" }
                                    li { "المدة: " (plan.duration_months) " شهر" }
                                }
                            }

                            @if show_subscribe_links {
                                div class="card-footer bg-transparent"
                                {
                                    a
                                        href=(format_endpoint(endpoints::SUBSCRIBE, plan.id))
                                        class=(BUTTON_SUCCESS_STYLE)
                                    {
                                        "اشترك"
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
