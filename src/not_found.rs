//! The pages for unknown paths and for pages the user may not see.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

pub async fn get_404_not_found() -> Response {
    get_404_not_found_response()
}

pub fn get_404_not_found_response() -> Response {
    (
        StatusCode::NOT_FOUND,
        Html(
            error_view(
                "الصفحة غير موجودة",
                "404",
                "الصفحة المطلوبة غير موجودة.",
                "تأكد من صحة الرابط.",
            )
            .into_string(),
        ),
    )
        .into_response()
}

pub fn get_403_forbidden_response() -> Response {
    (
        StatusCode::FORBIDDEN,
        Html(
            error_view(
                "غير مسموح",
                "403",
                "ليس لديك صلاحية لعرض هذه الصفحة.",
                "هذه الصفحة متاحة للموظفين فقط.",
            )
            .into_string(),
        ),
    )
        .into_response()
}
