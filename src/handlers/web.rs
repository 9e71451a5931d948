use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum_extra::extract::CookieJar;

use crate::assets::{LANDING_HTML, STYLE_CSS};
use crate::flash;
use crate::render;
use crate::AppState;

pub async fn index(State(state): State<AppState>, jar: CookieJar) -> Response {
    let (jar, flash_msg) = flash::take(&state.db, jar);
    let flash_html = render::flash_html(flash_msg.as_ref());
    let page = render::page(LANDING_HTML, &[("flash", flash_html.as_str())], &state.base_path);
    (jar, page).into_response()
}

pub async fn static_file(Path(path): Path<String>) -> Response {
    match path.as_str() {
        "style.css" => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/css")],
            STYLE_CSS,
        )
            .into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}
