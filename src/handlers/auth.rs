use axum::extract::State;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::CookieJar;
use tracing::{error, info, warn};

use crate::assets::{LOGIN_HTML, REGISTER_HTML};
use crate::auth::{generate_token, hash_password, validate_registration, verify_password};
use crate::db::{self, unix_now};
use crate::error::AppError;
use crate::flash;
use crate::middleware::RequireAnonymous;
use crate::models::{FlashKind, LoginForm, RegisterForm, Session};
use crate::render;
use crate::AppState;

const SESSION_TTL_DAYS: i64 = 7;

pub async fn register_page(
    _guard: RequireAnonymous,
    State(state): State<AppState>,
    jar: CookieJar,
) -> Response {
    let (jar, flash_msg) = flash::take(&state.db, jar);
    let flash_html = render::flash_html(flash_msg.as_ref());
    let page = render_register(&state, &flash_html, &[], "", "");
    (jar, page).into_response()
}

pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    let errors = validate_registration(&form);
    if !errors.is_empty() {
        return Ok(render_register(&state, "", &errors, &form.name, &form.email).into_response());
    }

    let password_hash = hash_password(&form.password)?;

    match db::create_user(&state.db, &form.name, &form.email, &password_hash) {
        Ok(Some(user)) => {
            info!(id = user.id, "Registered user");
            let jar = flash::set(
                &state.db,
                jar,
                FlashKind::Success,
                "Account created! You can now log in",
            );
            Ok((jar, Redirect::to(&state.path("/users/login"))).into_response())
        }
        Ok(None) => Ok(render_register(
            &state,
            "",
            &["That email is already registered"],
            &form.name,
            &form.email,
        )
        .into_response()),
        Err(err) => {
            error!(?err, "Failed to create user");
            Ok(render_register(
                &state,
                "",
                &["Something went wrong, please try again"],
                &form.name,
                &form.email,
            )
            .into_response())
        }
    }
}

pub async fn login_page(
    _guard: RequireAnonymous,
    State(state): State<AppState>,
    jar: CookieJar,
) -> Response {
    let (jar, flash_msg) = flash::take(&state.db, jar);
    let flash_html = render::flash_html(flash_msg.as_ref());
    let page = render::page(LOGIN_HTML, &[("flash", flash_html.as_str())], &state.base_path);
    (jar, page).into_response()
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    let login_path = state.path("/users/login");

    let user = match db::get_user_by_email(&state.db, &form.email) {
        Ok(user) => user,
        Err(err) => {
            error!(?err, "User lookup failed");
            let jar = flash::set(
                &state.db,
                jar,
                FlashKind::Error,
                "Something went wrong, please try again",
            );
            return (jar, Redirect::to(&login_path)).into_response();
        }
    };

    // One generic message for unknown email and wrong password alike.
    let Some(user) = user.filter(|u| verify_password(&form.password, &u.password)) else {
        let jar = flash::set(&state.db, jar, FlashKind::Error, "Incorrect email or password");
        return (jar, Redirect::to(&login_path)).into_response();
    };

    let token = generate_token();
    let now = unix_now();
    let session = Session {
        token: token.clone(),
        user_id: user.id,
        created_at: now,
        expires_at: now + SESSION_TTL_DAYS * 24 * 60 * 60,
    };

    if let Err(err) = db::create_session(&state.db, &session) {
        error!(?err, "Failed to create session");
        let jar = flash::set(
            &state.db,
            jar,
            FlashKind::Error,
            "Something went wrong, please try again",
        );
        return (jar, Redirect::to(&login_path)).into_response();
    }

    info!(user_id = user.id, "User logged in");

    let cookie = Cookie::build(("session", token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .max_age(time::Duration::days(SESSION_TTL_DAYS));

    (jar.add(cookie), Redirect::to(&state.path("/users/todolist"))).into_response()
}

pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> Response {
    if let Some(session_cookie) = jar.get("session") {
        // Best-effort: a failed delete still logs the user out of this browser.
        if let Err(err) = db::delete_session(&state.db, session_cookie.value()) {
            warn!(?err, "Failed to delete session");
        }
    }
    info!("User logged out");

    let removal = Cookie::build(("session", ""))
        .path("/")
        .http_only(true)
        .max_age(time::Duration::seconds(0));

    let jar = jar.remove(removal);
    let jar = flash::set(&state.db, jar, FlashKind::Success, "You have been signed out");
    (jar, Redirect::to(&state.path("/users/login"))).into_response()
}

fn render_register(
    state: &AppState,
    flash_html: &str,
    errors: &[&str],
    name: &str,
    email: &str,
) -> Html<String> {
    let errors_html = render::errors_html(errors);
    let name = render::html_escape(name);
    let email = render::html_escape(email);

    render::page(
        REGISTER_HTML,
        &[
            ("flash", flash_html),
            ("errors", &errors_html),
            ("name", &name),
            ("email", &email),
        ],
        &state.base_path,
    )
}
