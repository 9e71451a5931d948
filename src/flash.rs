use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::warn;

use crate::auth::generate_token;
use crate::db::{self, DbPool};
use crate::models::{Flash, FlashKind};

const FLASH_COOKIE: &str = "flash";

/// Queues a one-shot notification for the next rendered page. Best-effort:
/// if the store write fails the redirect still happens, just without the
/// message.
pub fn set(db: &DbPool, jar: CookieJar, kind: FlashKind, text: &str) -> CookieJar {
    let token = generate_token();
    let flash = Flash {
        kind,
        text: text.to_string(),
    };

    if let Err(err) = db::set_flash(db, &token, &flash) {
        warn!(?err, "Failed to store flash message");
        return jar;
    }

    let cookie = Cookie::build((FLASH_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .max_age(time::Duration::minutes(10));

    jar.add(cookie)
}

/// Pops the pending notification, if any. The store row is deleted on read
/// and the cookie cleared, so a reload never shows the message again.
pub fn take(db: &DbPool, jar: CookieJar) -> (CookieJar, Option<Flash>) {
    let Some(cookie) = jar.get(FLASH_COOKIE) else {
        return (jar, None);
    };

    let token = cookie.value().to_string();
    let flash = match db::take_flash(db, &token) {
        Ok(flash) => flash,
        Err(err) => {
            warn!(?err, "Failed to read flash message");
            None
        }
    };

    let removal = Cookie::build((FLASH_COOKIE, "")).path("/");
    (jar.remove(removal), flash)
}
