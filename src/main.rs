use std::{net::Ipv4Addr, sync::Arc};

use tracing::info;

use tickoff::{create_app, db, AppState};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let port: u16 = std::env::var("TICKOFF_PORT")
        .expect("TICKOFF_PORT to be set")
        .parse()
        .expect("port number");

    let db_path = std::env::var("TICKOFF_DB").unwrap_or_else(|_| "tickoff.db".to_string());

    let base_path = std::env::var("TICKOFF_BASE_PATH")
        .ok()
        .map(|path| {
            let path = path.trim_end_matches('/');
            if path.starts_with('/') {
                path.to_string()
            } else {
                format!("/{}", path)
            }
        })
        .unwrap_or_default();

    let db = db::init_db(&db_path).expect("initializing database");
    let _ = db::cleanup_expired_sessions(&db);
    let _ = db::cleanup_stale_flashes(&db);

    let state = AppState {
        db,
        base_path: Arc::new(base_path),
    };
    let app = create_app(state);
    let addr = (Ipv4Addr::UNSPECIFIED, port);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("binding listener");

    info!("running on {addr:?}");

    axum::serve(listener, app).await.expect("failed serving");
}
