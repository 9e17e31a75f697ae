pub mod args;
pub mod error;
pub mod handlers;
pub mod state;

use std::path::Path;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::handlers::{
    create_link, delete_link, generate_boot_script, healthz, list_links, run_benchmark,
    run_until_fail,
};
use crate::state::AppState;

/// Builds the HTTP application. Paths outside `/api` and `/healthz` are served
/// from `public_dir` when one is given.
pub fn build_router(st: AppState, public_dir: Option<&Path>) -> Router {
    let api_routes = Router::new()
        .route("/cluster-links", get(list_links).post(create_link))
        .route("/cluster-links/:id", delete(delete_link))
        .route("/ipxe/generate", post(generate_boot_script))
        .route("/benchmark/run", post(run_benchmark))
        .route("/test/run-until-fail", post(run_until_fail));

    let mut app = Router::new()
        .route("/healthz", get(healthz))
        .nest("/api", api_routes)
        .with_state(st);

    if let Some(dir) = public_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(TraceLayer::new_for_http())
}
