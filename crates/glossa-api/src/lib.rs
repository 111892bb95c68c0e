//! # glossa-api
//!
//! HTTP surface of glossa: entry listing and lookup with auto-linked HTML,
//! keyword writes behind a signed session, stars, and the administrative
//! reset.

pub mod config;
pub mod error;
pub mod handlers;
pub mod services;
pub mod session;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

pub use config::{Config, Environment};
pub use error::ApiError;
pub use state::{AppState, Backends};

/// Generates time-ordered UUIDv7 request correlation IDs.
#[derive(Clone, Default)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    use handlers::{admin, entries, stars, users};

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/initialize", post(admin::initialize))
        // Entries
        .route("/api/v1/entries", get(entries::list_entries))
        .route("/api/v1/keywords", post(entries::save_keyword))
        .route(
            "/api/v1/keywords/:keyword",
            get(entries::get_keyword).delete(entries::delete_keyword),
        )
        // Target of rendered keyword links
        .route("/keyword/:keyword", get(entries::get_keyword))
        // Accounts
        .route("/api/v1/register", post(users::register))
        .route("/api/v1/login", post(users::login))
        .route("/api/v1/logout", post(users::logout))
        // Stars
        .route(
            "/api/v1/stars",
            post(stars::add_star).get(stars::list_stars),
        )
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .with_state(state)
}
