use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/entries", get(handlers::get_entries))
        .route("/api/calendar", get(handlers::get_calendar))
        .route("/api/locations", get(handlers::get_locations))
        .route("/api/locations/groups", get(handlers::get_location_groups))
        .route("/api/locations/group", get(handlers::get_location_group))
        .route("/api/stats", get(handlers::get_stats))
        .with_state(state)
}
