use crate::calendar::{group_by_day, group_by_week};
use crate::errors::AppError;
use crate::locations::{location_groups, location_stats};
use crate::models::{
    CalendarQuery, CalendarView, DiaryReport, Entry, LocationGroup, LocationQuery, LocationStats,
};
use crate::state::AppState;
use crate::stats::build_report;
use crate::ui::render_index;
use axum::{
    extract::{Query, State},
    response::Html,
    Json,
};
use tracing::debug;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render_index(&state.entries, &state.config))
}

pub async fn get_entries(State(state): State<AppState>) -> Json<Vec<Entry>> {
    Json(state.entries.as_ref().clone())
}

pub async fn get_calendar(
    State(state): State<AppState>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<CalendarView>, AppError> {
    let view = query.view.as_deref().map(str::trim).unwrap_or("days");
    match view {
        "days" => Ok(Json(CalendarView::Days(group_by_day(&state.entries)))),
        "weeks" => Ok(Json(CalendarView::Weeks(group_by_week(
            &state.entries,
            &state.config.week_reference,
        )))),
        _ => Err(AppError::bad_request("view must be 'days' or 'weeks'")),
    }
}

pub async fn get_locations(State(state): State<AppState>) -> Json<LocationStats> {
    Json(location_stats(&state.entries))
}

pub async fn get_location_groups(State(state): State<AppState>) -> Json<Vec<LocationGroup>> {
    Json(location_groups(&state.entries))
}

pub async fn get_location_group(
    State(state): State<AppState>,
    Query(query): Query<LocationQuery>,
) -> Result<Json<LocationGroup>, AppError> {
    let label = query.label.trim();
    location_groups(&state.entries)
        .into_iter()
        .find(|group| group.label == label)
        .map(Json)
        .ok_or_else(|| {
            debug!("no entries recorded at {label:?}");
            AppError::not_found(format!("no entries recorded at '{label}'"))
        })
}

pub async fn get_stats(State(state): State<AppState>) -> Json<DiaryReport> {
    Json(build_report(&state.entries, &state.config))
}
