//! Protected routes that require authentication.
//!
//! Includes: basic details, daily records and record names.

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

use crate::app_state::AppState;
use crate::auth;
use crate::handlers::{basic_details, daily_records, record_names};

/// Build protected routes that require authentication.
pub fn protected_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .merge(basic_details_routes())
        .merge(daily_record_routes())
        .merge(record_name_routes())
        .route_layer(from_fn_with_state(
            app_state,
            auth::middleware::auth_middleware,
        ))
}

fn basic_details_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/besicdetails/",
            post(basic_details::create_basic_details),
        )
        .route(
            "/besicdetails/{user_id}/",
            get(basic_details::get_basic_details)
                .put(basic_details::update_basic_details)
                .delete(basic_details::delete_basic_details),
        )
}

/// GET and DELETE on `/dailyrecords/{id}/` address a user, PUT addresses a
/// single record.
fn daily_record_routes() -> Router<AppState> {
    Router::new()
        .route("/dailyrecords/", post(daily_records::create_daily_record))
        .route(
            "/dailyrecords/{id}/",
            get(daily_records::list_daily_records)
                .put(daily_records::update_daily_record)
                .delete(daily_records::delete_daily_records),
        )
        .route(
            "/dailyrecords/record/{record_id}/",
            get(daily_records::get_daily_record).delete(daily_records::delete_daily_record),
        )
}

fn record_name_routes() -> Router<AppState> {
    Router::new().route(
        "/recordnames/",
        get(record_names::list_record_names).post(record_names::create_record_name),
    )
}
