use axum::{routing::get, Router};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/availability/month",
            get(handlers::availability::get_month_availability),
        )
        .route(
            "/api/availability/day",
            get(handlers::availability::get_day_slots),
        )
}
