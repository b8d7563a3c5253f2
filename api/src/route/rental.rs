use axum::{
    routing::{get, post},
    Router,
};
use registry::AppRegistry;

use crate::handler::rental::{
    cancel_rental, decide_rental, register_rental, return_rental, show_my_rentals,
    show_received_requests, start_rental,
};

pub fn build_rental_routers() -> Router<AppRegistry> {
    let rental_routers = Router::new()
        .route("/", post(register_rental))
        .route("/my", get(show_my_rentals))
        .route("/requests", get(show_received_requests))
        .route("/:rental_id/decision", post(decide_rental))
        .route("/:rental_id/start", post(start_rental))
        .route("/:rental_id/cancel", post(cancel_rental))
        .route("/:rental_id/return", post(return_rental));

    Router::new().nest("/rentals", rental_routers)
}
