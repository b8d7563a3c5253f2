use axum::{
    routing::{delete, get, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::review::{delete_review, register_review, show_item_reviews, update_review};

pub fn build_review_routers() -> Router<AppRegistry> {
    let review_routers = Router::new()
        .route("/", post(register_review))
        .route("/item/:item_id", get(show_item_reviews))
        .route("/:review_id", put(update_review))
        .route("/:review_id", delete(delete_review));

    Router::new().nest("/reviews", review_routers)
}
