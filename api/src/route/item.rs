use axum::{
    routing::{delete, get, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::item::{
    register_item, show_item, show_item_list, update_item, withdraw_item,
};

pub fn build_item_routers() -> Router<AppRegistry> {
    let item_routers = Router::new()
        .route("/", post(register_item))
        .route("/", get(show_item_list))
        .route("/:item_id", get(show_item))
        .route("/:item_id", put(update_item))
        .route("/:item_id", delete(withdraw_item));

    Router::new().nest("/items", item_routers)
}
