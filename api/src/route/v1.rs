use axum::Router;
use registry::AppRegistry;

use super::{
    health::build_health_check_routers, item::build_item_routers,
    payment::build_payment_routers, rental::build_rental_routers, review::build_review_routers,
    user::build_user_routers,
};

pub fn routes() -> Router<AppRegistry> {
    let router = Router::new()
        .merge(build_health_check_routers())
        .merge(build_user_routers())
        .merge(build_item_routers())
        .merge(build_rental_routers())
        .merge(build_payment_routers())
        .merge(build_review_routers());

    Router::new().nest("/api/v1", router)
}
