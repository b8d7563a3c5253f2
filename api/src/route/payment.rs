use axum::{routing::post, Router};
use registry::AppRegistry;

use crate::handler::payment::confirm_payment;

pub fn build_payment_routers() -> Router<AppRegistry> {
    let payment_routers = Router::new().route("/confirm", post(confirm_payment));

    Router::new().nest("/payments", payment_routers)
}
