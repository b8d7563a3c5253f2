use axum::{extract::State, Json};
use garde::Validate;
use registry::AppRegistry;
use shared::error::AppResult;

use crate::{
    extractor::AuthorizedUser,
    model::payment::{ConfirmPaymentRequest, PaymentResponse},
};

// 決済プロバイダーでの決済成功後にクライアントが呼ぶ。
// 同一レンタルへの再実行は冪等なので、通信断後の再試行も安全。
pub async fn confirm_payment(
    _user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<ConfirmPaymentRequest>,
) -> AppResult<Json<PaymentResponse>> {
    req.validate(&())?;

    registry
        .payment_repository()
        .confirm(req.into())
        .await
        .map(PaymentResponse::from)
        .map(Json)
}
