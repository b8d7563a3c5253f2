use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{
    id::RentalId,
    payment::{event::ConfirmPayment, Payment},
};

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    // 決済承認。同一レンタルへの再実行は冪等（既存の決済履歴を返す）。
    async fn confirm(&self, event: ConfirmPayment) -> AppResult<Payment>;
    async fn find_by_rental_id(&self, rental_id: RentalId) -> AppResult<Option<Payment>>;
}
