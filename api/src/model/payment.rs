use chrono::{DateTime, Utc};
use garde::Validate;
use kernel::model::{
    id::{PaymentId, RentalId},
    payment::{event::ConfirmPayment, Payment, PaymentStatus},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmPaymentRequest {
    #[garde(skip)]
    pub rental_id: RentalId,
    // プロバイダー発行の決済キーと、こちらで発行した注文 ID
    #[garde(length(min = 1))]
    pub payment_key: String,
    #[garde(length(min = 1))]
    pub order_id: String,
    #[garde(range(min = 1))]
    pub amount: i64,
}

impl From<ConfirmPaymentRequest> for ConfirmPayment {
    fn from(value: ConfirmPaymentRequest) -> Self {
        let ConfirmPaymentRequest {
            rental_id,
            payment_key,
            order_id,
            amount,
        } = value;
        ConfirmPayment {
            rental_id,
            payment_key,
            order_id,
            amount,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub payment_id: PaymentId,
    pub rental_id: RentalId,
    pub payment_key: String,
    pub order_id: String,
    pub amount: i64,
    pub status: PaymentStatus,
    pub paid_at: DateTime<Utc>,
}

impl From<Payment> for PaymentResponse {
    fn from(value: Payment) -> Self {
        let Payment {
            payment_id,
            rental_id,
            payment_key,
            order_id,
            amount,
            status,
            paid_at,
        } = value;
        Self {
            payment_id,
            rental_id,
            payment_key,
            order_id,
            amount,
            status,
            paid_at,
        }
    }
}
