use chrono::{DateTime, Utc};
use kernel::model::{
    id::{PaymentId, RentalId},
    payment::Payment,
};
use shared::error::AppError;

use super::parse_enum;

#[derive(sqlx::FromRow)]
pub struct PaymentRow {
    pub payment_id: PaymentId,
    pub rental_id: RentalId,
    pub payment_key: String,
    pub order_id: String,
    pub amount: i64,
    pub payment_status: String,
    pub paid_at: DateTime<Utc>,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = AppError;

    fn try_from(value: PaymentRow) -> Result<Self, Self::Error> {
        let PaymentRow {
            payment_id,
            rental_id,
            payment_key,
            order_id,
            amount,
            payment_status,
            paid_at,
        } = value;
        Ok(Payment {
            payment_id,
            rental_id,
            payment_key,
            order_id,
            amount,
            status: parse_enum(&payment_status, "payment_status")?,
            paid_at,
        })
    }
}
