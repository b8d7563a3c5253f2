use derive_new::new;

use crate::model::id::RentalId;

#[derive(Debug, new)]
pub struct ConfirmPayment {
    pub rental_id: RentalId,
    pub payment_key: String,
    pub order_id: String,
    pub amount: i64,
}
