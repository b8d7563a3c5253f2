use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::model::id::{PaymentId, RentalId};

pub mod event;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Done,
    Canceled,
    Aborted,
}

/// 決済履歴。レンタル 1 件につき高々 1 行（rental_id は UNIQUE）。
/// 初回の承認成功時に一度だけ作成される。
#[derive(Debug)]
pub struct Payment {
    pub payment_id: PaymentId,
    pub rental_id: RentalId,
    pub payment_key: String,
    pub order_id: String,
    pub amount: i64,
    pub status: PaymentStatus,
    pub paid_at: DateTime<Utc>,
}
