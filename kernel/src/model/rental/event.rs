use chrono::{DateTime, Utc};
use derive_new::new;

use crate::model::id::{ItemId, RentalId, UserId};

#[derive(Debug, new)]
pub struct CreateRental {
    pub item_id: ItemId,
    pub renter_id: UserId,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

#[derive(Debug, new)]
pub struct DecideRental {
    pub rental_id: RentalId,
    pub requested_user: UserId,
    pub approved: bool,
    pub reject_reason: Option<String>,
}

#[derive(Debug, new)]
pub struct StartRental {
    pub rental_id: RentalId,
    pub requested_user: UserId,
}

#[derive(Debug, new)]
pub struct CancelRental {
    pub rental_id: RentalId,
    pub requested_user: UserId,
}

#[derive(Debug, new)]
pub struct CompleteReturn {
    pub rental_id: RentalId,
    pub requested_user: UserId,
}
