use chrono::{DateTime, Utc};
use derive_new::new;
use garde::Validate;
use kernel::model::{
    id::{ItemId, RentalId, UserId},
    item::ItemStatus,
    rental::{
        event::{CreateRental, DecideRental},
        Rental, RentalItem, RentalStatus,
    },
    user::RentalUser,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRentalRequest {
    #[garde(skip)]
    pub item_id: ItemId,
    #[garde(skip)]
    pub start_date: DateTime<Utc>,
    #[garde(skip)]
    pub end_date: DateTime<Utc>,
}

#[derive(new)]
pub struct CreateRentalRequestWithUser(CreateRentalRequest, UserId);

impl From<CreateRentalRequestWithUser> for CreateRental {
    fn from(value: CreateRentalRequestWithUser) -> Self {
        let CreateRentalRequestWithUser(
            CreateRentalRequest {
                item_id,
                start_date,
                end_date,
            },
            renter_id,
        ) = value;
        CreateRental {
            item_id,
            renter_id,
            start_date,
            end_date,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DecideRentalRequest {
    #[garde(skip)]
    pub approved: bool,
    // 拒否時のみ必須。必須チェックは状態遷移側で行う。
    #[garde(skip)]
    pub reject_reason: Option<String>,
}

#[derive(new)]
pub struct DecideRentalRequestWithIds(RentalId, UserId, DecideRentalRequest);

impl From<DecideRentalRequestWithIds> for DecideRental {
    fn from(value: DecideRentalRequestWithIds) -> Self {
        let DecideRentalRequestWithIds(
            rental_id,
            requested_user,
            DecideRentalRequest {
                approved,
                reject_reason,
            },
        ) = value;
        DecideRental {
            rental_id,
            requested_user,
            approved,
            reject_reason,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RentalsResponse {
    pub items: Vec<RentalResponse>,
}

impl From<Vec<Rental>> for RentalsResponse {
    fn from(value: Vec<Rental>) -> Self {
        Self {
            items: value.into_iter().map(RentalResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RentalResponse {
    pub rental_id: RentalId,
    pub renter: RentalUserResponse,
    pub status: RentalStatus,
    pub total_price: i32,
    pub reject_reason: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub item: RentalItemResponse,
}

impl From<Rental> for RentalResponse {
    fn from(value: Rental) -> Self {
        let Rental {
            rental_id,
            renter,
            status,
            total_price,
            reject_reason,
            start_date,
            end_date,
            created_at,
            updated_at: _,
            item,
        } = value;
        Self {
            rental_id,
            renter: renter.into(),
            status,
            total_price,
            reject_reason,
            start_date,
            end_date,
            created_at,
            item: item.into(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RentalUserResponse {
    pub user_id: UserId,
    pub user_name: String,
}

impl From<RentalUser> for RentalUserResponse {
    fn from(value: RentalUser) -> Self {
        let RentalUser { user_id, user_name } = value;
        Self { user_id, user_name }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RentalItemResponse {
    pub item_id: ItemId,
    pub title: String,
    pub hourly_price: i32,
    pub status: ItemStatus,
    pub owner_id: UserId,
}

impl From<RentalItem> for RentalItemResponse {
    fn from(value: RentalItem) -> Self {
        let RentalItem {
            item_id,
            title,
            hourly_price,
            status,
            owner_id,
        } = value;
        Self {
            item_id,
            title,
            hourly_price,
            status,
            owner_id,
        }
    }
}
