use chrono::{DateTime, Utc};
use kernel::model::{
    id::{ItemId, RentalId, UserId},
    rental::{Rental, RentalItem},
    user::RentalUser,
};
use shared::error::AppError;

use super::parse_enum;

// 状態遷移の事前チェックに使う型。
// レンタル行と、ロック対象である出品物の現況を一度に引く。
#[derive(sqlx::FromRow)]
pub struct RentalStateRow {
    pub rental_id: RentalId,
    pub item_id: ItemId,
    pub renter_id: UserId,
    pub owner_id: UserId,
    pub rental_status: String,
    pub item_status: String,
}

// 決済承認の事前チェックに使う型
#[derive(sqlx::FromRow)]
pub struct RentalPaymentStateRow {
    pub rental_id: RentalId,
    pub rental_status: String,
    pub total_price: i32,
}

// 一覧・詳細取得に使う型。出品物と借り手の情報も一緒に抽出する。
#[derive(sqlx::FromRow)]
pub struct RentalRow {
    pub rental_id: RentalId,
    pub renter_id: UserId,
    pub renter_name: String,
    pub rental_status: String,
    pub total_price: i32,
    pub reject_reason: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub item_id: ItemId,
    pub title: String,
    pub hourly_price: i32,
    pub item_status: String,
    pub owned_by: UserId,
}

impl TryFrom<RentalRow> for Rental {
    type Error = AppError;

    fn try_from(value: RentalRow) -> Result<Self, Self::Error> {
        let RentalRow {
            rental_id,
            renter_id,
            renter_name,
            rental_status,
            total_price,
            reject_reason,
            start_date,
            end_date,
            created_at,
            updated_at,
            item_id,
            title,
            hourly_price,
            item_status,
            owned_by,
        } = value;
        Ok(Rental {
            rental_id,
            renter: RentalUser {
                user_id: renter_id,
                user_name: renter_name,
            },
            status: parse_enum(&rental_status, "rental_status")?,
            total_price,
            reject_reason,
            start_date,
            end_date,
            created_at,
            updated_at,
            item: RentalItem {
                item_id,
                title,
                hourly_price,
                status: parse_enum(&item_status, "item_status")?,
                owner_id: owned_by,
            },
        })
    }
}
