use chrono::{DateTime, Utc};
use kernel::model::{
    id::{ItemId, UserId},
    item::Item,
    user::ItemOwner,
};
use shared::error::AppError;

use super::parse_enum;

#[derive(sqlx::FromRow)]
pub struct ItemRow {
    pub item_id: ItemId,
    pub title: String,
    pub description: String,
    pub hourly_price: i32,
    pub category: String,
    pub location: Option<String>,
    pub image_url: Option<String>,
    pub item_status: String,
    pub owned_by: UserId,
    pub owner_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ItemRow> for Item {
    type Error = AppError;

    fn try_from(value: ItemRow) -> Result<Self, Self::Error> {
        let ItemRow {
            item_id,
            title,
            description,
            hourly_price,
            category,
            location,
            image_url,
            item_status,
            owned_by,
            owner_name,
            created_at,
            updated_at,
        } = value;
        Ok(Item {
            item_id,
            title,
            description,
            hourly_price,
            category: parse_enum(&category, "category")?,
            location,
            image_url,
            status: parse_enum(&item_status, "item_status")?,
            owner: ItemOwner {
                owner_id: owned_by,
                owner_name,
            },
            created_at,
            updated_at,
        })
    }
}

// 申込・取り下げ時の事前チェックに使う型
#[derive(sqlx::FromRow)]
pub struct ItemStateRow {
    pub item_id: ItemId,
    pub owned_by: UserId,
    pub hourly_price: i32,
    pub item_status: String,
}
