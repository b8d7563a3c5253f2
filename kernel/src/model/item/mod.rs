use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::model::{id::ItemId, user::ItemOwner};

pub mod event;

/// 出品物の貸出可否ステータス。
/// Committed への遷移はレンタル承認時の条件付き更新のみが行い、
/// 他のコンポーネントが直接書き換えることはない。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemStatus {
    Available,
    Committed,
    Withdrawn,
}

impl ItemStatus {
    pub fn is_committable(&self) -> bool {
        matches!(self, ItemStatus::Available)
    }
}

/// 出品物のカテゴリー。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemCategory {
    Digital,
    Living,
    Camera,
    Camping,
    Tool,
    Sports,
    Party,
    Clothing,
    Kids,
    Furniture,
    Book,
    Game,
    Beauty,
    Pet,
    Etc,
}

#[derive(Debug)]
pub struct Item {
    pub item_id: ItemId,
    pub title: String,
    pub description: String,
    pub hourly_price: i32,
    pub category: ItemCategory,
    pub location: Option<String>,
    pub image_url: Option<String>,
    pub status: ItemStatus,
    pub owner: ItemOwner,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// 一覧取得の絞り込み・ページネーション設定値
#[derive(Debug)]
pub struct ItemListOptions {
    pub category: Option<ItemCategory>,
    pub keyword: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_available_items_are_committable() {
        assert!(ItemStatus::Available.is_committable());
        assert!(!ItemStatus::Committed.is_committable());
        assert!(!ItemStatus::Withdrawn.is_committable());
    }

    #[test]
    fn status_round_trips_through_db_representation() {
        assert_eq!(ItemStatus::Available.as_ref(), "AVAILABLE");
        assert_eq!("COMMITTED".parse::<ItemStatus>().unwrap(), ItemStatus::Committed);
        assert!("UNKNOWN".parse::<ItemStatus>().is_err());
    }

    #[test]
    fn category_round_trips_through_db_representation() {
        assert_eq!(ItemCategory::Digital.as_ref(), "DIGITAL");
        assert_eq!("CAMPING".parse::<ItemCategory>().unwrap(), ItemCategory::Camping);
        assert!("UNKNOWN".parse::<ItemCategory>().is_err());
    }
}
