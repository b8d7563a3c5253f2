use derive_new::new;

use crate::model::{
    id::{ItemId, UserId},
    item::ItemCategory,
};

#[derive(new)]
pub struct CreateItem {
    pub title: String,
    pub description: String,
    pub hourly_price: i32,
    pub category: ItemCategory,
    pub location: Option<String>,
    pub image_url: Option<String>,
    pub registered_by: UserId,
}

// 指定のなかった項目は変更しない
#[derive(Debug, new)]
pub struct UpdateItem {
    pub item_id: ItemId,
    pub title: Option<String>,
    pub description: Option<String>,
    pub hourly_price: Option<i32>,
    pub category: Option<ItemCategory>,
    pub location: Option<String>,
    pub image_url: Option<String>,
    pub requested_user: UserId,
}

#[derive(Debug, new)]
pub struct WithdrawItem {
    pub item_id: ItemId,
    pub requested_user: UserId,
}
