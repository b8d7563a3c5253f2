use chrono::{DateTime, Utc};
use derive_new::new;
use garde::Validate;
use kernel::model::{
    id::{ItemId, UserId},
    item::{
        event::{CreateItem, UpdateItem},
        Item, ItemCategory, ItemListOptions, ItemStatus,
    },
    user::ItemOwner,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    #[garde(length(min = 1, max = 100))]
    pub title: String,
    #[garde(length(min = 1))]
    pub description: String,
    // 1 時間あたりの料金（通貨最小単位の正の整数）
    #[garde(range(min = 1))]
    pub hourly_price: i32,
    #[garde(skip)]
    pub category: ItemCategory,
    #[garde(skip)]
    pub location: Option<String>,
    #[garde(skip)]
    pub image_url: Option<String>,
}

#[derive(new)]
pub struct CreateItemRequestWithUser(CreateItemRequest, UserId);

impl From<CreateItemRequestWithUser> for CreateItem {
    fn from(value: CreateItemRequestWithUser) -> Self {
        let CreateItemRequestWithUser(
            CreateItemRequest {
                title,
                description,
                hourly_price,
                category,
                location,
                image_url,
            },
            registered_by,
        ) = value;
        CreateItem {
            title,
            description,
            hourly_price,
            category,
            location,
            image_url,
            registered_by,
        }
    }
}

// 指定のなかった項目は変更しない
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemRequest {
    #[garde(inner(length(min = 1, max = 100)))]
    pub title: Option<String>,
    #[garde(inner(length(min = 1)))]
    pub description: Option<String>,
    #[garde(inner(range(min = 1)))]
    pub hourly_price: Option<i32>,
    #[garde(skip)]
    pub category: Option<ItemCategory>,
    #[garde(skip)]
    pub location: Option<String>,
    #[garde(skip)]
    pub image_url: Option<String>,
}

#[derive(new)]
pub struct UpdateItemRequestWithIds(ItemId, UserId, UpdateItemRequest);

impl From<UpdateItemRequestWithIds> for UpdateItem {
    fn from(value: UpdateItemRequestWithIds) -> Self {
        let UpdateItemRequestWithIds(
            item_id,
            requested_user,
            UpdateItemRequest {
                title,
                description,
                hourly_price,
                category,
                location,
                image_url,
            },
        ) = value;
        UpdateItem {
            item_id,
            title,
            description,
            hourly_price,
            category,
            location,
            image_url,
            requested_user,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ItemListQuery {
    #[garde(skip)]
    pub category: Option<ItemCategory>,
    // タイトルの部分一致検索
    #[garde(skip)]
    pub keyword: Option<String>,
    #[garde(range(min = 0))]
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[garde(range(min = 0))]
    #[serde(default)]
    pub offset: i64,
}

const DEFAULT_LIMIT: i64 = 20;
const fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

impl From<ItemListQuery> for ItemListOptions {
    fn from(value: ItemListQuery) -> Self {
        let ItemListQuery {
            category,
            keyword,
            limit,
            offset,
        } = value;
        Self {
            category,
            keyword,
            limit,
            offset,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemsResponse {
    pub items: Vec<ItemResponse>,
}

impl From<Vec<Item>> for ItemsResponse {
    fn from(value: Vec<Item>) -> Self {
        Self {
            items: value.into_iter().map(ItemResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponse {
    pub id: ItemId,
    pub title: String,
    pub description: String,
    pub hourly_price: i32,
    pub category: ItemCategory,
    pub location: Option<String>,
    pub image_url: Option<String>,
    pub status: ItemStatus,
    pub owner: ItemOwnerResponse,
    pub created_at: DateTime<Utc>,
}

impl From<Item> for ItemResponse {
    fn from(value: Item) -> Self {
        let Item {
            item_id,
            title,
            description,
            hourly_price,
            category,
            location,
            image_url,
            status,
            owner,
            created_at,
            updated_at: _,
        } = value;
        Self {
            id: item_id,
            title,
            description,
            hourly_price,
            category,
            location,
            image_url,
            status,
            owner: owner.into(),
            created_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemOwnerResponse {
    pub owner_id: UserId,
    pub owner_name: String,
}

impl From<ItemOwner> for ItemOwnerResponse {
    fn from(value: ItemOwner) -> Self {
        let ItemOwner {
            owner_id,
            owner_name,
        } = value;
        Self {
            owner_id,
            owner_name,
        }
    }
}
