use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{
    id::ItemId,
    item::{
        event::{CreateItem, UpdateItem, WithdrawItem},
        Item, ItemListOptions,
    },
};

#[async_trait]
pub trait ItemRepository: Send + Sync {
    async fn create(&self, event: CreateItem) -> AppResult<ItemId>;
    async fn find_all(&self, options: ItemListOptions) -> AppResult<Vec<Item>>;
    async fn find_by_id(&self, item_id: ItemId) -> AppResult<Option<Item>>;
    // 出品内容の修正。出品者本人のみ。
    async fn update(&self, event: UpdateItem) -> AppResult<()>;
    // 出品の取り下げ。Committed 中は不可。
    async fn withdraw(&self, event: WithdrawItem) -> AppResult<()>;
}
