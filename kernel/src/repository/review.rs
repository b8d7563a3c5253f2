use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{
    id::ItemId,
    review::{
        event::{CreateReview, DeleteReview, UpdateReview},
        Review,
    },
};

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    // レビュー作成。返却済みレンタルの借り手本人のみ、1 件まで。
    async fn create(&self, event: CreateReview) -> AppResult<Review>;
    // レビュー修正。レンタル終了後 3 日以内のみ。
    async fn update(&self, event: UpdateReview) -> AppResult<Review>;
    async fn delete(&self, event: DeleteReview) -> AppResult<()>;
    async fn find_by_item_id(&self, item_id: ItemId) -> AppResult<Vec<Review>>;
}
