use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{
    id::{RentalId, UserId},
    rental::{
        event::{CancelRental, CompleteReturn, CreateRental, DecideRental, StartRental},
        Rental,
    },
};

#[async_trait]
pub trait RentalRepository: Send + Sync {
    // 貸出申込。出品物のロックは取得しない（承認時に取得する）。
    async fn create(&self, event: CreateRental) -> AppResult<Rental>;
    // 承認または拒否。承認は出品物の Committed ロック取得を伴う。
    async fn decide(&self, event: DecideRental) -> AppResult<Rental>;
    // 引き渡し確認。Paid → Renting。
    async fn start(&self, event: StartRental) -> AppResult<Rental>;
    // 借り手都合の取消。{Waiting, Approved, Paid} → Canceled。
    async fn cancel(&self, event: CancelRental) -> AppResult<Rental>;
    // 返却確認。Renting → Returned、出品物のロックを解放する。
    async fn complete_return(&self, event: CompleteReturn) -> AppResult<Rental>;
    async fn find_by_id(&self, rental_id: RentalId) -> AppResult<Rental>;
    // 借り手としての申込履歴（新しい順）
    async fn find_by_renter_id(&self, renter_id: UserId) -> AppResult<Vec<Rental>>;
    // 出品者として受け取った申込一覧（新しい順）
    async fn find_received_by_owner_id(&self, owner_id: UserId) -> AppResult<Vec<Rental>>;
}
