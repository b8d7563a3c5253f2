use chrono::{DateTime, Utc};
use kernel::model::{
    id::{ItemId, RentalId, ReviewId, UserId},
    review::Review,
    user::ReviewAuthor,
};

#[derive(sqlx::FromRow)]
pub struct ReviewRow {
    pub review_id: ReviewId,
    pub rental_id: RentalId,
    pub item_id: ItemId,
    pub reviewer_id: UserId,
    pub reviewer_name: String,
    pub rating: i32,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<ReviewRow> for Review {
    fn from(value: ReviewRow) -> Self {
        let ReviewRow {
            review_id,
            rental_id,
            item_id,
            reviewer_id,
            reviewer_name,
            rating,
            content,
            created_at,
        } = value;
        Review {
            review_id,
            rental_id,
            item_id,
            author: ReviewAuthor {
                user_id: reviewer_id,
                user_name: reviewer_name,
            },
            rating,
            content,
            created_at,
        }
    }
}

// レビュー作成の事前チェックに使う、対象レンタルの現況
#[derive(sqlx::FromRow)]
pub struct ReviewRentalStateRow {
    pub item_id: ItemId,
    pub renter_id: UserId,
    pub rental_status: String,
}

// レビュー修正・削除の事前チェックに使う型。
// 修正期限の判定に対象レンタルの終了日時が要る。
#[derive(sqlx::FromRow)]
pub struct ReviewStateRow {
    pub review_id: ReviewId,
    pub reviewer_id: UserId,
    pub end_date: DateTime<Utc>,
}
