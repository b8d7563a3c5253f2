use async_trait::async_trait;
use chrono::Utc;
use derive_new::new;
use kernel::model::{
    id::{ItemId, ReviewId},
    rental::RentalStatus,
    review::{
        edit_deadline,
        event::{CreateReview, DeleteReview, UpdateReview},
        Review,
    },
};
use kernel::repository::review::ReviewRepository;
use shared::error::{AppError, AppResult};

use crate::database::{
    model::{
        parse_enum,
        review::{ReviewRentalStateRow, ReviewRow, ReviewStateRow},
    },
    ConnectionPool,
};

#[derive(new)]
pub struct ReviewRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl ReviewRepository for ReviewRepositoryImpl {
    // レビューを作成する
    async fn create(&self, event: CreateReview) -> AppResult<Review> {
        let mut tx = self.db.begin().await?;

        // ① 対象レンタルの存在と現況を確認する
        let rental: Option<ReviewRentalStateRow> = sqlx::query_as(
            r#"
                SELECT item_id, renter_id, rental_status
                FROM rentals
                WHERE rental_id = $1
                FOR UPDATE
            "#,
        )
        .bind(event.rental_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let Some(rental) = rental else {
            return Err(AppError::EntityNotFound(format!(
                "レンタル（{}）が見つかりませんでした。",
                event.rental_id
            )));
        };

        // ② 借り手本人か
        if rental.renter_id != event.reviewer_id {
            return Err(AppError::ForbiddenOperation(
                "本人が利用した取引のみレビューできます。".into(),
            ));
        }

        // ③ すでにレビュー済みでないか（1 取引 1 レビュー）
        let existing: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM reviews WHERE rental_id = $1")
                .bind(event.rental_id)
                .fetch_one(&mut *tx)
                .await
                .map_err(AppError::SpecificOperationError)?;
        if existing > 0 {
            return Err(AppError::ResourceConflict(
                "この取引のレビューはすでに作成されています。".into(),
            ));
        }

        // ④ 取引が完了（返却済み）しているか
        let status = parse_enum::<RentalStatus>(&rental.rental_status, "rental_status")?;
        if status != RentalStatus::Returned {
            return Err(AppError::InvalidStateTransition(format!(
                "返却が完了した取引のみレビューできます（現在: {}）。",
                status
            )));
        }

        let review_id = ReviewId::new();
        let res = sqlx::query(
            r#"
                INSERT INTO reviews
                (review_id, rental_id, item_id, reviewer_id, rating, content)
                VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(review_id)
        .bind(event.rental_id)
        .bind(rental.item_id)
        .bind(event.reviewer_id)
        .bind(event.rating)
        .bind(&event.content)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No review record has been created".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        self.find_by_id(review_id).await
    }

    // レビューを修正する
    async fn update(&self, event: UpdateReview) -> AppResult<Review> {
        let mut tx = self.db.begin().await?;

        // 作成者と、修正期限の判定に使う対象レンタルの終了日時を同時に引く
        let state: Option<ReviewStateRow> = sqlx::query_as(
            r#"
                SELECT v.review_id, v.reviewer_id, r.end_date
                FROM reviews AS v
                INNER JOIN rentals AS r ON v.rental_id = r.rental_id
                WHERE v.review_id = $1
                FOR UPDATE OF v
            "#,
        )
        .bind(event.review_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let Some(state) = state else {
            return Err(AppError::EntityNotFound(format!(
                "レビュー（{}）が見つかりませんでした。",
                event.review_id
            )));
        };

        if state.reviewer_id != event.requested_user {
            return Err(AppError::ForbiddenOperation(
                "本人のレビューのみ修正できます。".into(),
            ));
        }

        // 修正はレンタル終了後 3 日以内のみ
        if Utc::now() > edit_deadline(state.end_date) {
            return Err(AppError::EditWindowExpired(
                "レビューの修正期間が過ぎています（レンタル終了後 3 日以内のみ）。".into(),
            ));
        }

        let res = sqlx::query(
            r#"
                UPDATE reviews
                SET rating = $1, content = $2
                WHERE review_id = $3
            "#,
        )
        .bind(event.rating)
        .bind(&event.content)
        .bind(event.review_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No review record has been updated".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        self.find_by_id(event.review_id).await
    }

    // レビューを削除する。削除には期限を設けない。
    async fn delete(&self, event: DeleteReview) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let state: Option<ReviewStateRow> = sqlx::query_as(
            r#"
                SELECT v.review_id, v.reviewer_id, r.end_date
                FROM reviews AS v
                INNER JOIN rentals AS r ON v.rental_id = r.rental_id
                WHERE v.review_id = $1
                FOR UPDATE OF v
            "#,
        )
        .bind(event.review_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let Some(state) = state else {
            return Err(AppError::EntityNotFound(format!(
                "レビュー（{}）が見つかりませんでした。",
                event.review_id
            )));
        };

        if state.reviewer_id != event.requested_user {
            return Err(AppError::ForbiddenOperation(
                "本人のレビューのみ削除できます。".into(),
            ));
        }

        let res = sqlx::query("DELETE FROM reviews WHERE review_id = $1")
            .bind(event.review_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No review record has been deleted".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(())
    }

    // 出品物に紐づくレビュー一覧を取得する（新しい順）
    async fn find_by_item_id(&self, item_id: ItemId) -> AppResult<Vec<Review>> {
        let rows: Vec<ReviewRow> = sqlx::query_as(
            r#"
                SELECT
                    v.review_id,
                    v.rental_id,
                    v.item_id,
                    v.reviewer_id,
                    u.user_name AS reviewer_name,
                    v.rating,
                    v.content,
                    v.created_at
                FROM reviews AS v
                INNER JOIN users AS u ON v.reviewer_id = u.user_id
                WHERE v.item_id = $1
                ORDER BY v.created_at DESC
            "#,
        )
        .bind(item_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(rows.into_iter().map(Review::from).collect())
    }
}

impl ReviewRepositoryImpl {
    async fn find_by_id(&self, review_id: ReviewId) -> AppResult<Review> {
        let row: Option<ReviewRow> = sqlx::query_as(
            r#"
                SELECT
                    v.review_id,
                    v.rental_id,
                    v.item_id,
                    v.reviewer_id,
                    u.user_name AS reviewer_name,
                    v.rating,
                    v.content,
                    v.created_at
                FROM reviews AS v
                INNER JOIN users AS u ON v.reviewer_id = u.user_id
                WHERE v.review_id = $1
            "#,
        )
        .bind(review_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        row.map(Review::from).ok_or_else(|| {
            AppError::EntityNotFound(format!("レビュー（{}）が見つかりませんでした。", review_id))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{
        item::ItemRepositoryImpl, rental::RentalRepositoryImpl, user::UserRepositoryImpl,
    };
    use chrono::{DateTime, Duration};
    use kernel::model::{
        id::{RentalId, UserId},
        item::{event::CreateItem, ItemCategory},
        rental::event::{CompleteReturn, CreateRental, DecideRental, StartRental},
        user::event::CreateUser,
    };
    use kernel::repository::{
        item::ItemRepository, rental::RentalRepository, user::UserRepository,
    };

    struct Fixture {
        owner: UserId,
        renter: UserId,
        rental_id: RentalId,
    }

    // 指定の期間でレンタルを作り、引き渡しまで進めておく
    async fn renting_fixture(
        pool: &sqlx::PgPool,
        start: DateTime<chrono::Utc>,
        end: DateTime<chrono::Utc>,
    ) -> Fixture {
        let user_repo = UserRepositoryImpl::new(ConnectionPool::new(pool.clone()));
        let owner = user_repo
            .create(CreateUser::new(
                "山田太郎".into(),
                "taro@example.com".into(),
                "passw0rd".into(),
            ))
            .await
            .unwrap()
            .user_id;
        let renter = user_repo
            .create(CreateUser::new(
                "佐藤花子".into(),
                "hanako@example.com".into(),
                "passw0rd".into(),
            ))
            .await
            .unwrap()
            .user_id;

        let item_repo = ItemRepositoryImpl::new(ConnectionPool::new(pool.clone()));
        let item_id = item_repo
            .create(CreateItem::new(
                "電動ドリル".into(),
                "DIY 用の電動ドリルです。".into(),
                1000,
                ItemCategory::Tool,
                None,
                None,
                owner,
            ))
            .await
            .unwrap();

        let rental_repo = RentalRepositoryImpl::new(ConnectionPool::new(pool.clone()));
        let rental = rental_repo
            .create(CreateRental::new(item_id, renter, start, end))
            .await
            .unwrap();
        rental_repo
            .decide(DecideRental::new(rental.rental_id, owner, true, None))
            .await
            .unwrap();
        sqlx::query("UPDATE rentals SET rental_status = 'PAID' WHERE rental_id = $1")
            .bind(rental.rental_id)
            .execute(pool)
            .await
            .unwrap();
        rental_repo
            .start(StartRental::new(rental.rental_id, owner))
            .await
            .unwrap();

        Fixture {
            owner,
            renter,
            rental_id: rental.rental_id,
        }
    }

    async fn complete_return(pool: &sqlx::PgPool, fx: &Fixture) {
        let rental_repo = RentalRepositoryImpl::new(ConnectionPool::new(pool.clone()));
        rental_repo
            .complete_return(CompleteReturn::new(fx.rental_id, fx.renter))
            .await
            .unwrap();
    }

    #[sqlx::test]
    async fn review_requires_returned_rental(pool: sqlx::PgPool) {
        let now = chrono::Utc::now();
        let fx = renting_fixture(&pool, now - Duration::hours(3), now - Duration::hours(1)).await;
        let repo = ReviewRepositoryImpl::new(ConnectionPool::new(pool.clone()));

        // 貸出中（Renting）のレビューは不可
        let res = repo
            .create(CreateReview::new(
                fx.rental_id,
                fx.renter,
                5,
                "とても良い品でした。".into(),
            ))
            .await;
        assert!(matches!(res, Err(AppError::InvalidStateTransition(_))));

        // 返却後は同じ呼び出しが成功する
        complete_return(&pool, &fx).await;
        let review = repo
            .create(CreateReview::new(
                fx.rental_id,
                fx.renter,
                5,
                "とても良い品でした。".into(),
            ))
            .await
            .unwrap();
        assert_eq!(review.rating, 5);
        assert_eq!(review.author.user_id, fx.renter);
    }

    #[sqlx::test]
    async fn review_is_renter_only_and_unique_per_rental(pool: sqlx::PgPool) {
        let now = chrono::Utc::now();
        let fx = renting_fixture(&pool, now - Duration::hours(3), now - Duration::hours(1)).await;
        complete_return(&pool, &fx).await;
        let repo = ReviewRepositoryImpl::new(ConnectionPool::new(pool.clone()));

        // 借り手以外（出品者を含む）は書けない
        let res = repo
            .create(CreateReview::new(
                fx.rental_id,
                fx.owner,
                4,
                "良い借り手でした。".into(),
            ))
            .await;
        assert!(matches!(res, Err(AppError::ForbiddenOperation(_))));

        repo.create(CreateReview::new(
            fx.rental_id,
            fx.renter,
            4,
            "使いやすかったです。".into(),
        ))
        .await
        .unwrap();

        // 同じ取引への 2 件目は Conflict
        let res = repo
            .create(CreateReview::new(
                fx.rental_id,
                fx.renter,
                3,
                "二度目の投稿です。".into(),
            ))
            .await;
        assert!(matches!(res, Err(AppError::ResourceConflict(_))));
    }

    #[sqlx::test]
    async fn update_within_window_succeeds(pool: sqlx::PgPool) {
        let now = chrono::Utc::now();
        // 終了から 1 時間後。修正期限（3 日）には収まる。
        let fx = renting_fixture(&pool, now - Duration::hours(3), now - Duration::hours(1)).await;
        complete_return(&pool, &fx).await;
        let repo = ReviewRepositoryImpl::new(ConnectionPool::new(pool.clone()));

        let review = repo
            .create(CreateReview::new(
                fx.rental_id,
                fx.renter,
                3,
                "概ね満足です。".into(),
            ))
            .await
            .unwrap();

        // 他人は修正できない
        let res = repo
            .update(UpdateReview::new(
                review.review_id,
                fx.owner,
                1,
                "書き換え".into(),
            ))
            .await;
        assert!(matches!(res, Err(AppError::ForbiddenOperation(_))));

        let updated = repo
            .update(UpdateReview::new(
                review.review_id,
                fx.renter,
                4,
                "再度使ってみたら満足でした。".into(),
            ))
            .await
            .unwrap();
        assert_eq!(updated.rating, 4);
        assert_eq!(updated.content, "再度使ってみたら満足でした。");
    }

    #[sqlx::test]
    async fn update_after_window_expires(pool: sqlx::PgPool) {
        let now = chrono::Utc::now();
        // レンタル終了が 4 日前 → 修正期限（終了 + 3 日）を過ぎている
        let fx = renting_fixture(&pool, now - Duration::days(5), now - Duration::days(4)).await;
        complete_return(&pool, &fx).await;
        let repo = ReviewRepositoryImpl::new(ConnectionPool::new(pool.clone()));

        let review = repo
            .create(CreateReview::new(
                fx.rental_id,
                fx.renter,
                2,
                "期待とは違いました。".into(),
            ))
            .await
            .unwrap();

        let res = repo
            .update(UpdateReview::new(
                review.review_id,
                fx.renter,
                5,
                "やっぱり良かったです。".into(),
            ))
            .await;
        assert!(matches!(res, Err(AppError::EditWindowExpired(_))));

        // 削除には期限がない
        repo.delete(DeleteReview::new(review.review_id, fx.renter))
            .await
            .unwrap();
    }

    #[sqlx::test]
    async fn delete_is_author_only(pool: sqlx::PgPool) {
        let now = chrono::Utc::now();
        let fx = renting_fixture(&pool, now - Duration::hours(3), now - Duration::hours(1)).await;
        complete_return(&pool, &fx).await;
        let repo = ReviewRepositoryImpl::new(ConnectionPool::new(pool.clone()));

        let review = repo
            .create(CreateReview::new(
                fx.rental_id,
                fx.renter,
                5,
                "また借りたいです。".into(),
            ))
            .await
            .unwrap();

        let res = repo
            .delete(DeleteReview::new(review.review_id, fx.owner))
            .await;
        assert!(matches!(res, Err(AppError::ForbiddenOperation(_))));

        repo.delete(DeleteReview::new(review.review_id, fx.renter))
            .await
            .unwrap();

        let listed = repo.find_by_item_id(review.item_id).await.unwrap();
        assert!(listed.is_empty());
    }
}
