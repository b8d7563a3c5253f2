use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    id::{RentalId, UserId},
    item::ItemStatus,
    rental::{
        event::{CancelRental, CompleteReturn, CreateRental, DecideRental, StartRental},
        total_price, Rental, RentalStatus,
    },
};
use kernel::repository::rental::RentalRepository;
use shared::error::{AppError, AppResult};

use crate::database::{
    model::{
        item::ItemStateRow,
        parse_enum,
        rental::{RentalRow, RentalStateRow},
    },
    ConnectionPool,
};

#[derive(new)]
pub struct RentalRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl RentalRepository for RentalRepositoryImpl {
    // 貸出申込を行う
    async fn create(&self, event: CreateRental) -> AppResult<Rental> {
        let mut tx = self.db.begin().await?;

        // 事前のチェックとして、以下を調べる。
        // - 指定の出品物が存在するか
        // - 自分の出品物への申込でないか
        // - 期間が正しいか（end > start）
        // - 出品物が申込を受け付けられる状態か
        //
        // 申込時点では出品物をロックしない。承認されるまでは同一出品物に
        // 対する複数の Waiting 申込が並存してよい。
        let item: Option<ItemStateRow> = sqlx::query_as(
            r#"
                SELECT item_id, owned_by, hourly_price, item_status
                FROM items
                WHERE item_id = $1
            "#,
        )
        .bind(event.item_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let Some(item) = item else {
            return Err(AppError::EntityNotFound(format!(
                "出品物（{}）が見つかりませんでした。",
                event.item_id
            )));
        };

        if item.owned_by == event.renter_id {
            return Err(AppError::ForbiddenOperation(
                "自分の出品物は借りられません。".into(),
            ));
        }

        if event.end_date <= event.start_date {
            return Err(AppError::UnprocessableEntity(
                "終了日時は開始日時より後である必要があります。".into(),
            ));
        }

        match parse_enum::<ItemStatus>(&item.item_status, "item_status")? {
            ItemStatus::Available => {}
            ItemStatus::Committed => {
                return Err(AppError::ResourceConflict(
                    "この出品物は別のレンタルで確保されています。".into(),
                ))
            }
            ItemStatus::Withdrawn => {
                return Err(AppError::UnprocessableEntity(
                    "この出品物は現在取り扱いを停止しています。".into(),
                ))
            }
        }

        // 合計金額は申込時に一度だけ計算し、以後再計算しない
        let total_price = total_price(item.hourly_price, event.start_date, event.end_date);

        let rental_id = RentalId::new();
        let res = sqlx::query(
            r#"
                INSERT INTO rentals
                (rental_id, item_id, renter_id, rental_status, total_price, start_date, end_date)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(rental_id)
        .bind(event.item_id)
        .bind(event.renter_id)
        .bind(RentalStatus::Waiting.as_ref())
        .bind(total_price)
        .bind(event.start_date)
        .bind(event.end_date)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No rental record has been created".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        self.find_by_id(rental_id).await
    }

    // 申込の承認・拒否を行う
    async fn decide(&self, event: DecideRental) -> AppResult<Rental> {
        let mut tx = self.db.begin().await?;

        let state = self.find_state_for_update(&mut tx, event.rental_id).await?;

        // ① 出品者本人か
        if state.owner_id != event.requested_user {
            return Err(AppError::ForbiddenOperation(
                "出品者のみが申込を処理できます。".into(),
            ));
        }

        // ② 未処理（Waiting）の申込か
        let status = parse_enum::<RentalStatus>(&state.rental_status, "rental_status")?;
        if status != RentalStatus::Waiting {
            return Err(AppError::InvalidStateTransition(format!(
                "この申込はすでに処理されています（現在: {}）。",
                status
            )));
        }

        if event.approved {
            // ③ 承認時点で出品物が確保可能かを確認する。
            // 申込の受付後に取り下げられている場合もここで弾く。
            match parse_enum::<ItemStatus>(&state.item_status, "item_status")? {
                ItemStatus::Available => {}
                ItemStatus::Committed => {
                    return Err(AppError::ResourceConflict(
                        "この出品物はすでに別の申込で確保されています。".into(),
                    ))
                }
                ItemStatus::Withdrawn => {
                    return Err(AppError::UnprocessableEntity(
                        "この出品物は現在取り扱いを停止しています。".into(),
                    ))
                }
            }

            // ④ 出品物のロックを条件付き更新で取得する。
            // 同じ出品物の別申込が先に承認されていた場合は更新 0 行となる。
            // 先勝ちのため、敗者には Conflict を返して再試行はしない。
            let res = sqlx::query(
                r#"
                    UPDATE items
                    SET item_status = $1
                    WHERE item_id = $2 AND item_status = $3
                "#,
            )
            .bind(ItemStatus::Committed.as_ref())
            .bind(state.item_id)
            .bind(ItemStatus::Available.as_ref())
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

            if res.rows_affected() < 1 {
                return Err(AppError::ResourceConflict(
                    "この出品物はすでに別の申込で確保されています。".into(),
                ));
            }

            // 承認時は拒否理由をクリアする
            let res = sqlx::query(
                r#"
                    UPDATE rentals
                    SET rental_status = $1, reject_reason = NULL
                    WHERE rental_id = $2 AND rental_status = $3
                "#,
            )
            .bind(RentalStatus::Approved.as_ref())
            .bind(event.rental_id)
            .bind(RentalStatus::Waiting.as_ref())
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

            if res.rows_affected() < 1 {
                return Err(AppError::NoRowsAffectedError(
                    "No rental record has been approved".into(),
                ));
            }
        } else {
            // ③ 拒否には理由が必須。出品物には触れない。
            let reason = event
                .reject_reason
                .as_deref()
                .map(str::trim)
                .unwrap_or_default();
            if reason.is_empty() {
                return Err(AppError::UnprocessableEntity(
                    "拒否理由を入力してください。".into(),
                ));
            }

            let res = sqlx::query(
                r#"
                    UPDATE rentals
                    SET rental_status = $1, reject_reason = $2
                    WHERE rental_id = $3 AND rental_status = $4
                "#,
            )
            .bind(RentalStatus::Rejected.as_ref())
            .bind(reason)
            .bind(event.rental_id)
            .bind(RentalStatus::Waiting.as_ref())
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

            if res.rows_affected() < 1 {
                return Err(AppError::NoRowsAffectedError(
                    "No rental record has been rejected".into(),
                ));
            }
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        self.find_by_id(event.rental_id).await
    }

    // 引き渡し確認を行う
    async fn start(&self, event: StartRental) -> AppResult<Rental> {
        let mut tx = self.db.begin().await?;

        let state = self.find_state_for_update(&mut tx, event.rental_id).await?;

        if state.owner_id != event.requested_user {
            return Err(AppError::ForbiddenOperation(
                "出品者のみが貸出を開始できます。".into(),
            ));
        }

        let status = parse_enum::<RentalStatus>(&state.rental_status, "rental_status")?;
        if status != RentalStatus::Paid {
            return Err(AppError::InvalidStateTransition(format!(
                "決済が完了した申込のみ貸出を開始できます（現在: {}）。",
                status
            )));
        }

        let res = sqlx::query(
            r#"
                UPDATE rentals
                SET rental_status = $1
                WHERE rental_id = $2 AND rental_status = $3
            "#,
        )
        .bind(RentalStatus::Renting.as_ref())
        .bind(event.rental_id)
        .bind(RentalStatus::Paid.as_ref())
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No rental record has been started".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        self.find_by_id(event.rental_id).await
    }

    // 借り手都合の取消を行う
    async fn cancel(&self, event: CancelRental) -> AppResult<Rental> {
        let mut tx = self.db.begin().await?;

        let state = self.find_state_for_update(&mut tx, event.rental_id).await?;

        if state.renter_id != event.requested_user {
            return Err(AppError::ForbiddenOperation(
                "申込者本人のみが取消できます。".into(),
            ));
        }

        let status = parse_enum::<RentalStatus>(&state.rental_status, "rental_status")?;
        if !status.cancellable() {
            return Err(AppError::InvalidStateTransition(format!(
                "進行中または完了済みの申込は取消できません（現在: {}）。",
                status
            )));
        }

        // 取消する申込自身がロックを保持している場合のみ解放する。
        // Waiting の申込は一度もロックを取得していないので、別の申込が
        // 確保した出品物を誤って解放してはならない。
        if status.holds_item_lock() {
            let res = sqlx::query(
                r#"
                    UPDATE items
                    SET item_status = $1
                    WHERE item_id = $2
                "#,
            )
            .bind(ItemStatus::Available.as_ref())
            .bind(state.item_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

            if res.rows_affected() < 1 {
                return Err(AppError::NoRowsAffectedError(
                    "No item record has been released".into(),
                ));
            }
        }

        let res = sqlx::query(
            r#"
                UPDATE rentals
                SET rental_status = $1
                WHERE rental_id = $2 AND rental_status = $3
            "#,
        )
        .bind(RentalStatus::Canceled.as_ref())
        .bind(event.rental_id)
        .bind(status.as_ref())
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No rental record has been canceled".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        self.find_by_id(event.rental_id).await
    }

    // 返却確認を行う
    async fn complete_return(&self, event: CompleteReturn) -> AppResult<Rental> {
        let mut tx = self.db.begin().await?;

        let state = self.find_state_for_update(&mut tx, event.rental_id).await?;

        let is_owner = state.owner_id == event.requested_user;
        let is_renter = state.renter_id == event.requested_user;
        if !is_owner && !is_renter {
            return Err(AppError::ForbiddenOperation(
                "返却を確定する権限がありません。".into(),
            ));
        }

        // Approved や Paid からの離脱は取消操作で行う。
        // 返却は実際に引き渡し済み（Renting）の場合のみ。
        let status = parse_enum::<RentalStatus>(&state.rental_status, "rental_status")?;
        if status != RentalStatus::Renting {
            return Err(AppError::InvalidStateTransition(format!(
                "貸出中（引き渡し済み）の申込のみ返却できます（現在: {}）。",
                status
            )));
        }

        let res = sqlx::query(
            r#"
                UPDATE rentals
                SET rental_status = $1
                WHERE rental_id = $2 AND rental_status = $3
            "#,
        )
        .bind(RentalStatus::Returned.as_ref())
        .bind(event.rental_id)
        .bind(RentalStatus::Renting.as_ref())
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No rental record has been returned".into(),
            ));
        }

        // 出品物のロックを解放し、次の申込を受け付けられるようにする
        let res = sqlx::query(
            r#"
                UPDATE items
                SET item_status = $1
                WHERE item_id = $2
            "#,
        )
        .bind(ItemStatus::Available.as_ref())
        .bind(state.item_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No item record has been released".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        self.find_by_id(event.rental_id).await
    }

    async fn find_by_id(&self, rental_id: RentalId) -> AppResult<Rental> {
        let row: Option<RentalRow> = sqlx::query_as(
            r#"
                SELECT
                    r.rental_id,
                    r.renter_id,
                    u.user_name AS renter_name,
                    r.rental_status,
                    r.total_price,
                    r.reject_reason,
                    r.start_date,
                    r.end_date,
                    r.created_at,
                    r.updated_at,
                    i.item_id,
                    i.title,
                    i.hourly_price,
                    i.item_status,
                    i.owned_by
                FROM rentals AS r
                INNER JOIN items AS i ON r.item_id = i.item_id
                INNER JOIN users AS u ON r.renter_id = u.user_id
                WHERE r.rental_id = $1
            "#,
        )
        .bind(rental_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        let Some(row) = row else {
            return Err(AppError::EntityNotFound(format!(
                "レンタル（{}）が見つかりませんでした。",
                rental_id
            )));
        };

        Rental::try_from(row)
    }

    // 借り手としての申込履歴を取得する
    async fn find_by_renter_id(&self, renter_id: UserId) -> AppResult<Vec<Rental>> {
        let rows: Vec<RentalRow> = sqlx::query_as(
            r#"
                SELECT
                    r.rental_id,
                    r.renter_id,
                    u.user_name AS renter_name,
                    r.rental_status,
                    r.total_price,
                    r.reject_reason,
                    r.start_date,
                    r.end_date,
                    r.created_at,
                    r.updated_at,
                    i.item_id,
                    i.title,
                    i.hourly_price,
                    i.item_status,
                    i.owned_by
                FROM rentals AS r
                INNER JOIN items AS i ON r.item_id = i.item_id
                INNER JOIN users AS u ON r.renter_id = u.user_id
                WHERE r.renter_id = $1
                ORDER BY r.created_at DESC
            "#,
        )
        .bind(renter_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        rows.into_iter().map(Rental::try_from).collect()
    }

    // 出品者として受け取った申込一覧を取得する
    async fn find_received_by_owner_id(&self, owner_id: UserId) -> AppResult<Vec<Rental>> {
        let rows: Vec<RentalRow> = sqlx::query_as(
            r#"
                SELECT
                    r.rental_id,
                    r.renter_id,
                    u.user_name AS renter_name,
                    r.rental_status,
                    r.total_price,
                    r.reject_reason,
                    r.start_date,
                    r.end_date,
                    r.created_at,
                    r.updated_at,
                    i.item_id,
                    i.title,
                    i.hourly_price,
                    i.item_status,
                    i.owned_by
                FROM rentals AS r
                INNER JOIN items AS i ON r.item_id = i.item_id
                INNER JOIN users AS u ON r.renter_id = u.user_id
                WHERE i.owned_by = $1
                ORDER BY r.created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        rows.into_iter().map(Rental::try_from).collect()
    }
}

impl RentalRepositoryImpl {
    // 状態遷移系の操作で共通の、レンタル行の行ロック付き読み込み。
    // 出品物の行はここではロックしない。出品物側の排他は
    // 承認時の条件付き更新が担う。
    async fn find_state_for_update(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        rental_id: RentalId,
    ) -> AppResult<RentalStateRow> {
        let row: Option<RentalStateRow> = sqlx::query_as(
            r#"
                SELECT
                    r.rental_id,
                    r.item_id,
                    r.renter_id,
                    i.owned_by AS owner_id,
                    r.rental_status,
                    i.item_status
                FROM rentals AS r
                INNER JOIN items AS i ON r.item_id = i.item_id
                WHERE r.rental_id = $1
                FOR UPDATE OF r
            "#,
        )
        .bind(rental_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        row.ok_or_else(|| {
            AppError::EntityNotFound(format!(
                "レンタル（{}）が見つかりませんでした。",
                rental_id
            ))
        })
    }
}
