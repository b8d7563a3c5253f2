use std::sync::Arc;

use async_trait::async_trait;
use derive_new::new;
use kernel::gateway::payment::{PaymentGateway, ProviderConfirmOrder};
use kernel::model::{
    id::{PaymentId, RentalId},
    payment::{event::ConfirmPayment, Payment, PaymentStatus},
    rental::RentalStatus,
};
use kernel::repository::payment::PaymentRepository;
use shared::error::{AppError, AppResult};

use crate::database::{
    model::{
        parse_enum,
        payment::PaymentRow,
        rental::RentalPaymentStateRow,
    },
    ConnectionPool,
};

#[derive(new)]
pub struct PaymentRepositoryImpl {
    db: ConnectionPool,
    gateway: Arc<dyn PaymentGateway>,
}

#[async_trait]
impl PaymentRepository for PaymentRepositoryImpl {
    // 決済承認を行う
    async fn confirm(&self, event: ConfirmPayment) -> AppResult<Payment> {
        // ① 対象レンタルの現況を確認する
        let rental: Option<RentalPaymentStateRow> = sqlx::query_as(
            r#"
                SELECT rental_id, rental_status, total_price
                FROM rentals
                WHERE rental_id = $1
            "#,
        )
        .bind(event.rental_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        let Some(rental) = rental else {
            return Err(AppError::EntityNotFound(format!(
                "レンタル（{}）が見つかりませんでした。",
                event.rental_id
            )));
        };

        let status = parse_enum::<RentalStatus>(&rental.rental_status, "rental_status")?;

        // ② すでに Paid なら既存の決済履歴を返す（冪等リプレイ）。
        // ネットワーク断後のクライアント再試行で二重課金させない。
        // プロバイダーへの再問い合わせも行わない。
        if status == RentalStatus::Paid {
            if let Some(payment) = self.find_by_rental_id(event.rental_id).await? {
                return Ok(payment);
            }
        }

        if status != RentalStatus::Approved {
            return Err(AppError::InvalidStateTransition(format!(
                "承認済みの申込のみ決済できます（現在: {}）。",
                status
            )));
        }

        // ③ 金額検証。プロバイダーを呼ぶ前に行う。
        if event.amount != rental.total_price as i64 {
            return Err(AppError::UnprocessableEntity(format!(
                "決済金額が一致しません（請求額: {}, 要求額: {}）。",
                rental.total_price, event.amount
            )));
        }

        // ④ 外部プロバイダーの承認 API を呼ぶ。失敗・タイムアウト時は
        // レンタルを Approved のまま残すので、呼び出し側は再試行できる。
        self.gateway
            .confirm(ProviderConfirmOrder::new(
                event.payment_key.clone(),
                event.order_id.clone(),
                event.amount,
            ))
            .await?;

        // ⑤ プロバイダー成功後、状態遷移と決済履歴の作成を
        // 1 トランザクションで行う
        let mut tx = self.db.begin().await?;

        let res = sqlx::query(
            r#"
                UPDATE rentals
                SET rental_status = $1
                WHERE rental_id = $2 AND rental_status = $3
            "#,
        )
        .bind(RentalStatus::Paid.as_ref())
        .bind(event.rental_id)
        .bind(RentalStatus::Approved.as_ref())
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            // 競合した Confirm が先に完了している。勝者の決済履歴を返す。
            tx.rollback().await.map_err(AppError::TransactionError)?;
            return self
                .find_by_rental_id(event.rental_id)
                .await?
                .ok_or_else(|| {
                    AppError::ResourceConflict(
                        "決済処理が競合しました。時間をおいて再度お試しください。".into(),
                    )
                });
        }

        let payment_id = PaymentId::new();
        let res = sqlx::query(
            r#"
                INSERT INTO payments
                (payment_id, rental_id, payment_key, order_id, amount, payment_status)
                VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(payment_id)
        .bind(event.rental_id)
        .bind(&event.payment_key)
        .bind(&event.order_id)
        .bind(event.amount)
        .bind(PaymentStatus::Done.as_ref())
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No payment record has been created".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        self.find_by_rental_id(event.rental_id)
            .await?
            .ok_or_else(|| {
                AppError::EntityNotFound("作成した決済履歴を取得できませんでした。".into())
            })
    }

    async fn find_by_rental_id(&self, rental_id: RentalId) -> AppResult<Option<Payment>> {
        let row: Option<PaymentRow> = sqlx::query_as(
            r#"
                SELECT
                    payment_id,
                    rental_id,
                    payment_key,
                    order_id,
                    amount,
                    payment_status,
                    paid_at
                FROM payments
                WHERE rental_id = $1
            "#,
        )
        .bind(rental_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        row.map(Payment::try_from).transpose()
    }
}
