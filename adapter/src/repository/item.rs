use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    id::ItemId,
    item::{
        event::{CreateItem, UpdateItem, WithdrawItem},
        Item, ItemListOptions, ItemStatus,
    },
};
use kernel::repository::item::ItemRepository;
use shared::error::{AppError, AppResult};

use crate::database::{
    model::{
        item::{ItemRow, ItemStateRow},
        parse_enum,
    },
    ConnectionPool,
};

#[derive(new)]
pub struct ItemRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl ItemRepository for ItemRepositoryImpl {
    async fn create(&self, event: CreateItem) -> AppResult<ItemId> {
        let item_id = ItemId::new();
        let res = sqlx::query(
            r#"
                INSERT INTO items
                (item_id, owned_by, title, description, hourly_price,
                category, location, image_url, item_status)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(item_id)
        .bind(event.registered_by)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.hourly_price)
        .bind(event.category.as_ref())
        .bind(&event.location)
        .bind(&event.image_url)
        .bind(ItemStatus::Available.as_ref())
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No item record has been created".into(),
            ));
        }

        Ok(item_id)
    }

    async fn find_all(&self, options: ItemListOptions) -> AppResult<Vec<Item>> {
        // 取り下げ済みの出品は一覧に出さない。
        // カテゴリーとキーワード（タイトル部分一致）で絞り込める。
        let rows: Vec<ItemRow> = sqlx::query_as(
            r#"
                SELECT
                    i.item_id,
                    i.title,
                    i.description,
                    i.hourly_price,
                    i.category,
                    i.location,
                    i.image_url,
                    i.item_status,
                    i.owned_by,
                    u.user_name AS owner_name,
                    i.created_at,
                    i.updated_at
                FROM items AS i
                INNER JOIN users AS u ON i.owned_by = u.user_id
                WHERE i.item_status <> $1
                AND ($2::VARCHAR IS NULL OR i.category = $2)
                AND ($3::VARCHAR IS NULL OR i.title ILIKE '%' || $3 || '%')
                ORDER BY i.created_at DESC
                LIMIT $4
                OFFSET $5
            "#,
        )
        .bind(ItemStatus::Withdrawn.as_ref())
        .bind(options.category.map(|c| c.to_string()))
        .bind(&options.keyword)
        .bind(options.limit)
        .bind(options.offset)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        rows.into_iter().map(Item::try_from).collect()
    }

    async fn find_by_id(&self, item_id: ItemId) -> AppResult<Option<Item>> {
        let row: Option<ItemRow> = sqlx::query_as(
            r#"
                SELECT
                    i.item_id,
                    i.title,
                    i.description,
                    i.hourly_price,
                    i.category,
                    i.location,
                    i.image_url,
                    i.item_status,
                    i.owned_by,
                    u.user_name AS owner_name,
                    i.created_at,
                    i.updated_at
                FROM items AS i
                INNER JOIN users AS u ON i.owned_by = u.user_id
                WHERE i.item_id = $1
            "#,
        )
        .bind(item_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        row.map(Item::try_from).transpose()
    }

    async fn update(&self, event: UpdateItem) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let row: Option<ItemStateRow> = sqlx::query_as(
            r#"
                SELECT item_id, owned_by, hourly_price, item_status
                FROM items
                WHERE item_id = $1
                FOR UPDATE
            "#,
        )
        .bind(event.item_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let Some(item) = row else {
            return Err(AppError::EntityNotFound(format!(
                "出品物（{}）が見つかりませんでした。",
                event.item_id
            )));
        };

        if item.owned_by != event.requested_user {
            return Err(AppError::ForbiddenOperation(
                "出品者のみが出品内容を修正できます。".into(),
            ));
        }

        // 指定のなかった項目は現在の値を保持する。
        // 料金の変更は既存レンタルの合計金額には影響しない
        // （合計金額は申込時に確定済み）。
        let res = sqlx::query(
            r#"
                UPDATE items
                SET title = COALESCE($1, title),
                    description = COALESCE($2, description),
                    hourly_price = COALESCE($3, hourly_price),
                    category = COALESCE($4, category),
                    location = COALESCE($5, location),
                    image_url = COALESCE($6, image_url)
                WHERE item_id = $7
            "#,
        )
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.hourly_price)
        .bind(event.category.map(|c| c.to_string()))
        .bind(&event.location)
        .bind(&event.image_url)
        .bind(event.item_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No item record has been updated".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(())
    }

    async fn withdraw(&self, event: WithdrawItem) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let row: Option<ItemStateRow> = sqlx::query_as(
            r#"
                SELECT item_id, owned_by, hourly_price, item_status
                FROM items
                WHERE item_id = $1
                FOR UPDATE
            "#,
        )
        .bind(event.item_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let Some(item) = row else {
            return Err(AppError::EntityNotFound(format!(
                "出品物（{}）が見つかりませんでした。",
                event.item_id
            )));
        };

        if item.owned_by != event.requested_user {
            return Err(AppError::ForbiddenOperation(
                "出品者のみが出品を取り下げられます。".into(),
            ));
        }

        // 貸出予約が確保している間は取り下げられない。
        // 解放（返却または取消）を待ってからやり直してもらう。
        if parse_enum::<ItemStatus>(&item.item_status, "item_status")? == ItemStatus::Committed {
            return Err(AppError::UnprocessableEntity(
                "貸出予約が確定している出品物は取り下げられません。".into(),
            ));
        }

        let res = sqlx::query(
            r#"
                UPDATE items
                SET item_status = $1
                WHERE item_id = $2
            "#,
        )
        .bind(ItemStatus::Withdrawn.as_ref())
        .bind(event.item_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No item record has been withdrawn".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::user::UserRepositoryImpl;
    use kernel::model::item::ItemCategory;
    use kernel::model::user::event::CreateUser;
    use kernel::repository::user::UserRepository;

    async fn register_user(pool: &sqlx::PgPool, name: &str, email: &str) -> kernel::model::id::UserId {
        let repo = UserRepositoryImpl::new(ConnectionPool::new(pool.clone()));
        let user = repo
            .create(CreateUser::new(name.into(), email.into(), "passw0rd".into()))
            .await
            .unwrap();
        user.user_id
    }

    fn list_all() -> ItemListOptions {
        ItemListOptions {
            category: None,
            keyword: None,
            limit: 20,
            offset: 0,
        }
    }

    #[sqlx::test]
    async fn register_and_fetch_item(pool: sqlx::PgPool) {
        let owner_id = register_user(&pool, "山田太郎", "taro@example.com").await;
        let repo = ItemRepositoryImpl::new(ConnectionPool::new(pool.clone()));

        let item_id = repo
            .create(CreateItem::new(
                "電動ドリル".into(),
                "DIY 用の電動ドリルです。".into(),
                800,
                ItemCategory::Tool,
                Some("東京都世田谷区".into()),
                None,
                owner_id,
            ))
            .await
            .unwrap();

        let item = repo.find_by_id(item_id).await.unwrap().unwrap();
        assert_eq!(item.title, "電動ドリル");
        assert_eq!(item.hourly_price, 800);
        assert_eq!(item.category, ItemCategory::Tool);
        assert_eq!(item.location.as_deref(), Some("東京都世田谷区"));
        assert_eq!(item.status, ItemStatus::Available);
        assert_eq!(item.owner.owner_id, owner_id);

        let listed = repo.find_all(list_all()).await.unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[sqlx::test]
    async fn listing_filters_by_category_and_keyword(pool: sqlx::PgPool) {
        let owner_id = register_user(&pool, "山田太郎", "taro@example.com").await;
        let repo = ItemRepositoryImpl::new(ConnectionPool::new(pool.clone()));

        repo.create(CreateItem::new(
            "電動ドリル".into(),
            "DIY 用の電動ドリルです。".into(),
            800,
            ItemCategory::Tool,
            None,
            None,
            owner_id,
        ))
        .await
        .unwrap();
        repo.create(CreateItem::new(
            "4 人用テント".into(),
            "ファミリーキャンプ向け。".into(),
            1200,
            ItemCategory::Camping,
            None,
            None,
            owner_id,
        ))
        .await
        .unwrap();

        let camping = repo
            .find_all(ItemListOptions {
                category: Some(ItemCategory::Camping),
                keyword: None,
                limit: 20,
                offset: 0,
            })
            .await
            .unwrap();
        assert_eq!(camping.len(), 1);
        assert_eq!(camping[0].title, "4 人用テント");

        let drills = repo
            .find_all(ItemListOptions {
                category: None,
                keyword: Some("ドリル".into()),
                limit: 20,
                offset: 0,
            })
            .await
            .unwrap();
        assert_eq!(drills.len(), 1);
        assert_eq!(drills[0].category, ItemCategory::Tool);
    }

    #[sqlx::test]
    async fn update_keeps_unspecified_fields(pool: sqlx::PgPool) {
        let owner_id = register_user(&pool, "山田太郎", "taro@example.com").await;
        let other_id = register_user(&pool, "佐藤花子", "hanako@example.com").await;
        let repo = ItemRepositoryImpl::new(ConnectionPool::new(pool.clone()));

        let item_id = repo
            .create(CreateItem::new(
                "電動ドリル".into(),
                "DIY 用の電動ドリルです。".into(),
                800,
                ItemCategory::Tool,
                None,
                Some("https://example.com/drill.jpg".into()),
                owner_id,
            ))
            .await
            .unwrap();

        // 出品者以外は修正できない
        let res = repo
            .update(UpdateItem::new(
                item_id,
                Some("書き換え".into()),
                None,
                None,
                None,
                None,
                None,
                other_id,
            ))
            .await;
        assert!(matches!(res, Err(AppError::ForbiddenOperation(_))));

        repo.update(UpdateItem::new(
            item_id,
            None,
            None,
            Some(1000),
            None,
            Some("東京都杉並区".into()),
            None,
            owner_id,
        ))
        .await
        .unwrap();

        let item = repo.find_by_id(item_id).await.unwrap().unwrap();
        // 指定した項目だけが変わる
        assert_eq!(item.hourly_price, 1000);
        assert_eq!(item.location.as_deref(), Some("東京都杉並区"));
        assert_eq!(item.title, "電動ドリル");
        assert_eq!(
            item.image_url.as_deref(),
            Some("https://example.com/drill.jpg")
        );
    }

    #[sqlx::test]
    async fn withdrawn_item_disappears_from_listing(pool: sqlx::PgPool) {
        let owner_id = register_user(&pool, "山田太郎", "taro@example.com").await;
        let repo = ItemRepositoryImpl::new(ConnectionPool::new(pool.clone()));

        let item_id = repo
            .create(CreateItem::new(
                "テント".into(),
                "4 人用テント。".into(),
                1200,
                ItemCategory::Camping,
                None,
                None,
                owner_id,
            ))
            .await
            .unwrap();

        repo.withdraw(WithdrawItem::new(item_id, owner_id))
            .await
            .unwrap();

        let item = repo.find_by_id(item_id).await.unwrap().unwrap();
        assert_eq!(item.status, ItemStatus::Withdrawn);

        let listed = repo.find_all(list_all()).await.unwrap();
        assert!(listed.is_empty());
    }

    #[sqlx::test]
    async fn withdraw_is_owner_only(pool: sqlx::PgPool) {
        let owner_id = register_user(&pool, "山田太郎", "taro@example.com").await;
        let other_id = register_user(&pool, "佐藤花子", "hanako@example.com").await;
        let repo = ItemRepositoryImpl::new(ConnectionPool::new(pool.clone()));

        let item_id = repo
            .create(CreateItem::new(
                "プロジェクター".into(),
                "フル HD プロジェクター。".into(),
                1500,
                ItemCategory::Party,
                None,
                None,
                owner_id,
            ))
            .await
            .unwrap();

        let res = repo.withdraw(WithdrawItem::new(item_id, other_id)).await;
        assert!(matches!(res, Err(AppError::ForbiddenOperation(_))));
    }
}
