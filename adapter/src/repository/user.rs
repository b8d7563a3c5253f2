use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    id::UserId,
    user::{
        event::{CreateUser, UpdatePassword},
        User,
    },
};
use kernel::repository::user::UserRepository;
use shared::error::{AppError, AppResult};

use crate::database::{
    model::user::{CredentialRow, UserRow},
    ConnectionPool,
};

#[derive(new)]
pub struct UserRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn create(&self, event: CreateUser) -> AppResult<User> {
        // メールアドレスの重複は UNIQUE 制約でも防がれるが、
        // 利用者向けのエラーにするため先に調べる
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)")
                .bind(&event.email)
                .fetch_one(self.db.inner_ref())
                .await
                .map_err(AppError::SpecificOperationError)?;
        if exists {
            return Err(AppError::UnprocessableEntity(
                "このメールアドレスはすでに登録されています。".into(),
            ));
        }

        let user_id = UserId::new();
        let hashed_password = bcrypt::hash(&event.password, bcrypt::DEFAULT_COST)?;

        let res = sqlx::query(
            r#"
                INSERT INTO users (user_id, user_name, email, password_hash)
                VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(user_id)
        .bind(&event.user_name)
        .bind(&event.email)
        .bind(&hashed_password)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No user record has been created".into(),
            ));
        }

        Ok(User {
            user_id,
            user_name: event.user_name,
            email: event.email,
        })
    }

    async fn find_current_user(&self, current_user_id: UserId) -> AppResult<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
                SELECT user_id, user_name, email
                FROM users
                WHERE user_id = $1
            "#,
        )
        .bind(current_user_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(row.map(User::from))
    }

    async fn update_password(&self, event: UpdatePassword) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let row: Option<CredentialRow> = sqlx::query_as(
            r#"
                SELECT user_id, password_hash
                FROM users
                WHERE user_id = $1
                FOR UPDATE
            "#,
        )
        .bind(event.user_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let Some(row) = row else {
            return Err(AppError::EntityNotFound(format!(
                "会員（{}）が見つかりませんでした。",
                event.user_id
            )));
        };

        // 現在のパスワードの検証に通らない限り変更しない
        let valid = bcrypt::verify(&event.current_password, &row.password_hash)?;
        if !valid {
            return Err(AppError::UnauthenticatedError);
        }

        let new_hash = bcrypt::hash(&event.new_password, bcrypt::DEFAULT_COST)?;
        let res = sqlx::query(
            r#"
                UPDATE users
                SET password_hash = $1
                WHERE user_id = $2
            "#,
        )
        .bind(&new_hash)
        .bind(event.user_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No user password has been updated".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[sqlx::test]
    async fn duplicate_email_is_rejected(pool: sqlx::PgPool) {
        let repo = UserRepositoryImpl::new(ConnectionPool::new(pool.clone()));

        repo.create(CreateUser::new(
            "山田太郎".into(),
            "taro@example.com".into(),
            "passw0rd".into(),
        ))
        .await
        .unwrap();

        let res = repo
            .create(CreateUser::new(
                "別の太郎".into(),
                "taro@example.com".into(),
                "passw0rd".into(),
            ))
            .await;
        assert!(matches!(res, Err(AppError::UnprocessableEntity(_))));
    }

    #[sqlx::test]
    async fn password_change_requires_current_password(pool: sqlx::PgPool) {
        let repo = UserRepositoryImpl::new(ConnectionPool::new(pool.clone()));

        let user = repo
            .create(CreateUser::new(
                "山田太郎".into(),
                "taro@example.com".into(),
                "passw0rd".into(),
            ))
            .await
            .unwrap();

        let res = repo
            .update_password(UpdatePassword::new(
                user.user_id,
                "wrong-password".into(),
                "new-passw0rd".into(),
            ))
            .await;
        assert!(matches!(res, Err(AppError::UnauthenticatedError)));

        repo.update_password(UpdatePassword::new(
            user.user_id,
            "passw0rd".into(),
            "new-passw0rd".into(),
        ))
        .await
        .unwrap();

        // 新しいパスワードのハッシュに置き換わっている
        let row: CredentialRow =
            sqlx::query_as("SELECT user_id, password_hash FROM users WHERE user_id = $1")
                .bind(user.user_id)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert!(bcrypt::verify("new-passw0rd", &row.password_hash).unwrap());
    }
}
