use kernel::model::{id::UserId, user::User};

#[derive(sqlx::FromRow)]
pub struct UserRow {
    pub user_id: UserId,
    pub user_name: String,
    pub email: String,
}

impl From<UserRow> for User {
    fn from(value: UserRow) -> Self {
        let UserRow {
            user_id,
            user_name,
            email,
        } = value;
        User {
            user_id,
            user_name,
            email,
        }
    }
}

// ログイン検証用。パスワードハッシュはこの型の外に出さない。
#[derive(sqlx::FromRow)]
pub struct CredentialRow {
    pub user_id: UserId,
    pub password_hash: String,
}
