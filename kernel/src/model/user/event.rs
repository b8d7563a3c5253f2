use derive_new::new;

use crate::model::id::UserId;

#[derive(new)]
pub struct CreateUser {
    pub user_name: String,
    pub email: String,
    pub password: String,
}

#[derive(new)]
pub struct UpdatePassword {
    pub user_id: UserId,
    pub current_password: String,
    pub new_password: String,
}
