use axum::{extract::State, http::StatusCode, Json};
use garde::Validate;
use registry::AppRegistry;
use shared::error::AppResult;

use crate::{
    extractor::AuthorizedUser,
    model::user::{
        CreateUserRequest, UpdatePasswordRequest, UpdatePasswordRequestWithUser, UserResponse,
    },
};

pub async fn register_user(
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    req.validate(&())?;

    registry
        .user_repository()
        .create(req.into())
        .await
        .map(UserResponse::from)
        .map(Json)
}

pub async fn get_current_user(user: AuthorizedUser) -> Json<UserResponse> {
    Json(UserResponse::from(user.user))
}

pub async fn change_password(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdatePasswordRequest>,
) -> AppResult<StatusCode> {
    req.validate(&())?;

    let update = UpdatePasswordRequestWithUser::new(req, user.id());
    registry
        .user_repository()
        .update_password(update.into())
        .await
        .map(|_| StatusCode::NO_CONTENT)
}
