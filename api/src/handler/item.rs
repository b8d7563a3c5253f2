use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use garde::Validate;
use kernel::model::{id::ItemId, item::event::WithdrawItem};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::{
    extractor::AuthorizedUser,
    model::item::{
        CreateItemRequest, CreateItemRequestWithUser, ItemListQuery, ItemResponse, ItemsResponse,
        UpdateItemRequest, UpdateItemRequestWithIds,
    },
};

pub async fn register_item(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateItemRequest>,
) -> AppResult<StatusCode> {
    req.validate(&())?;

    let create_item = CreateItemRequestWithUser::new(req, user.id());
    registry
        .item_repository()
        .create(create_item.into())
        .await
        .map(|_| StatusCode::CREATED)
}

pub async fn show_item_list(
    _user: AuthorizedUser,
    Query(query): Query<ItemListQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ItemsResponse>> {
    query.validate(&())?;

    registry
        .item_repository()
        .find_all(query.into())
        .await
        .map(ItemsResponse::from)
        .map(Json)
}

pub async fn show_item(
    _user: AuthorizedUser,
    Path(item_id): Path<ItemId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ItemResponse>> {
    registry
        .item_repository()
        .find_by_id(item_id)
        .await
        .and_then(|item| match item {
            Some(item) => Ok(Json(item.into())),
            None => Err(AppError::EntityNotFound(format!(
                "出品物（{}）が見つかりませんでした。",
                item_id
            ))),
        })
}

pub async fn update_item(
    user: AuthorizedUser,
    Path(item_id): Path<ItemId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateItemRequest>,
) -> AppResult<StatusCode> {
    req.validate(&())?;

    let update = UpdateItemRequestWithIds::new(item_id, user.id(), req);
    registry
        .item_repository()
        .update(update.into())
        .await
        .map(|_| StatusCode::NO_CONTENT)
}

pub async fn withdraw_item(
    user: AuthorizedUser,
    Path(item_id): Path<ItemId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    let withdraw = WithdrawItem {
        item_id,
        requested_user: user.id(),
    };
    registry
        .item_repository()
        .withdraw(withdraw)
        .await
        .map(|_| StatusCode::NO_CONTENT)
}
