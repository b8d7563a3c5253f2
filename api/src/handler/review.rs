use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use garde::Validate;
use kernel::model::{
    id::{ItemId, ReviewId},
    review::event::DeleteReview,
};
use registry::AppRegistry;
use shared::error::AppResult;

use crate::{
    extractor::AuthorizedUser,
    model::review::{
        CreateReviewRequest, CreateReviewRequestWithUser, ReviewResponse, ReviewsResponse,
        UpdateReviewRequest, UpdateReviewRequestWithIds,
    },
};

pub async fn register_review(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateReviewRequest>,
) -> AppResult<Json<ReviewResponse>> {
    req.validate(&())?;

    let create_review = CreateReviewRequestWithUser::new(req, user.id());
    registry
        .review_repository()
        .create(create_review.into())
        .await
        .map(ReviewResponse::from)
        .map(Json)
}

pub async fn show_item_reviews(
    _user: AuthorizedUser,
    Path(item_id): Path<ItemId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ReviewsResponse>> {
    registry
        .review_repository()
        .find_by_item_id(item_id)
        .await
        .map(ReviewsResponse::from)
        .map(Json)
}

pub async fn update_review(
    user: AuthorizedUser,
    Path(review_id): Path<ReviewId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateReviewRequest>,
) -> AppResult<Json<ReviewResponse>> {
    req.validate(&())?;

    let update = UpdateReviewRequestWithIds::new(review_id, user.id(), req);
    registry
        .review_repository()
        .update(update.into())
        .await
        .map(ReviewResponse::from)
        .map(Json)
}

pub async fn delete_review(
    user: AuthorizedUser,
    Path(review_id): Path<ReviewId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    registry
        .review_repository()
        .delete(DeleteReview::new(review_id, user.id()))
        .await
        .map(|_| StatusCode::NO_CONTENT)
}
