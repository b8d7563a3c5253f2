use axum::{
    extract::{Path, State},
    Json,
};
use garde::Validate;
use kernel::model::{
    id::RentalId,
    rental::event::{CancelRental, CompleteReturn, StartRental},
};
use registry::AppRegistry;
use shared::error::AppResult;

use crate::{
    extractor::AuthorizedUser,
    model::rental::{
        CreateRentalRequest, CreateRentalRequestWithUser, DecideRentalRequest,
        DecideRentalRequestWithIds, RentalResponse, RentalsResponse,
    },
};

pub async fn register_rental(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateRentalRequest>,
) -> AppResult<Json<RentalResponse>> {
    req.validate(&())?;

    let create_rental = CreateRentalRequestWithUser::new(req, user.id());
    registry
        .rental_repository()
        .create(create_rental.into())
        .await
        .map(RentalResponse::from)
        .map(Json)
}

pub async fn show_my_rentals(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<RentalsResponse>> {
    registry
        .rental_repository()
        .find_by_renter_id(user.id())
        .await
        .map(RentalsResponse::from)
        .map(Json)
}

pub async fn show_received_requests(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<RentalsResponse>> {
    registry
        .rental_repository()
        .find_received_by_owner_id(user.id())
        .await
        .map(RentalsResponse::from)
        .map(Json)
}

pub async fn decide_rental(
    user: AuthorizedUser,
    Path(rental_id): Path<RentalId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<DecideRentalRequest>,
) -> AppResult<Json<RentalResponse>> {
    req.validate(&())?;

    let decide = DecideRentalRequestWithIds::new(rental_id, user.id(), req);
    registry
        .rental_repository()
        .decide(decide.into())
        .await
        .map(RentalResponse::from)
        .map(Json)
}

pub async fn start_rental(
    user: AuthorizedUser,
    Path(rental_id): Path<RentalId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<RentalResponse>> {
    registry
        .rental_repository()
        .start(StartRental::new(rental_id, user.id()))
        .await
        .map(RentalResponse::from)
        .map(Json)
}

pub async fn cancel_rental(
    user: AuthorizedUser,
    Path(rental_id): Path<RentalId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<RentalResponse>> {
    registry
        .rental_repository()
        .cancel(CancelRental::new(rental_id, user.id()))
        .await
        .map(RentalResponse::from)
        .map(Json)
}

pub async fn return_rental(
    user: AuthorizedUser,
    Path(rental_id): Path<RentalId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<RentalResponse>> {
    registry
        .rental_repository()
        .complete_return(CompleteReturn::new(rental_id, user.id()))
        .await
        .map(RentalResponse::from)
        .map(Json)
}
