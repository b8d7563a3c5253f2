use derive_new::new;

use crate::model::id::{RentalId, ReviewId, UserId};

#[derive(Debug, new)]
pub struct CreateReview {
    pub rental_id: RentalId,
    pub reviewer_id: UserId,
    pub rating: i32,
    pub content: String,
}

#[derive(Debug, new)]
pub struct UpdateReview {
    pub review_id: ReviewId,
    pub requested_user: UserId,
    pub rating: i32,
    pub content: String,
}

#[derive(Debug, new)]
pub struct DeleteReview {
    pub review_id: ReviewId,
    pub requested_user: UserId,
}
