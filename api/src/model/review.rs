use chrono::{DateTime, Utc};
use derive_new::new;
use garde::Validate;
use kernel::model::{
    id::{ItemId, RentalId, ReviewId, UserId},
    review::{
        event::{CreateReview, UpdateReview},
        Review,
    },
    user::ReviewAuthor,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    #[garde(skip)]
    pub rental_id: RentalId,
    // 星 1 〜 5
    #[garde(range(min = 1, max = 5))]
    pub rating: i32,
    #[garde(length(min = 1))]
    pub content: String,
}

#[derive(new)]
pub struct CreateReviewRequestWithUser(CreateReviewRequest, UserId);

impl From<CreateReviewRequestWithUser> for CreateReview {
    fn from(value: CreateReviewRequestWithUser) -> Self {
        let CreateReviewRequestWithUser(
            CreateReviewRequest {
                rental_id,
                rating,
                content,
            },
            reviewer_id,
        ) = value;
        CreateReview {
            rental_id,
            reviewer_id,
            rating,
            content,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReviewRequest {
    #[garde(range(min = 1, max = 5))]
    pub rating: i32,
    #[garde(length(min = 1))]
    pub content: String,
}

#[derive(new)]
pub struct UpdateReviewRequestWithIds(ReviewId, UserId, UpdateReviewRequest);

impl From<UpdateReviewRequestWithIds> for UpdateReview {
    fn from(value: UpdateReviewRequestWithIds) -> Self {
        let UpdateReviewRequestWithIds(
            review_id,
            requested_user,
            UpdateReviewRequest { rating, content },
        ) = value;
        UpdateReview {
            review_id,
            requested_user,
            rating,
            content,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewsResponse {
    pub items: Vec<ReviewResponse>,
}

impl From<Vec<Review>> for ReviewsResponse {
    fn from(value: Vec<Review>) -> Self {
        Self {
            items: value.into_iter().map(ReviewResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub review_id: ReviewId,
    pub rental_id: RentalId,
    pub item_id: ItemId,
    pub author: ReviewAuthorResponse,
    pub rating: i32,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<Review> for ReviewResponse {
    fn from(value: Review) -> Self {
        let Review {
            review_id,
            rental_id,
            item_id,
            author,
            rating,
            content,
            created_at,
        } = value;
        Self {
            review_id,
            rental_id,
            item_id,
            author: author.into(),
            rating,
            content,
            created_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewAuthorResponse {
    pub user_id: UserId,
    pub user_name: String,
}

impl From<ReviewAuthor> for ReviewAuthorResponse {
    fn from(value: ReviewAuthor) -> Self {
        let ReviewAuthor { user_id, user_name } = value;
        Self { user_id, user_name }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_with_rating(rating: i32) -> CreateReviewRequest {
        CreateReviewRequest {
            rental_id: RentalId::new(),
            rating,
            content: "とても良い品でした。".into(),
        }
    }

    #[test]
    fn rating_must_be_between_one_and_five() {
        assert!(request_with_rating(0).validate(&()).is_err());
        assert!(request_with_rating(6).validate(&()).is_err());
        assert!(request_with_rating(1).validate(&()).is_ok());
        assert!(request_with_rating(5).validate(&()).is_ok());
    }

    #[test]
    fn content_must_not_be_empty() {
        let req = CreateReviewRequest {
            rental_id: RentalId::new(),
            rating: 3,
            content: "".into(),
        };
        assert!(req.validate(&()).is_err());
    }
}
