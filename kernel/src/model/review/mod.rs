use chrono::{DateTime, Duration, Utc};

use crate::model::{
    id::{ItemId, RentalId, ReviewId},
    user::ReviewAuthor,
};

pub mod event;

/// レンタル終了後にレビューを修正できる期間（日数）。
pub const EDIT_WINDOW_DAYS: i64 = 3;

#[derive(Debug)]
pub struct Review {
    pub review_id: ReviewId,
    pub rental_id: RentalId,
    pub item_id: ItemId,
    pub author: ReviewAuthor,
    pub rating: i32,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// レビュー修正の締切。レンタル終了日時 + 3 日。
pub fn edit_deadline(rental_end: DateTime<Utc>) -> DateTime<Utc> {
    rental_end + Duration::days(EDIT_WINDOW_DAYS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn deadline_is_three_days_after_rental_end() {
        let end = at("2026-08-01T18:00:00Z");
        assert_eq!(edit_deadline(end), at("2026-08-04T18:00:00Z"));
    }

    #[test]
    fn four_days_later_is_past_the_deadline() {
        let end = at("2026-08-01T18:00:00Z");
        let four_days_later = at("2026-08-05T18:00:00Z");
        assert!(four_days_later > edit_deadline(end));
    }
}
