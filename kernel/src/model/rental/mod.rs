use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::model::{
    id::{ItemId, RentalId, UserId},
    item::ItemStatus,
    user::RentalUser,
};

pub mod event;

/// レンタル 1 件のライフサイクルステータス。
///
/// Waiting → {Approved | Rejected}
/// Approved → Paid → Renting → Returned
/// {Waiting, Approved, Paid} → Canceled
///
/// Rejected / Returned / Canceled は終端状態であり、以降の遷移はない。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RentalStatus {
    Waiting,
    Approved,
    Paid,
    Renting,
    Returned,
    Canceled,
    Rejected,
}

impl RentalStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RentalStatus::Rejected | RentalStatus::Returned | RentalStatus::Canceled
        )
    }

    /// 借り手による取消が許される状態。引き渡し後（Renting）と終端状態は不可。
    pub fn cancellable(&self) -> bool {
        matches!(
            self,
            RentalStatus::Waiting | RentalStatus::Approved | RentalStatus::Paid
        )
    }

    /// このレンタルが出品物の Committed ロックを保持している状態かどうか。
    /// ロックは承認時に取得され、返却または取消で解放される。
    pub fn holds_item_lock(&self) -> bool {
        matches!(
            self,
            RentalStatus::Approved | RentalStatus::Paid | RentalStatus::Renting
        )
    }
}

#[derive(Debug)]
pub struct Rental {
    pub rental_id: RentalId,
    pub renter: RentalUser,
    pub status: RentalStatus,
    pub total_price: i32,
    pub reject_reason: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub item: RentalItem,
}

#[derive(Debug)]
pub struct RentalItem {
    pub item_id: ItemId,
    pub title: String,
    pub hourly_price: i32,
    pub status: ItemStatus,
    pub owner_id: UserId,
}

/// 課金対象時間。秒単位で切り上げ、最低 1 時間。
pub fn billed_hours(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let seconds = (end - start).num_seconds();
    let hours = (seconds + 3599) / 3600;
    hours.max(1)
}

/// 申込時に一度だけ計算する合計金額。以後再計算しない。
pub fn total_price(hourly_price: i32, start: DateTime<Utc>, end: DateTime<Utc>) -> i32 {
    (billed_hours(start, end) * hourly_price as i64) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn at(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[rstest]
    #[case::half_hour_rounds_up_to_one("2026-08-01T10:00:00Z", "2026-08-01T10:30:00Z", 1)]
    #[case::exactly_one_hour("2026-08-01T10:00:00Z", "2026-08-01T11:00:00Z", 1)]
    #[case::one_second_over("2026-08-01T10:00:00Z", "2026-08-01T11:00:01Z", 2)]
    #[case::two_and_a_half_hours("2026-08-01T10:00:00Z", "2026-08-01T12:30:00Z", 3)]
    #[case::full_day("2026-08-01T10:00:00Z", "2026-08-02T10:00:00Z", 24)]
    fn billed_hours_rounds_up(#[case] start: &str, #[case] end: &str, #[case] expected: i64) {
        assert_eq!(billed_hours(at(start), at(end)), expected);
    }

    #[rstest]
    #[case::hourly_1000_for_2h30m("2026-08-01T10:00:00Z", "2026-08-01T12:30:00Z", 1000, 3000)]
    #[case::minimum_one_hour("2026-08-01T10:00:00Z", "2026-08-01T10:10:00Z", 500, 500)]
    fn total_price_uses_ceiled_hours(
        #[case] start: &str,
        #[case] end: &str,
        #[case] hourly: i32,
        #[case] expected: i32,
    ) {
        assert_eq!(total_price(hourly, at(start), at(end)), expected);
    }

    #[test]
    fn terminal_states_are_exactly_rejected_returned_canceled() {
        assert!(RentalStatus::Rejected.is_terminal());
        assert!(RentalStatus::Returned.is_terminal());
        assert!(RentalStatus::Canceled.is_terminal());
        assert!(!RentalStatus::Waiting.is_terminal());
        assert!(!RentalStatus::Approved.is_terminal());
        assert!(!RentalStatus::Paid.is_terminal());
        assert!(!RentalStatus::Renting.is_terminal());
    }

    #[test]
    fn renting_and_terminal_states_are_not_cancellable() {
        assert!(RentalStatus::Waiting.cancellable());
        assert!(RentalStatus::Approved.cancellable());
        assert!(RentalStatus::Paid.cancellable());
        assert!(!RentalStatus::Renting.cancellable());
        assert!(!RentalStatus::Returned.cancellable());
        assert!(!RentalStatus::Canceled.cancellable());
        assert!(!RentalStatus::Rejected.cancellable());
    }

    #[test]
    fn item_lock_is_held_from_approval_until_return() {
        assert!(!RentalStatus::Waiting.holds_item_lock());
        assert!(RentalStatus::Approved.holds_item_lock());
        assert!(RentalStatus::Paid.holds_item_lock());
        assert!(RentalStatus::Renting.holds_item_lock());
        assert!(!RentalStatus::Returned.holds_item_lock());
        assert!(!RentalStatus::Canceled.holds_item_lock());
    }
}
