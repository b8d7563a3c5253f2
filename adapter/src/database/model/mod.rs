use std::str::FromStr;

use shared::error::{AppError, AppResult};

pub mod item;
pub mod payment;
pub mod rental;
pub mod review;
pub mod user;

// DB に文字列で保持しているステータス列を列挙型へ戻す。
// 列には CHECK 制約があるため失敗は通常起こらない。
pub(crate) fn parse_enum<T: FromStr>(raw: &str, column: &str) -> AppResult<T> {
    T::from_str(raw)
        .map_err(|_| AppError::ConversionEntityError(format!("{} の値が不正です: {}", column, raw)))
}
