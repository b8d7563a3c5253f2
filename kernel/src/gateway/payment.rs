use async_trait::async_trait;
use derive_new::new;
use shared::error::AppResult;

/// 外部決済プロバイダーへの承認リクエスト。
#[derive(Debug, Clone, new)]
pub struct ProviderConfirmOrder {
    pub payment_key: String,
    pub order_id: String,
    pub amount: i64,
}

/// 外部決済プロバイダーの承認エンドポイント。
/// 失敗・タイムアウトは AppError::PaymentProviderError として返し、
/// 呼び出し側のレンタル状態は変更しない（再試行可能）。
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn confirm(&self, order: ProviderConfirmOrder) -> AppResult<()>;
}
