use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use kernel::gateway::payment::{PaymentGateway, ProviderConfirmOrder};
use shared::{
    config::PaymentConfig,
    error::{AppError, AppResult},
};

/// 外部決済プロバイダーの承認 API クライアント。
pub struct PaymentProviderClient {
    client: reqwest::Client,
    base_url: String,
    authorization: String,
}

impl PaymentProviderClient {
    pub fn new(config: &PaymentConfig) -> anyhow::Result<Self> {
        // プロバイダー呼び出しは処理全体で唯一の低速ステップ。
        // クライアントレベルで上限時間を設け、タイムアウト時は
        // レンタルを Approved のままにして再試行可能にする。
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        // シークレットキーをユーザー名、パスワード空とする Basic 認証
        let encoded = general_purpose::STANDARD.encode(format!("{}:", config.secret_key));

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            authorization: format!("Basic {}", encoded),
        })
    }
}

#[async_trait]
impl PaymentGateway for PaymentProviderClient {
    async fn confirm(&self, order: ProviderConfirmOrder) -> AppResult<()> {
        let url = format!("{}/v1/payments/confirm", self.base_url);
        let body = serde_json::json!({
            "paymentKey": order.payment_key,
            "orderId": order.order_id,
            "amount": order.amount,
        });

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, self.authorization.as_str())
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::PaymentProviderError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response.text().await.unwrap_or_default();
            return Err(AppError::PaymentProviderError(format!(
                "status={} body={}",
                status, message
            )));
        }

        Ok(())
    }
}
