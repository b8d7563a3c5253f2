use anyhow::{Context, Result};

pub struct AppConfig {
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub auth: AuthConfig,
    pub payment: PaymentConfig,
}

impl AppConfig {
    pub fn new() -> Result<Self> {
        let database = DatabaseConfig {
            host: std::env::var("DATABASE_HOST").context("DATABASE_HOST is not set")?,
            port: std::env::var("DATABASE_PORT")
                .context("DATABASE_PORT is not set")?
                .parse()
                .context("DATABASE_PORT must be a port number")?,
            username: std::env::var("DATABASE_USERNAME").context("DATABASE_USERNAME is not set")?,
            password: std::env::var("DATABASE_PASSWORD").context("DATABASE_PASSWORD is not set")?,
            database: std::env::var("DATABASE_NAME").context("DATABASE_NAME is not set")?,
        };
        let redis = RedisConfig {
            host: std::env::var("REDIS_HOST").context("REDIS_HOST is not set")?,
            port: std::env::var("REDIS_PORT")
                .context("REDIS_PORT is not set")?
                .parse()
                .context("REDIS_PORT must be a port number")?,
        };
        let auth = AuthConfig {
            ttl: std::env::var("AUTH_TOKEN_TTL")
                .unwrap_or_else(|_| "86400".into())
                .parse()
                .context("AUTH_TOKEN_TTL must be seconds")?,
        };
        let payment = PaymentConfig {
            base_url: std::env::var("PAYMENT_BASE_URL").context("PAYMENT_BASE_URL is not set")?,
            secret_key: std::env::var("PAYMENT_SECRET_KEY")
                .context("PAYMENT_SECRET_KEY is not set")?,
            timeout_seconds: std::env::var("PAYMENT_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| "10".into())
                .parse()
                .context("PAYMENT_TIMEOUT_SECONDS must be seconds")?,
        };
        Ok(Self {
            database,
            redis,
            auth,
            payment,
        })
    }
}

pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
}

pub struct RedisConfig {
    pub host: String,
    pub port: u16,
}

pub struct AuthConfig {
    // アクセストークンの有効期限（秒）
    pub ttl: u64,
}

pub struct PaymentConfig {
    pub base_url: String,
    pub secret_key: String,
    // 決済プロバイダー呼び出しのタイムアウト（秒）
    pub timeout_seconds: u64,
}
