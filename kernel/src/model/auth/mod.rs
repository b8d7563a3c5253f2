pub mod event;

/// Redis に保持する不透明なアクセストークン。
pub struct AccessToken(pub String);
