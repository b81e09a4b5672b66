//! ユーザー向けの短い通知 Outbound ポート
//!
//! 「スキャンは開始されなかった」等の状態表示。構造化ログとは別チャネル。

pub trait Console: Send + Sync {
    fn notice(&self, message: &str);
}
