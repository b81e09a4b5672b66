//! 設定画面 Outbound ポート（メニューの OpenSettings）

use common::error::Error;

pub trait SettingsScreen: Send + Sync {
    fn open(&self) -> Result<(), Error>;
}
