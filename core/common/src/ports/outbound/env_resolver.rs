//! 環境変数解決 Outbound ポート
//!
//! usecase / wiring はこの trait 経由でのみ環境変数にアクセスする。

use crate::domain::HomeDir;
use crate::error::Error;
use std::path::PathBuf;

/// 環境変数解決抽象（Outbound ポート）
pub trait EnvResolver: Send + Sync {
    /// ホームディレクトリを解決する
    ///
    /// 優先順位:
    /// 1. SCANSHELL_HOME（設定されていれば）
    /// 2. $XDG_CONFIG_HOME/scanshell
    /// 3. $HOME/.config/scanshell
    fn resolve_home_dir(&self) -> Result<HomeDir, Error>;

    /// ログファイルのパス。SCANSHELL_LOG_FILE があればそれ、なければ <home>/log/scanshell.jsonl
    fn resolve_log_file_path(&self) -> Result<PathBuf, Error> {
        Ok(self.resolve_home_dir()?.default_log_file())
    }
}
