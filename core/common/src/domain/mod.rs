//! ドメイン型（Newtype）
//!
//! String / PathBuf を直接運ばず、意味のある型に包んで境界を明確にする。

use std::path::{Path, PathBuf};

/// ホームディレクトリ（設定・状態・ログの置き場）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeDir(PathBuf);

impl HomeDir {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    /// 設定ファイルのパス（<home>/config/scanshell.json）
    pub fn config_file(&self) -> PathBuf {
        self.0.join("config").join("scanshell.json")
    }

    /// 権限ストアのパス（<home>/state/permissions.json）
    pub fn permission_file(&self) -> PathBuf {
        self.0.join("state").join("permissions.json")
    }

    /// 既定のログファイルパス（<home>/log/scanshell.jsonl）
    pub fn default_log_file(&self) -> PathBuf {
        self.0.join("log").join("scanshell.jsonl")
    }
}

impl std::ops::Deref for HomeDir {
    type Target = PathBuf;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for HomeDir {
    fn as_ref(&self) -> &Path {
        self.0.as_ref()
    }
}

impl From<PathBuf> for HomeDir {
    fn from(p: PathBuf) -> Self {
        Self(p)
    }
}
