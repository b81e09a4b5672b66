//! エラーハンドリング
//!
//! 全レイヤー共通のエラー型。終了コードは sysexits.h に合わせる。

/// エラー型
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// 引数不正（usage を表示する）
    #[error("{0}")]
    InvalidArgument(String),
    /// ファイル等の I/O 失敗
    #[error("{0}")]
    Io(String),
    /// JSON の読み書き失敗
    #[error("JSON error: {0}")]
    Json(String),
    /// 環境変数・設定の解決失敗
    #[error("{0}")]
    Env(String),
    /// 内部エラー・外部プロセス起動失敗など
    #[error("{0}")]
    System(String),
}

impl Error {
    /// 引数不正エラー
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    /// I/O エラー（メッセージのみ）
    pub fn io_msg(msg: impl Into<String>) -> Self {
        Error::Io(msg.into())
    }

    pub fn json(msg: impl Into<String>) -> Self {
        Error::Json(msg.into())
    }

    pub fn env(msg: impl Into<String>) -> Self {
        Error::Env(msg.into())
    }

    /// システムエラー
    pub fn system(msg: impl Into<String>) -> Self {
        Error::System(msg.into())
    }

    /// プロセス終了コード
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidArgument(_) => 64,
            Error::Json(_) => 65,
            Error::System(_) => 70,
            Error::Io(_) => 74,
            Error::Env(_) => 78,
        }
    }

    /// usage を表示すべきエラーか
    pub fn is_usage(&self) -> bool {
        matches!(self, Error::InvalidArgument(_))
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e.to_string())
    }
}
