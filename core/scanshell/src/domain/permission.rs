//! カメラ権限のドメイン型
//!
//! OS の権限状態はプロセス内にキャッシュせず、チェックのたびに問い合わせる。

use serde::{Deserialize, Serialize};

/// 権限を要求する対象
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    Camera,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Camera => "camera",
        }
    }
}

/// ゲートが保持する権限状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PermissionState {
    #[default]
    Unknown,
    Granted,
    Denied,
}

/// OS が返す許可・拒否
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionStatus {
    Granted,
    Denied,
}

impl PermissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionStatus::Granted => "granted",
            PermissionStatus::Denied => "denied",
        }
    }
}

impl From<PermissionStatus> for PermissionState {
    fn from(s: PermissionStatus) -> Self {
        match s {
            PermissionStatus::Granted => PermissionState::Granted,
            PermissionStatus::Denied => PermissionState::Denied,
        }
    }
}

/// checkOrRequest の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateCheck {
    /// 既に許可済み（同期的に確定）
    Granted,
    /// 要求中。PermissionResolved が届くまで先へ進まない
    PendingRequest,
}

/// 権限要求のコールバック内容（要求した権限ごとの結果）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionReply {
    pub grant_results: Vec<PermissionStatus>,
}

impl PermissionReply {
    pub fn granted() -> Self {
        Self { grant_results: vec![PermissionStatus::Granted] }
    }

    pub fn denied() -> Self {
        Self { grant_results: vec![PermissionStatus::Denied] }
    }

    /// 結果が空のコールバック（要求が中断された場合など）
    pub fn empty() -> Self {
        Self { grant_results: Vec::new() }
    }

    /// 先頭の結果。空なら Denied とみなす。
    pub fn status(&self) -> PermissionStatus {
        self.grant_results
            .first()
            .copied()
            .unwrap_or(PermissionStatus::Denied)
    }
}
