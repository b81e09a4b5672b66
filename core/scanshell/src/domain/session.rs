//! スキャンセッションの状態・イベント
//!
//! 遷移表（これ以外の辺は無い）:
//! - Idle --ScanRequested--> AwaitingPermission
//! - AwaitingPermission --Granted--> Capturing / --Denied--> Idle
//! - Capturing --Success--> Presenting / --Cancelled--> Idle
//! - Presenting --Back--> Idle

use super::outcome::{CaptureReply, ScanResultView};
use super::permission::PermissionReply;

/// キャプチャ起動ごとに振る番号。古いコールバックを見分けるのに使う。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionTicket(pub u64);

impl std::fmt::Display for SessionTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// セッションコントローラの状態
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    AwaitingPermission,
    Capturing,
    Presenting(ScanResultView),
}

impl SessionState {
    /// ログ用の状態名
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::AwaitingPermission => "awaiting_permission",
            SessionState::Capturing => "capturing",
            SessionState::Presenting(_) => "presenting",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, SessionState::Idle)
    }

    /// 非同期コールバック待ちの状態か
    pub fn is_waiting(&self) -> bool {
        matches!(
            self,
            SessionState::AwaitingPermission | SessionState::Capturing
        )
    }
}

/// コントローラに届くイベント（ユーザー操作と非同期コールバック）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// スキャン開始の要求（ScanRequest）
    ScanRequested,
    /// OS からの権限要求の結果
    PermissionResolved(PermissionReply),
    /// キャプチャエンジンからの返信
    CaptureCompleted {
        ticket: SessionTicket,
        reply: CaptureReply,
    },
    /// 結果画面から戻る
    Back,
    /// キャプチャの中断を依頼する（結果は Cancelled として届く）
    Cancel,
}

/// セッションの終わり方
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// 結果画面へ引き渡した
    Presented,
    CaptureCancelled,
    PermissionDenied,
}

/// 1 イベント処理の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// 現在の状態では無効なイベント（何もしない）
    Ignored,
    /// 状態が進んだ（セッション継続中、または Presenting → Idle）
    Transitioned,
    /// キャプチャの中断を依頼した。状態は結果が届くまで Capturing のまま
    AbortRequested,
    Ended(SessionEnd),
}
