//! 外部キャプチャエンジン Outbound ポート
//!
//! カメラ操作・デコードはすべてエンジン側の責務。アプリは起動と結果の受け取りだけ行う。

use std::sync::Arc;

use common::error::Error;

use super::SessionEventSink;
use crate::domain::SessionTicket;

pub trait CaptureEngine: Send + Sync {
    /// キャプチャを開始してすぐ戻る。
    /// 返信は `SessionEvent::CaptureCompleted { ticket, .. }` として sink へ 1 回だけ届く。
    fn start(&self, ticket: SessionTicket, sink: Arc<dyn SessionEventSink>) -> Result<(), Error>;

    /// 実行中のキャプチャを中断する。中断した場合も Cancelled の返信は届く。
    fn abort(&self);
}
