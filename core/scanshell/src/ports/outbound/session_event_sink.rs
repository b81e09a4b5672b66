//! 非同期コールバックの配送先 Outbound ポート
//!
//! 権限要求・キャプチャの結果はこの sink 経由でイベントループへ戻る。

use crate::domain::SessionEvent;

/// 非同期に完了した処理の結果をイベントループへ届ける
pub trait SessionEventSink: Send + Sync {
    /// イベントを 1 件届ける。受け手が既にいない場合は捨てる。
    fn deliver(&self, event: SessionEvent);
}
