//! OS 権限サービス Outbound ポート

use std::sync::Arc;

use common::error::Error;

use super::SessionEventSink;
use crate::domain::Capability;

/// OS の権限状態の問い合わせと権限要求
pub trait PermissionService: Send + Sync {
    /// 現在許可されているか（呼ぶたびに OS へ問い合わせる）
    fn is_granted(&self, capability: Capability) -> Result<bool, Error>;

    /// 権限要求を出してすぐ戻る。
    /// 結果は `SessionEvent::PermissionResolved` として sink へ 1 回だけ届く。
    fn request(&self, capability: Capability, sink: Arc<dyn SessionEventSink>) -> Result<(), Error>;
}
