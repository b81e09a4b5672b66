//! 権限の永続化 Outbound ポート（CLI における「OS の権限設定」）

use common::error::Error;

use crate::domain::{Capability, PermissionStatus};

pub trait PermissionStore: Send + Sync {
    /// 記録済みの状態。未記録なら None
    fn load(&self, capability: Capability) -> Result<Option<PermissionStatus>, Error>;

    fn save(&self, capability: Capability, status: PermissionStatus) -> Result<(), Error>;
}
