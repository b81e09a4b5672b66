//! permission status / grant / revoke のユースケース
//!
//! 権限ストア（CLI における OS の権限設定）を直接参照・更新する。

use std::sync::Arc;

use common::error::Error;

use crate::domain::{Capability, PermissionStatus};
use crate::ports::outbound::PermissionStore;

pub struct PermissionUseCase {
    store: Arc<dyn PermissionStore>,
}

impl PermissionUseCase {
    pub fn new(store: Arc<dyn PermissionStore>) -> Self {
        Self { store }
    }

    pub fn status(&self) -> Result<Option<PermissionStatus>, Error> {
        self.store.load(Capability::Camera)
    }

    pub fn set(&self, status: PermissionStatus) -> Result<(), Error> {
        self.store.save(Capability::Camera, status)
    }
}
