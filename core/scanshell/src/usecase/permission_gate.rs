//! Permission Gate
//!
//! OS の権限状態を確認し、未許可なら要求を 1 回だけ出して結果を待つ。
//! 要求中フラグが立っている間は OS への要求を重ねて出さない。

use std::sync::Arc;

use common::error::Error;

use crate::domain::{Capability, GateCheck, PermissionReply, PermissionState, PermissionStatus};
use crate::ports::outbound::{PermissionService, SessionEventSink};

pub struct PermissionGate {
    service: Arc<dyn PermissionService>,
    capability: Capability,
    state: PermissionState,
    pending: bool,
}

impl PermissionGate {
    pub fn new(service: Arc<dyn PermissionService>, capability: Capability) -> Self {
        Self {
            service,
            capability,
            state: PermissionState::Unknown,
            pending: false,
        }
    }

    pub fn state(&self) -> PermissionState {
        self.state
    }

    /// OS への要求を出して結果待ちか
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// 許可済みなら Granted。未許可なら要求を出して PendingRequest。
    pub fn check_or_request(&mut self, sink: &Arc<dyn SessionEventSink>) -> Result<GateCheck, Error> {
        if self.pending {
            return Ok(GateCheck::PendingRequest);
        }
        if self.service.is_granted(self.capability)? {
            self.state = PermissionState::Granted;
            return Ok(GateCheck::Granted);
        }
        // OS 側で取り消された
        if self.state == PermissionState::Granted {
            self.state = PermissionState::Unknown;
        }
        self.service.request(self.capability, Arc::clone(sink))?;
        self.pending = true;
        Ok(GateCheck::PendingRequest)
    }

    /// 権限要求のコールバックを反映する。要求中でなければ None（古い・重複したコールバック）。
    pub fn resolve(&mut self, reply: &PermissionReply) -> Option<PermissionStatus> {
        if !self.pending {
            return None;
        }
        self.pending = false;
        let status = reply.status();
        self.state = status.into();
        Some(status)
    }
}
