//! Capture Launcher
//!
//! 権限確認済みのときだけキャプチャエンジンを起動し、返信を 1 回だけ受け取る。

use std::sync::Arc;

use common::error::Error;

use crate::domain::{CaptureReply, MissingCallbackData, PermissionState, ScanOutcome, SessionTicket};
use crate::ports::outbound::{CaptureEngine, SessionEventSink};

pub struct CaptureLauncher {
    engine: Arc<dyn CaptureEngine>,
    outstanding: Option<SessionTicket>,
}

impl CaptureLauncher {
    pub fn new(engine: Arc<dyn CaptureEngine>) -> Self {
        Self {
            engine,
            outstanding: None,
        }
    }

    /// 返信待ちのキャプチャがあるか
    pub fn is_outstanding(&self) -> bool {
        self.outstanding.is_some()
    }

    /// エンジンを起動する。起動しなかった場合は Ok(false)。
    ///
    /// 権限が Granted でない起動はプログラミングエラー（debug ビルドでは panic）。
    pub fn launch(
        &mut self,
        permission: PermissionState,
        ticket: SessionTicket,
        sink: &Arc<dyn SessionEventSink>,
    ) -> Result<bool, Error> {
        if permission != PermissionState::Granted {
            debug_assert!(false, "capture launched without camera permission");
            return Ok(false);
        }
        if self.outstanding.is_some() {
            return Ok(false);
        }
        self.engine.start(ticket, Arc::clone(sink))?;
        self.outstanding = Some(ticket);
        Ok(true)
    }

    /// 返信を受け取る。待っている ticket でなければ None（重複・古い返信）。
    pub fn complete(
        &mut self,
        ticket: SessionTicket,
        reply: &CaptureReply,
    ) -> Option<Result<ScanOutcome, MissingCallbackData>> {
        if self.outstanding != Some(ticket) {
            return None;
        }
        self.outstanding = None;
        Some(ScanOutcome::from_reply(reply))
    }

    /// 実行中のキャプチャを中断する（返信は後から届く）
    pub fn abort(&self) -> bool {
        if self.outstanding.is_none() {
            return false;
        }
        self.engine.abort();
        true
    }
}
