//! Session Controller
//!
//! Gate → Launcher → Router → Presenter を順に呼び、状態遷移を 1 か所に集める。
//! 非同期の結果はすべて `handle` にイベントとして届き、現在の状態と合わない
//! コールバックは捨てる。待機中にポーリングはしない。

use std::sync::Arc;

use common::error::Error;
use common::ports::outbound::{Log, LogLevel, LogRecord};

use super::capture_launcher::CaptureLauncher;
use super::permission_gate::PermissionGate;
use super::result_router::{route, Route};
use crate::domain::{
    CaptureReply, Capability, GateCheck, PermissionReply, PermissionState, PermissionStatus,
    ScanOutcome, SessionEnd, SessionEvent, SessionState, SessionTicket, Step,
};
use crate::ports::outbound::{CaptureEngine, PermissionService, ResultPresenter, SessionEventSink};

pub struct SessionController {
    state: SessionState,
    gate: PermissionGate,
    launcher: CaptureLauncher,
    presenter: Arc<dyn ResultPresenter>,
    sink: Arc<dyn SessionEventSink>,
    logger: Arc<dyn Log>,
    last_ticket: u64,
}

impl SessionController {
    pub fn new(
        permission_service: Arc<dyn PermissionService>,
        engine: Arc<dyn CaptureEngine>,
        presenter: Arc<dyn ResultPresenter>,
        sink: Arc<dyn SessionEventSink>,
        logger: Arc<dyn Log>,
    ) -> Self {
        Self {
            state: SessionState::Idle,
            gate: PermissionGate::new(permission_service, Capability::Camera),
            launcher: CaptureLauncher::new(engine),
            presenter,
            sink,
            logger,
            last_ticket: 0,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn permission_state(&self) -> PermissionState {
        self.gate.state()
    }

    /// 権限要求・キャプチャのどちらかが結果待ちか
    pub fn has_pending(&self) -> bool {
        self.gate.is_pending() || self.launcher.is_outstanding()
    }

    /// イベントを 1 件処理する。
    ///
    /// ポートのエラーは状態を Idle に戻してから返す。
    pub fn handle(&mut self, event: SessionEvent) -> Result<Step, Error> {
        match event {
            SessionEvent::ScanRequested => self.on_scan_requested(),
            SessionEvent::PermissionResolved(reply) => self.on_permission_resolved(&reply),
            SessionEvent::CaptureCompleted { ticket, reply } => self.on_capture_completed(ticket, &reply),
            SessionEvent::Back => Ok(self.on_back()),
            SessionEvent::Cancel => Ok(self.on_cancel()),
        }
    }

    /// プロセス終了前に実行中のキャプチャを止める
    pub fn shutdown(&mut self) {
        if self.launcher.abort() {
            self.log(LogLevel::Info, "capture aborted on shutdown", "capture", None);
        }
    }

    fn on_scan_requested(&mut self) -> Result<Step, Error> {
        if !self.state.is_idle() {
            return Ok(self.ignore("scan_requested"));
        }
        self.transition(SessionState::AwaitingPermission);
        match self.gate.check_or_request(&self.sink) {
            Ok(GateCheck::Granted) => self.start_capture(),
            Ok(GateCheck::PendingRequest) => {
                self.log(LogLevel::Info, "camera permission requested", "permission", None);
                Ok(Step::Transitioned)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    fn on_permission_resolved(&mut self, reply: &PermissionReply) -> Result<Step, Error> {
        let status = match self.gate.resolve(reply) {
            Some(status) => status,
            None => return Ok(self.ignore("permission_resolved")),
        };
        self.log(
            LogLevel::Info,
            "camera permission resolved",
            "permission",
            Some(("status", status.as_str().into())),
        );
        if self.state != SessionState::AwaitingPermission {
            return Ok(self.ignore("permission_resolved"));
        }
        match status {
            PermissionStatus::Granted => self.start_capture(),
            PermissionStatus::Denied => {
                self.transition(SessionState::Idle);
                Ok(Step::Ended(SessionEnd::PermissionDenied))
            }
        }
    }

    fn start_capture(&mut self) -> Result<Step, Error> {
        self.last_ticket += 1;
        let ticket = SessionTicket(self.last_ticket);
        match self.launcher.launch(self.gate.state(), ticket, &self.sink) {
            Ok(true) => {
                self.transition(SessionState::Capturing);
                self.log(
                    LogLevel::Info,
                    "capture started",
                    "capture",
                    Some(("ticket", ticket.0.into())),
                );
                Ok(Step::Transitioned)
            }
            Ok(false) => {
                self.transition(SessionState::Idle);
                Ok(Step::Ignored)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    fn on_capture_completed(&mut self, ticket: SessionTicket, reply: &CaptureReply) -> Result<Step, Error> {
        if self.state != SessionState::Capturing {
            return Ok(self.ignore("capture_completed"));
        }
        let outcome = match self.launcher.complete(ticket, reply) {
            Some(Ok(outcome)) => outcome,
            Some(Err(missing)) => {
                self.log(
                    LogLevel::Warn,
                    "malformed capture reply treated as cancelled",
                    "capture",
                    Some(("reason", missing.to_string().into())),
                );
                ScanOutcome::Cancelled
            }
            None => return Ok(self.ignore("capture_completed")),
        };
        match route(outcome) {
            Route::Present(view) => {
                if let Err(e) = self.presenter.render(&view) {
                    return Err(self.fail(e));
                }
                self.transition(SessionState::Presenting(view));
                Ok(Step::Ended(SessionEnd::Presented))
            }
            Route::Dismiss => {
                self.transition(SessionState::Idle);
                Ok(Step::Ended(SessionEnd::CaptureCancelled))
            }
        }
    }

    fn on_back(&mut self) -> Step {
        if !matches!(self.state, SessionState::Presenting(_)) {
            return self.ignore("back");
        }
        self.transition(SessionState::Idle);
        Step::Transitioned
    }

    fn on_cancel(&mut self) -> Step {
        if self.state != SessionState::Capturing {
            return self.ignore("cancel");
        }
        self.launcher.abort();
        self.log(LogLevel::Info, "capture abort requested", "capture", None);
        Step::AbortRequested
    }

    fn transition(&mut self, next: SessionState) {
        let from = self.state.name();
        self.state = next;
        let _ = self.logger.log(
            &LogRecord::new(LogLevel::Info, "session transition")
                .layer("usecase")
                .kind("session")
                .field("from", from)
                .field("to", self.state.name()),
        );
    }

    fn ignore(&self, event: &str) -> Step {
        let _ = self.logger.log(
            &LogRecord::new(LogLevel::Debug, "event ignored")
                .layer("usecase")
                .kind("session")
                .field("event", event)
                .field("state", self.state.name()),
        );
        Step::Ignored
    }

    fn fail(&mut self, e: Error) -> Error {
        self.log(
            LogLevel::Error,
            "session aborted by error",
            "error",
            Some(("error", e.to_string().into())),
        );
        self.transition(SessionState::Idle);
        e
    }

    fn log(&self, level: LogLevel, message: &str, kind: &str, field: Option<(&str, serde_json::Value)>) {
        let mut rec = LogRecord::new(level, message).layer("usecase").kind(kind);
        if let Some((k, v)) = field {
            rec = rec.field(k, v);
        }
        let _ = self.logger.log(&rec);
    }
}
