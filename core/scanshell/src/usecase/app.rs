//! 対話シェル / 1 回スキャンのユースケース（イベントループ）
//!
//! 入力・Ctrl+C・非同期コールバックはすべて 1 本の channel に届く。
//! `recv()` でブロックし、届いたメッセージを SessionController へ渡す。
//! 権限の回答待ちの間だけ、入力行は PromptResponder へ回答として渡す。

use std::sync::mpsc::Receiver;
use std::sync::Arc;

use common::error::Error;
use common::ports::outbound::{Log, LogLevel, LogRecord};

use super::session_controller::SessionController;
use crate::domain::{AppEvent, InputCommand, MenuCommand, SessionEnd, SessionEvent, SessionState, Step};
use crate::ports::outbound::{
    CaptureEngine, Console, PermissionService, PromptResponder, ResultPresenter, SessionEventSink,
    SettingsScreen,
};

/// `scan` がキャンセルで終わったときの終了コード
pub const EXIT_CANCELLED: i32 = 1;
/// `scan` が権限拒否で終わったときの終了コード（EX_NOPERM）
pub const EXIT_PERMISSION_DENIED: i32 = 77;
/// Ctrl+C で終了したときの終了コード
pub const EXIT_INTERRUPTED: i32 = 130;

const INPUT_HELP: &str = "\
Commands:
  scan       Start a scan session.
  cancel     Abort the running capture.
  back       Leave the result screen.
  settings   Show the settings screen.
  help       Show this help.
  quit       Exit.";

/// ループの動作モード
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopMode {
    /// 入力を待ち続ける（quit / EOF で終了）
    Interactive,
    /// 1 セッションだけ実行して終了
    Once,
}

pub struct ScanShellUseCase {
    permission_service: Arc<dyn PermissionService>,
    prompt: Arc<dyn PromptResponder>,
    engine: Arc<dyn CaptureEngine>,
    presenter: Arc<dyn ResultPresenter>,
    settings: Arc<dyn SettingsScreen>,
    console: Arc<dyn Console>,
    logger: Arc<dyn Log>,
}

impl ScanShellUseCase {
    pub fn new(
        permission_service: Arc<dyn PermissionService>,
        prompt: Arc<dyn PromptResponder>,
        engine: Arc<dyn CaptureEngine>,
        presenter: Arc<dyn ResultPresenter>,
        settings: Arc<dyn SettingsScreen>,
        console: Arc<dyn Console>,
        logger: Arc<dyn Log>,
    ) -> Self {
        Self {
            permission_service,
            prompt,
            engine,
            presenter,
            settings,
            console,
            logger,
        }
    }

    /// 設定画面を開く（メニューの OpenSettings と同じ）
    pub fn open_settings(&self) -> Result<i32, Error> {
        self.settings.open()?;
        Ok(0)
    }

    /// イベントループを実行し、終了コードを返す
    pub fn run(
        &self,
        mode: LoopMode,
        events: &Receiver<AppEvent>,
        sink: Arc<dyn SessionEventSink>,
    ) -> Result<i32, Error> {
        let mut controller = SessionController::new(
            Arc::clone(&self.permission_service),
            Arc::clone(&self.engine),
            Arc::clone(&self.presenter),
            sink,
            Arc::clone(&self.logger),
        );
        let _ = self.logger.log(
            &LogRecord::new(LogLevel::Info, "event loop started")
                .layer("usecase")
                .kind("lifecycle")
                .field("mode", format!("{:?}", mode).to_lowercase()),
        );

        let code = self.event_loop(&mut controller, mode, events);
        let _ = self.logger.log(
            &LogRecord::new(LogLevel::Info, "event loop finished")
                .layer("usecase")
                .kind("lifecycle")
                .field("ok", code.is_ok())
                .field("state", controller.state().name())
                .field("permission", format!("{:?}", controller.permission_state()).to_lowercase())
                .field("pending", controller.has_pending()),
        );
        controller.shutdown();
        code
    }

    fn event_loop(
        &self,
        controller: &mut SessionController,
        mode: LoopMode,
        events: &Receiver<AppEvent>,
    ) -> Result<i32, Error> {
        match mode {
            LoopMode::Once => {
                if let Some(code) = self.dispatch(controller, SessionEvent::ScanRequested, mode)? {
                    return Ok(code);
                }
            }
            LoopMode::Interactive => {
                self.console.notice("Type 'scan' to start a scan, 'help' for commands.");
            }
        }

        let mut input_closed = false;
        while let Ok(event) = events.recv() {
            let exit = match event {
                AppEvent::Line(line) => {
                    if self.answers_prompt(controller) && self.prompt.answer(&line) {
                        None
                    } else {
                        self.on_input(controller, InputCommand::parse(&line), mode)?
                    }
                }
                AppEvent::Session(ev) => self.dispatch(controller, ev, mode)?,
                AppEvent::Interrupt => {
                    if *controller.state() == SessionState::Capturing {
                        self.dispatch(controller, SessionEvent::Cancel, mode)?
                    } else {
                        Some(EXIT_INTERRUPTED)
                    }
                }
                AppEvent::InputClosed => {
                    input_closed = true;
                    // 回答待ちのプロンプトは拒否として PermissionResolved が届く
                    self.prompt.close();
                    None
                }
            };
            if let Some(code) = exit {
                return Ok(code);
            }
            // 入力が尽きたら、結果待ちのセッションが終わった時点で抜ける
            if input_closed && mode == LoopMode::Interactive && !controller.state().is_waiting() {
                return Ok(0);
            }
        }
        Ok(0)
    }

    /// 入力行を権限プロンプトの回答として扱う状態か
    fn answers_prompt(&self, controller: &SessionController) -> bool {
        *controller.state() == SessionState::AwaitingPermission && controller.has_pending()
    }

    fn on_input(
        &self,
        controller: &mut SessionController,
        cmd: InputCommand,
        mode: LoopMode,
    ) -> Result<Option<i32>, Error> {
        let event = match cmd {
            InputCommand::Scan => {
                if !controller.state().is_idle() {
                    self.console.notice(&format!(
                        "A scan session is already active ({}).",
                        controller.state().name()
                    ));
                }
                SessionEvent::ScanRequested
            }
            InputCommand::Back => SessionEvent::Back,
            InputCommand::Cancel => SessionEvent::Cancel,
            InputCommand::Menu(MenuCommand::OpenSettings) => {
                if let Err(e) = self.settings.open() {
                    self.console.notice(&format!("scanshell: {}", e));
                }
                return Ok(None);
            }
            InputCommand::Help => {
                self.console.notice(INPUT_HELP);
                return Ok(None);
            }
            InputCommand::Quit => {
                return Ok(Some(match mode {
                    LoopMode::Interactive => 0,
                    LoopMode::Once => EXIT_CANCELLED,
                }));
            }
            InputCommand::Empty => return Ok(None),
            InputCommand::Unknown(s) => {
                self.console
                    .notice(&format!("Unknown command '{}'. Type 'help' for commands.", s));
                return Ok(None);
            }
        };
        self.dispatch(controller, event, mode)
    }

    /// controller にイベントを渡し、終了すべきなら終了コードを返す
    fn dispatch(
        &self,
        controller: &mut SessionController,
        event: SessionEvent,
        mode: LoopMode,
    ) -> Result<Option<i32>, Error> {
        let step = match controller.handle(event) {
            Ok(step) => step,
            Err(e) if mode == LoopMode::Interactive => {
                self.console.notice(&format!("scanshell: {}", e));
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        match step {
            Step::Ended(SessionEnd::PermissionDenied) => {
                self.console.notice("Camera permission denied; scan did not start.");
                Ok((mode == LoopMode::Once).then_some(EXIT_PERMISSION_DENIED))
            }
            Step::Ended(SessionEnd::CaptureCancelled) => {
                self.console.notice("Scan cancelled.");
                Ok((mode == LoopMode::Once).then_some(EXIT_CANCELLED))
            }
            Step::Ended(SessionEnd::Presented) => match mode {
                LoopMode::Once => {
                    controller.handle(SessionEvent::Back)?;
                    Ok(Some(0))
                }
                LoopMode::Interactive => {
                    self.console.notice("Type 'back' to return.");
                    Ok(None)
                }
            },
            Step::AbortRequested => {
                self.console.notice("Cancelling capture...");
                Ok(None)
            }
            Step::Transitioned => {
                if *controller.state() == SessionState::Capturing {
                    self.console.notice("Scanning... (type 'cancel' or press Ctrl+C to abort)");
                }
                Ok(None)
            }
            Step::Ignored => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::ChannelEventSink;
    use crate::domain::{CaptureReply, PermissionReply};
    use crate::tests::stubs::{
        AutoReplyEngine, CollectLog, RecordingConsole, RecordingPresenter, RecordingPrompt,
        RecordingSettings, StubCaptureEngine, StubPermissionService,
    };
    use common::adapter::NoopLog;
    use std::sync::mpsc;

    struct Harness {
        usecase: ScanShellUseCase,
        prompt: Arc<RecordingPrompt>,
        presenter: Arc<RecordingPresenter>,
        console: Arc<RecordingConsole>,
        settings: Arc<RecordingSettings>,
    }

    fn harness(permission: Arc<StubPermissionService>, engine: Arc<dyn CaptureEngine>) -> Harness {
        let presenter = Arc::new(RecordingPresenter::default());
        let console = Arc::new(RecordingConsole::default());
        let settings = Arc::new(RecordingSettings::default());
        let prompt = Arc::new(RecordingPrompt::default());
        let usecase = ScanShellUseCase::new(
            permission,
            prompt.clone(),
            engine,
            presenter.clone(),
            settings.clone(),
            console.clone(),
            Arc::new(NoopLog),
        );
        Harness {
            usecase,
            prompt,
            presenter,
            console,
            settings,
        }
    }

    fn channel() -> (mpsc::Sender<AppEvent>, mpsc::Receiver<AppEvent>, Arc<dyn SessionEventSink>) {
        let (tx, rx) = mpsc::channel();
        let sink: Arc<dyn SessionEventSink> = Arc::new(ChannelEventSink::new(tx.clone()));
        (tx, rx, sink)
    }

    fn line(s: &str) -> AppEvent {
        AppEvent::Line(s.to_string())
    }

    #[test]
    fn test_once_with_granted_permission_presents_result() {
        let engine = Arc::new(AutoReplyEngine::new(CaptureReply::success("123456", "EAN_13")));
        let h = harness(Arc::new(StubPermissionService::granted()), engine);
        let (_tx, rx, sink) = channel();

        let code = h.usecase.run(LoopMode::Once, &rx, sink).unwrap();
        assert_eq!(code, 0);
        let views = h.presenter.views();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].payload, "123456");
        assert_eq!(views[0].format, "EAN_13");
    }

    #[test]
    fn test_once_cancelled_exits_with_cancel_code() {
        let engine = Arc::new(AutoReplyEngine::new(CaptureReply::cancelled()));
        let h = harness(Arc::new(StubPermissionService::granted()), engine);
        let (_tx, rx, sink) = channel();

        assert_eq!(h.usecase.run(LoopMode::Once, &rx, sink).unwrap(), EXIT_CANCELLED);
        assert!(h.presenter.views().is_empty());
        assert!(h.console.contains("Scan cancelled."));
    }

    #[test]
    fn test_once_permission_denied_exits_with_noperm() {
        let engine = Arc::new(StubCaptureEngine::default());
        let h = harness(Arc::new(StubPermissionService::denied()), engine.clone());
        let (tx, rx, sink) = channel();
        tx.send(AppEvent::Session(SessionEvent::PermissionResolved(PermissionReply::denied())))
            .unwrap();

        assert_eq!(h.usecase.run(LoopMode::Once, &rx, sink).unwrap(), EXIT_PERMISSION_DENIED);
        assert!(engine.started().is_empty());
        assert!(h.console.contains("scan did not start"));
    }

    #[test]
    fn test_once_engine_failure_is_returned() {
        let engine = Arc::new(StubCaptureEngine::default());
        engine.fail_start(true);
        let h = harness(Arc::new(StubPermissionService::granted()), engine);
        let (_tx, rx, sink) = channel();

        assert!(h.usecase.run(LoopMode::Once, &rx, sink).is_err());
    }

    #[test]
    fn test_interactive_session_then_quit() {
        let engine = Arc::new(AutoReplyEngine::new(CaptureReply::success("abc", "QR_CODE")));
        let h = harness(Arc::new(StubPermissionService::granted()), engine);
        let (tx, rx, sink) = channel();
        tx.send(line("scan")).unwrap();
        tx.send(line("back")).unwrap();
        tx.send(line("quit")).unwrap();

        assert_eq!(h.usecase.run(LoopMode::Interactive, &rx, sink).unwrap(), 0);
        assert_eq!(h.presenter.views().len(), 1);
        assert!(h.console.contains("Type 'back' to return."));
    }

    #[test]
    fn test_interactive_engine_failure_is_reported_and_loop_continues() {
        let engine = Arc::new(StubCaptureEngine::default());
        engine.fail_start(true);
        let h = harness(Arc::new(StubPermissionService::granted()), engine);
        let (tx, rx, sink) = channel();
        tx.send(line("scan")).unwrap();
        tx.send(line("quit")).unwrap();

        assert_eq!(h.usecase.run(LoopMode::Interactive, &rx, sink).unwrap(), 0);
        assert!(h.console.contains("scanshell: "));
    }

    #[test]
    fn test_interactive_settings_and_unknown_command() {
        let h = harness(
            Arc::new(StubPermissionService::granted()),
            Arc::new(StubCaptureEngine::default()),
        );
        let (tx, rx, sink) = channel();
        tx.send(line("settings")).unwrap();
        tx.send(line("zoom")).unwrap();
        tx.send(AppEvent::InputClosed).unwrap();

        assert_eq!(h.usecase.run(LoopMode::Interactive, &rx, sink).unwrap(), 0);
        assert_eq!(h.settings.open_count(), 1);
        assert!(h.console.contains("Unknown command 'zoom'"));
    }

    #[test]
    fn test_interrupt_while_capturing_cancels_capture() {
        let engine = Arc::new(StubCaptureEngine::default());
        let h = harness(Arc::new(StubPermissionService::granted()), engine.clone());
        let (tx, rx, sink) = channel();
        tx.send(line("scan")).unwrap();
        tx.send(AppEvent::Interrupt).unwrap();
        // 中断後にエンジンが返す Cancelled
        tx.send(AppEvent::Session(SessionEvent::CaptureCompleted {
            ticket: crate::domain::SessionTicket(1),
            reply: CaptureReply::cancelled(),
        }))
        .unwrap();
        tx.send(AppEvent::Interrupt).unwrap();

        let code = h.usecase.run(LoopMode::Interactive, &rx, sink).unwrap();
        assert_eq!(code, EXIT_INTERRUPTED);
        assert_eq!(engine.abort_count(), 1);
        assert!(h.console.contains("Scan cancelled."));
    }

    #[test]
    fn test_input_closed_waits_for_running_capture() {
        let engine = Arc::new(StubCaptureEngine::default());
        let h = harness(Arc::new(StubPermissionService::granted()), engine);
        let (tx, rx, sink) = channel();
        tx.send(line("scan")).unwrap();
        tx.send(AppEvent::InputClosed).unwrap();
        tx.send(AppEvent::Session(SessionEvent::CaptureCompleted {
            ticket: crate::domain::SessionTicket(1),
            reply: CaptureReply::success("late", "CODE_128"),
        }))
        .unwrap();

        assert_eq!(h.usecase.run(LoopMode::Interactive, &rx, sink).unwrap(), 0);
        assert_eq!(h.presenter.views()[0].payload, "late");
    }

    #[test]
    fn test_line_while_awaiting_permission_goes_to_prompt() {
        let engine = Arc::new(StubCaptureEngine::default());
        let h = harness(Arc::new(StubPermissionService::denied()), engine.clone());
        let (tx, rx, sink) = channel();
        tx.send(line("scan")).unwrap();
        // 回答待ちの間の "quit" は回答であってコマンドではない
        tx.send(line("quit")).unwrap();
        tx.send(AppEvent::Session(SessionEvent::PermissionResolved(PermissionReply::denied())))
            .unwrap();
        tx.send(line("quit")).unwrap();

        assert_eq!(h.usecase.run(LoopMode::Interactive, &rx, sink).unwrap(), 0);
        assert_eq!(h.prompt.answers(), vec!["quit".to_string()]);
        assert!(h.console.contains("scan did not start"));
        assert!(engine.started().is_empty());
    }

    #[test]
    fn test_line_while_idle_is_a_command_not_an_answer() {
        let h = harness(
            Arc::new(StubPermissionService::granted()),
            Arc::new(StubCaptureEngine::default()),
        );
        let (tx, rx, sink) = channel();
        tx.send(line("y")).unwrap();
        tx.send(line("quit")).unwrap();

        assert_eq!(h.usecase.run(LoopMode::Interactive, &rx, sink).unwrap(), 0);
        assert!(h.prompt.answers().is_empty());
        assert!(h.console.contains("Unknown command 'y'"));
    }

    #[test]
    fn test_input_closed_closes_prompt() {
        let h = harness(
            Arc::new(StubPermissionService::granted()),
            Arc::new(StubCaptureEngine::default()),
        );
        let (tx, rx, sink) = channel();
        tx.send(AppEvent::InputClosed).unwrap();

        assert_eq!(h.usecase.run(LoopMode::Interactive, &rx, sink).unwrap(), 0);
        assert_eq!(h.prompt.close_count(), 1);
    }

    #[test]
    fn test_finished_log_reports_controller_state() {
        let log = Arc::new(CollectLog::default());
        let usecase = ScanShellUseCase::new(
            Arc::new(StubPermissionService::granted()),
            Arc::new(RecordingPrompt::default()),
            Arc::new(AutoReplyEngine::new(CaptureReply::cancelled())),
            Arc::new(RecordingPresenter::default()),
            Arc::new(RecordingSettings::default()),
            Arc::new(RecordingConsole::default()),
            log.clone(),
        );
        let (_tx, rx, sink) = channel();

        assert_eq!(usecase.run(LoopMode::Once, &rx, sink).unwrap(), EXIT_CANCELLED);
        let fields = log.record("event loop finished").unwrap().fields.unwrap();
        assert_eq!(fields["state"], "idle");
        assert_eq!(fields["permission"], "granted");
        assert_eq!(fields["pending"], false);
    }
}
