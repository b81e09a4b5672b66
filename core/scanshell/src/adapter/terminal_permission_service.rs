//! 端末で尋ねる PermissionService 実装
//!
//! 許可状態は権限ストアを毎回読む。request はプロンプトを表示してすぐ戻る。
//! 回答はイベントループが `PromptResponder::answer` に渡した次の 1 行で決まる。
//! y / yes 以外はすべて拒否。回答はストアに記録してから sink へ届ける。
//! 入力が閉じた後の request は、プロンプトを出さずに空の結果（拒否）で解決する。

use std::io::Write;
use std::sync::{Arc, Mutex};

use common::error::Error;
use common::ports::outbound::{Log, LogLevel, LogRecord};

use crate::domain::{Capability, PermissionReply, PermissionStatus, SessionEvent};
use crate::ports::outbound::{PermissionService, PermissionStore, PromptResponder, SessionEventSink};

struct PendingPrompt {
    capability: Capability,
    sink: Arc<dyn SessionEventSink>,
}

#[derive(Default)]
struct PromptState {
    pending: Option<PendingPrompt>,
    input_closed: bool,
}

pub struct TerminalPermissionService {
    store: Arc<dyn PermissionStore>,
    out: Mutex<Box<dyn Write + Send>>,
    state: Mutex<PromptState>,
    logger: Arc<dyn Log>,
}

impl TerminalPermissionService {
    pub fn new(store: Arc<dyn PermissionStore>, out: Box<dyn Write + Send>, logger: Arc<dyn Log>) -> Self {
        Self {
            store,
            out: Mutex::new(out),
            state: Mutex::new(PromptState::default()),
            logger,
        }
    }

    fn take_pending(&self) -> Option<PendingPrompt> {
        self.state.lock().ok().and_then(|mut st| st.pending.take())
    }

    fn resolve(&self, prompt: PendingPrompt, reply: PermissionReply) {
        let status = reply.status();
        if !reply.grant_results.is_empty() {
            if let Err(e) = self.store.save(prompt.capability, status) {
                let _ = self.logger.log(
                    &LogRecord::new(LogLevel::Warn, "failed to record permission")
                        .layer("adapter")
                        .kind("permission")
                        .field("error", e.to_string()),
                );
            }
        }
        prompt.sink.deliver(SessionEvent::PermissionResolved(reply));
    }
}

impl PermissionService for TerminalPermissionService {
    fn is_granted(&self, capability: Capability) -> Result<bool, Error> {
        Ok(self.store.load(capability)? == Some(PermissionStatus::Granted))
    }

    fn request(&self, capability: Capability, sink: Arc<dyn SessionEventSink>) -> Result<(), Error> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| Error::system("permission prompt lock poisoned"))?;
        if state.pending.is_some() {
            return Ok(());
        }
        if state.input_closed {
            drop(state);
            let _ = self.logger.log(
                &LogRecord::new(LogLevel::Info, "permission request resolved without prompt")
                    .layer("adapter")
                    .kind("permission")
                    .field("reason", "input closed"),
            );
            sink.deliver(SessionEvent::PermissionResolved(PermissionReply::empty()));
            return Ok(());
        }
        {
            let mut out = self
                .out
                .lock()
                .map_err(|_| Error::system("permission prompt lock poisoned"))?;
            write!(out, "Allow scanshell to use the {}? [y/N]: ", capability.as_str())?;
            out.flush()?;
        }
        state.pending = Some(PendingPrompt { capability, sink });
        Ok(())
    }
}

impl PromptResponder for TerminalPermissionService {
    fn answer(&self, line: &str) -> bool {
        let prompt = match self.take_pending() {
            Some(p) => p,
            None => return false,
        };
        let reply = match line.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" => PermissionReply::granted(),
            _ => PermissionReply::denied(),
        };
        self.resolve(prompt, reply);
        true
    }

    fn close(&self) {
        let prompt = match self.state.lock() {
            Ok(mut st) => {
                st.input_closed = true;
                st.pending.take()
            }
            Err(_) => None,
        };
        if let Some(prompt) = prompt {
            self.resolve(prompt, PermissionReply::empty());
        }
    }
}
