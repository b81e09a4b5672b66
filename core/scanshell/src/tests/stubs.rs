//! テスト用のポート実装（呼び出しを記録する）

use std::collections::HashMap;
use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use common::error::Error;
use common::ports::outbound::{Log, LogRecord};

use crate::domain::{
    Capability, CaptureReply, PermissionStatus, ScanResultView, SessionEvent, SessionTicket,
};
use crate::ports::outbound::{
    CaptureEngine, Console, PermissionService, PermissionStore, PromptResponder, ResultPresenter,
    SessionEventSink, SettingsScreen,
};

/// 届いたイベントを貯めるだけの sink
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<SessionEvent>>,
}

impl RecordingSink {
    pub fn take(&self) -> Vec<SessionEvent> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }
}

impl SessionEventSink for RecordingSink {
    fn deliver(&self, event: SessionEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// is_granted の返り値を切り替えられ、request の回数を数える
pub struct StubPermissionService {
    granted: AtomicBool,
    requests: AtomicUsize,
    fail_requests: AtomicBool,
}

impl StubPermissionService {
    pub fn granted() -> Self {
        Self {
            granted: AtomicBool::new(true),
            requests: AtomicUsize::new(0),
            fail_requests: AtomicBool::new(false),
        }
    }

    pub fn denied() -> Self {
        Self {
            granted: AtomicBool::new(false),
            requests: AtomicUsize::new(0),
            fail_requests: AtomicBool::new(false),
        }
    }

    pub fn set_granted(&self, granted: bool) {
        self.granted.store(granted, Ordering::SeqCst);
    }

    pub fn fail_requests(&self, fail: bool) {
        self.fail_requests.store(fail, Ordering::SeqCst);
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl PermissionService for StubPermissionService {
    fn is_granted(&self, _capability: Capability) -> Result<bool, Error> {
        Ok(self.granted.load(Ordering::SeqCst))
    }

    fn request(&self, _capability: Capability, _sink: Arc<dyn SessionEventSink>) -> Result<(), Error> {
        if self.fail_requests.load(Ordering::SeqCst) {
            return Err(Error::system("permission service unavailable"));
        }
        self.requests.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// 渡された行をすべて回答として受け取り、記録する
#[derive(Default)]
pub struct RecordingPrompt {
    answers: Mutex<Vec<String>>,
    closes: AtomicUsize,
}

impl RecordingPrompt {
    pub fn answers(&self) -> Vec<String> {
        self.answers.lock().unwrap().clone()
    }

    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

impl PromptResponder for RecordingPrompt {
    fn answer(&self, line: &str) -> bool {
        self.answers.lock().unwrap().push(line.to_string());
        true
    }

    fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

/// start / abort を記録するだけのエンジン（返信はテストが手で送る）
#[derive(Default)]
pub struct StubCaptureEngine {
    starts: Mutex<Vec<SessionTicket>>,
    aborts: AtomicUsize,
    fail_start: AtomicBool,
}

impl StubCaptureEngine {
    pub fn fail_start(&self, fail: bool) {
        self.fail_start.store(fail, Ordering::SeqCst);
    }

    pub fn started(&self) -> Vec<SessionTicket> {
        self.starts.lock().unwrap().clone()
    }

    pub fn abort_count(&self) -> usize {
        self.aborts.load(Ordering::SeqCst)
    }
}

impl CaptureEngine for StubCaptureEngine {
    fn start(&self, ticket: SessionTicket, _sink: Arc<dyn SessionEventSink>) -> Result<(), Error> {
        if self.fail_start.load(Ordering::SeqCst) {
            return Err(Error::system("camera unavailable"));
        }
        self.starts.lock().unwrap().push(ticket);
        Ok(())
    }

    fn abort(&self) {
        self.aborts.fetch_add(1, Ordering::SeqCst);
    }
}

/// start されたら決まった返信をすぐ sink へ送るエンジン
pub struct AutoReplyEngine {
    reply: CaptureReply,
}

impl AutoReplyEngine {
    pub fn new(reply: CaptureReply) -> Self {
        Self { reply }
    }
}

impl CaptureEngine for AutoReplyEngine {
    fn start(&self, ticket: SessionTicket, sink: Arc<dyn SessionEventSink>) -> Result<(), Error> {
        sink.deliver(SessionEvent::CaptureCompleted {
            ticket,
            reply: self.reply.clone(),
        });
        Ok(())
    }

    fn abort(&self) {}
}

#[derive(Default)]
pub struct RecordingPresenter {
    views: Mutex<Vec<ScanResultView>>,
    fail: AtomicBool,
}

impl RecordingPresenter {
    pub fn views(&self) -> Vec<ScanResultView> {
        self.views.lock().unwrap().clone()
    }

    pub fn fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

impl ResultPresenter for RecordingPresenter {
    fn render(&self, view: &ScanResultView) -> Result<(), Error> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::io_msg("stdout closed"));
        }
        self.views.lock().unwrap().push(view.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingConsole {
    notices: Mutex<Vec<String>>,
}

impl RecordingConsole {
    pub fn contains(&self, needle: &str) -> bool {
        self.notices.lock().unwrap().iter().any(|n| n.contains(needle))
    }
}

impl Console for RecordingConsole {
    fn notice(&self, message: &str) {
        self.notices.lock().unwrap().push(message.to_string());
    }
}

#[derive(Default)]
pub struct RecordingSettings {
    opened: AtomicUsize,
}

impl RecordingSettings {
    pub fn open_count(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }
}

impl SettingsScreen for RecordingSettings {
    fn open(&self) -> Result<(), Error> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryPermissionStore {
    entries: Mutex<HashMap<Capability, PermissionStatus>>,
}

impl PermissionStore for MemoryPermissionStore {
    fn load(&self, capability: Capability) -> Result<Option<PermissionStatus>, Error> {
        Ok(self.entries.lock().unwrap().get(&capability).copied())
    }

    fn save(&self, capability: Capability, status: PermissionStatus) -> Result<(), Error> {
        self.entries.lock().unwrap().insert(capability, status);
        Ok(())
    }
}

/// 受け取ったレコードを貯める Log
#[derive(Default)]
pub struct CollectLog {
    records: Mutex<Vec<LogRecord>>,
}

impl CollectLog {
    pub fn messages(&self) -> Vec<String> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.message.clone())
            .collect()
    }

    /// message が一致する最後のレコード
    pub fn record(&self, message: &str) -> Option<LogRecord> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|r| r.message == message)
            .cloned()
    }
}

impl Log for CollectLog {
    fn log(&self, record: &LogRecord) -> Result<(), Error> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}

/// スレッド間で共有できる書き込み先（プロンプト表示の確認用）
#[derive(Clone, Default)]
pub struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
