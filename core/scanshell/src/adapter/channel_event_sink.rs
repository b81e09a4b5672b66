//! mpsc channel へイベントを送る SessionEventSink 実装

use std::sync::mpsc::Sender;
use std::sync::Mutex;

use crate::domain::{AppEvent, SessionEvent};
use crate::ports::outbound::SessionEventSink;

/// イベントループの channel に `AppEvent::Session` として届ける
pub struct ChannelEventSink {
    tx: Mutex<Sender<AppEvent>>,
}

impl ChannelEventSink {
    pub fn new(tx: Sender<AppEvent>) -> Self {
        Self { tx: Mutex::new(tx) }
    }
}

impl SessionEventSink for ChannelEventSink {
    fn deliver(&self, event: SessionEvent) {
        if let Ok(tx) = self.tx.lock() {
            // ループが終了済みなら捨てる
            let _ = tx.send(AppEvent::Session(event));
        }
    }
}
