//! Ctrl+C（SIGINT）をイベントループへ届ける
//!
//! ctrlc のハンドラはプロセスにつき 1 回だけ登録できる。

use std::sync::mpsc::Sender;
use std::sync::Mutex;

use common::error::Error;

use crate::domain::AppEvent;

/// SIGINT を受けるたびに `AppEvent::Interrupt` を送るハンドラを登録する
pub fn install_interrupt_handler(tx: Sender<AppEvent>) -> Result<(), Error> {
    let tx = Mutex::new(tx);
    ctrlc::set_handler(move || {
        if let Ok(tx) = tx.lock() {
            let _ = tx.send(AppEvent::Interrupt);
        }
    })
    .map_err(|e| Error::system(format!("failed to install Ctrl+C handler: {}", e)))
}
