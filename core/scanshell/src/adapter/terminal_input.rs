//! 標準入力を読むスレッド
//!
//! 1 行ずつ読んでそのままイベントループへ送る。stdin を読むのはこのスレッドだけ。
//! 行を権限プロンプトの回答として扱うかどうかはループが状態を見て決める。

use std::io::{self, BufRead};
use std::sync::mpsc::Sender;
use std::thread::JoinHandle;

use crate::domain::AppEvent;

/// reader が尽きるまで読み、各行を `AppEvent::Line` として送る。最後に InputClosed
pub fn pump_input<R: BufRead>(reader: R, tx: &Sender<AppEvent>) {
    for line in reader.lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };
        if tx.send(AppEvent::Line(line)).is_err() {
            return;
        }
    }
    let _ = tx.send(AppEvent::InputClosed);
}

/// stdin を読むスレッドを起動する（ループ終了後も stdin 待ちで残るため join しない）
pub fn spawn_input_reader(tx: Sender<AppEvent>) -> JoinHandle<()> {
    std::thread::spawn(move || {
        let stdin = io::stdin();
        pump_input(stdin.lock(), &tx);
    })
}
