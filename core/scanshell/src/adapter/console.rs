//! 標準エラー出力への通知（Console 実装）

use crate::ports::outbound::Console;

#[derive(Debug, Clone, Default)]
pub struct StderrConsole;

impl Console for StderrConsole {
    fn notice(&self, message: &str) {
        eprintln!("{}", message);
    }
}
