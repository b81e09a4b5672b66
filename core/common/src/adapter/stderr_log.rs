//! 人間向けログ（LogRecord → stderr へ要点のみ出力）
//!
//! `-v` 指定時だけ配線される。fields の全量は出さず要点のみ（巨大化防止）。

use crate::error::Error;
use crate::ports::outbound::{Log, LogLevel, LogRecord};

const FIELDS_SUMMARY_MAX: usize = 200;

/// LogRecord を 1 行に整形する
pub fn format_record(rec: &LogRecord) -> String {
    let mut line = format!("[{}]", rec.level.as_str());
    if let Some(kind) = &rec.kind {
        line.push_str(&format!(" {}:", kind));
    }
    line.push(' ');
    line.push_str(&rec.message);
    if let Some(fields) = &rec.fields {
        let s = serde_json::to_string(fields).unwrap_or_default();
        if s.len() <= FIELDS_SUMMARY_MAX {
            line.push(' ');
            line.push_str(&s);
        } else {
            let truncated: String = s.chars().take(FIELDS_SUMMARY_MAX).collect();
            line.push_str(&format!(" {}... (len={})", truncated, s.len()));
        }
    }
    line
}

/// stderr へ出す Log 実装。`max_level` より詳細なレコードは捨てる。
pub struct StderrLog {
    max_level: LogLevel,
}

impl StderrLog {
    pub fn new(max_level: LogLevel) -> Self {
        Self { max_level }
    }
}

impl Default for StderrLog {
    fn default() -> Self {
        Self::new(LogLevel::Debug)
    }
}

impl Log for StderrLog {
    fn log(&self, record: &LogRecord) -> Result<(), Error> {
        if record.level <= self.max_level {
            eprintln!("{}", format_record(record));
        }
        Ok(())
    }
}
