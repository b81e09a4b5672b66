//! 外部デコーダコマンドを起動する CaptureEngine 実装
//!
//! 既定は `zbarcam --oneshot --nodisplay`。stdout を別スレッドで読み、最初に解析できた行を
//! 結果として 1 回だけ返す。何も得られずに終了した場合と abort された場合は Cancelled。
//! Unix ではコマンドを専用のプロセスグループで起動し、止めるときはグループごと kill する。

use std::io::{BufRead, BufReader};
use std::process::{Child, Command, Stdio};
use std::sync::{Arc, Mutex};

use common::error::Error;
use common::ports::outbound::{Log, LogLevel, LogRecord};
use regex::Regex;

use super::config::{CaptureConfig, CaptureOutput};
use crate::domain::{normalize_format, CaptureReply, SessionEvent, SessionTicket};
use crate::ports::outbound::{CaptureEngine, SessionEventSink};

/// zbar の出力行 `<Symbology>:<payload>`
const ZBAR_LINE: &str = r"^([A-Za-z0-9+_-]+):(.*)$";

/// デコーダの出力行から (payload, format) を取り出す
#[derive(Debug, Clone)]
pub enum OutputParser {
    Zbar(Regex),
    Raw { format_label: String },
}

impl OutputParser {
    pub fn zbar() -> Result<Self, Error> {
        Regex::new(ZBAR_LINE)
            .map(OutputParser::Zbar)
            .map_err(|e| Error::system(format!("invalid output pattern: {}", e)))
    }

    pub fn raw(format_label: impl Into<String>) -> Self {
        OutputParser::Raw {
            format_label: format_label.into(),
        }
    }

    pub fn from_config(config: &CaptureConfig) -> Result<Self, Error> {
        match config.output {
            CaptureOutput::Zbar => Self::zbar(),
            CaptureOutput::Raw => Ok(Self::raw(config.format_label.clone())),
        }
    }

    /// 1 行を解析する。結果として扱えない行は None
    pub fn parse_line(&self, line: &str) -> Option<(String, String)> {
        let line = line.trim_end_matches(['\r', '\n']);
        match self {
            OutputParser::Zbar(re) => {
                let caps = re.captures(line)?;
                Some((caps[2].to_string(), normalize_format(&caps[1])))
            }
            OutputParser::Raw { format_label } => {
                if line.trim().is_empty() {
                    return None;
                }
                Some((line.to_string(), normalize_format(format_label)))
            }
        }
    }
}

pub struct CommandCaptureEngine {
    argv: Vec<String>,
    parser: OutputParser,
    child: Arc<Mutex<Option<Child>>>,
    logger: Arc<dyn Log>,
}

impl CommandCaptureEngine {
    pub fn new(argv: Vec<String>, parser: OutputParser, logger: Arc<dyn Log>) -> Self {
        Self {
            argv,
            parser,
            child: Arc::new(Mutex::new(None)),
            logger,
        }
    }

    pub fn from_config(config: &CaptureConfig, logger: Arc<dyn Log>) -> Result<Self, Error> {
        Ok(Self::new(
            config.command.clone(),
            OutputParser::from_config(config)?,
            logger,
        ))
    }
}

/// エンジンを止める。`sh -c` などのラッパーが起動した孫プロセスも対象
#[cfg(unix)]
fn kill_engine(child: &mut Child) -> std::io::Result<()> {
    let pgid = child.id() as libc::pid_t;
    unsafe {
        if libc::kill(-pgid, libc::SIGKILL) != 0 {
            let err = std::io::Error::last_os_error();
            if err.raw_os_error() != Some(libc::ESRCH) {
                return Err(err);
            }
        }
    }
    Ok(())
}

#[cfg(not(unix))]
fn kill_engine(child: &mut Child) -> std::io::Result<()> {
    child.kill()
}

impl CaptureEngine for CommandCaptureEngine {
    fn start(&self, ticket: SessionTicket, sink: Arc<dyn SessionEventSink>) -> Result<(), Error> {
        let (program, args) = self
            .argv
            .split_first()
            .ok_or_else(|| Error::env("capture command is empty"))?;

        let mut slot = self
            .child
            .lock()
            .map_err(|_| Error::system("capture engine lock poisoned"))?;
        if slot.is_some() {
            return Err(Error::system("a capture is already running"));
        }

        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }
        let mut child = command
            .spawn()
            .map_err(|e| {
                Error::system(format!(
                    "Camera unavailable: failed to start '{}': {}",
                    program, e
                ))
            })?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::system("capture engine stdout is not piped"))?;
        *slot = Some(child);
        drop(slot);

        let _ = self.logger.log(
            &LogRecord::new(LogLevel::Debug, "capture engine spawned")
                .layer("adapter")
                .kind("capture")
                .field("program", program.as_str())
                .field("ticket", ticket.0),
        );

        let parser = self.parser.clone();
        let child_slot = Arc::clone(&self.child);
        let logger = Arc::clone(&self.logger);
        std::thread::spawn(move || {
            let mut found = None;
            for line in BufReader::new(stdout).lines() {
                let line = match line {
                    Ok(l) => l,
                    Err(_) => break,
                };
                if let Some(result) = parser.parse_line(&line) {
                    found = Some(result);
                    break;
                }
            }

            let child = child_slot.lock().ok().and_then(|mut c| c.take());
            if let Some(mut child) = child {
                if found.is_some() {
                    // oneshot でないコマンドは読み取り後も動き続ける
                    let _ = kill_engine(&mut child);
                }
                match child.wait() {
                    Ok(status) if !status.success() && found.is_none() => {
                        let _ = logger.log(
                            &LogRecord::new(LogLevel::Warn, "capture engine exited without result")
                                .layer("adapter")
                                .kind("capture")
                                .field("status", status.to_string()),
                        );
                    }
                    Ok(_) => {}
                    Err(e) => {
                        let _ = logger.log(
                            &LogRecord::new(LogLevel::Warn, "failed to wait capture engine")
                                .layer("adapter")
                                .kind("capture")
                                .field("error", e.to_string()),
                        );
                    }
                }
            }

            let reply = match found {
                Some((payload, format)) => CaptureReply::success(payload, format),
                None => CaptureReply::cancelled(),
            };
            sink.deliver(SessionEvent::CaptureCompleted { ticket, reply });
        });
        Ok(())
    }

    fn abort(&self) {
        if let Ok(mut slot) = self.child.lock() {
            if let Some(child) = slot.as_mut() {
                // stdout が閉じて読み取りスレッドが Cancelled を返す
                if let Err(e) = kill_engine(child) {
                    let _ = self.logger.log(
                        &LogRecord::new(LogLevel::Warn, "failed to kill capture engine")
                            .layer("adapter")
                            .kind("capture")
                            .field("error", e.to_string()),
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::ChannelEventSink;
    use crate::domain::AppEvent;
    use common::adapter::NoopLog;
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn test_zbar_line_is_parsed_and_normalized() {
        let parser = OutputParser::zbar().unwrap();
        assert_eq!(
            parser.parse_line("QR-Code:https://example.com/a:b\n"),
            Some(("https://example.com/a:b".to_string(), "QR_CODE".to_string()))
        );
        assert_eq!(
            parser.parse_line("EAN-13:4901234567894"),
            Some(("4901234567894".to_string(), "EAN_13".to_string()))
        );
        assert_eq!(parser.parse_line("scanning..."), None);
    }

    #[test]
    fn test_raw_line_uses_format_label() {
        let parser = OutputParser::raw("code-128");
        assert_eq!(
            parser.parse_line("ABC-123\r\n"),
            Some(("ABC-123".to_string(), "CODE_128".to_string()))
        );
        assert_eq!(parser.parse_line("   "), None);
    }

    #[test]
    fn test_from_config_selects_parser() {
        let mut config = CaptureConfig::default();
        assert!(matches!(OutputParser::from_config(&config).unwrap(), OutputParser::Zbar(_)));
        config.output = CaptureOutput::Raw;
        assert!(matches!(OutputParser::from_config(&config).unwrap(), OutputParser::Raw { .. }));
    }

    #[test]
    fn test_spawn_failure_is_reported_as_camera_unavailable() {
        let engine = CommandCaptureEngine::new(
            vec!["scanshell-no-such-decoder".to_string()],
            OutputParser::raw("QR_CODE"),
            Arc::new(NoopLog),
        );
        let (tx, _rx) = mpsc::channel();
        let err = engine
            .start(SessionTicket(1), Arc::new(ChannelEventSink::new(tx)))
            .unwrap_err();
        assert!(err.to_string().contains("Camera unavailable"));
        assert_eq!(err.exit_code(), 70);
    }

    #[cfg(unix)]
    fn sh(script: &str) -> CommandCaptureEngine {
        CommandCaptureEngine::new(
            vec!["sh".to_string(), "-c".to_string(), script.to_string()],
            OutputParser::zbar().unwrap(),
            Arc::new(NoopLog),
        )
    }

    #[cfg(unix)]
    fn wait_reply(rx: &mpsc::Receiver<AppEvent>) -> (SessionTicket, CaptureReply) {
        match rx.recv_timeout(Duration::from_secs(10)).unwrap() {
            AppEvent::Session(SessionEvent::CaptureCompleted { ticket, reply }) => (ticket, reply),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_first_decoded_line_is_delivered_once() {
        let engine = sh("echo 'waiting'; echo 'QR-Code:abc'; echo 'EAN-13:123'");
        let (tx, rx) = mpsc::channel();
        engine
            .start(SessionTicket(7), Arc::new(ChannelEventSink::new(tx)))
            .unwrap();

        let (ticket, reply) = wait_reply(&rx);
        assert_eq!(ticket, SessionTicket(7));
        assert_eq!(reply, CaptureReply::success("abc", "QR_CODE"));
        assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_exit_without_output_is_cancelled() {
        let engine = sh("exit 3");
        let (tx, rx) = mpsc::channel();
        engine
            .start(SessionTicket(1), Arc::new(ChannelEventSink::new(tx)))
            .unwrap();

        let (_, reply) = wait_reply(&rx);
        assert_eq!(reply, CaptureReply::cancelled());
    }

    #[cfg(unix)]
    #[test]
    fn test_abort_kills_engine_and_delivers_cancelled() {
        let engine = sh("exec sleep 30");
        let (tx, rx) = mpsc::channel();
        engine
            .start(SessionTicket(2), Arc::new(ChannelEventSink::new(tx)))
            .unwrap();
        engine.abort();

        let (ticket, reply) = wait_reply(&rx);
        assert_eq!(ticket, SessionTicket(2));
        assert_eq!(reply, CaptureReply::cancelled());
    }

    #[cfg(unix)]
    #[test]
    fn test_abort_stops_wrapped_decoder() {
        // sh は exec せずに sleep を子として起動するので、stdout を握るのは孫プロセス
        let engine = sh("sleep 30; :");
        let (tx, rx) = mpsc::channel();
        engine
            .start(SessionTicket(3), Arc::new(ChannelEventSink::new(tx)))
            .unwrap();
        std::thread::sleep(Duration::from_millis(100));
        engine.abort();

        let (ticket, reply) = wait_reply(&rx);
        assert_eq!(ticket, SessionTicket(3));
        assert_eq!(reply, CaptureReply::cancelled());
    }

    #[cfg(unix)]
    #[test]
    fn test_result_from_wrapped_decoder_stops_it() {
        let engine = sh("echo 'QR-Code:abc'; sleep 30; :");
        let (tx, rx) = mpsc::channel();
        engine
            .start(SessionTicket(4), Arc::new(ChannelEventSink::new(tx)))
            .unwrap();

        let (_, reply) = wait_reply(&rx);
        assert_eq!(reply, CaptureReply::success("abc", "QR_CODE"));
        assert!(engine.child.lock().unwrap().is_none());
    }
}
