//! 結果画面を端末へ書き出す ResultPresenter 実装

use std::io::Write;
use std::sync::Mutex;

use common::error::Error;

use super::config::OutputFormat;
use crate::domain::ScanResultView;
use crate::ports::outbound::ResultPresenter;

pub struct TerminalPresenter {
    out: Mutex<Box<dyn Write + Send>>,
    format: OutputFormat,
}

impl TerminalPresenter {
    pub fn new(out: Box<dyn Write + Send>, format: OutputFormat) -> Self {
        Self {
            out: Mutex::new(out),
            format,
        }
    }

    pub fn stdout(format: OutputFormat) -> Self {
        Self::new(Box::new(std::io::stdout()), format)
    }
}

impl ResultPresenter for TerminalPresenter {
    fn render(&self, view: &ScanResultView) -> Result<(), Error> {
        let body = match self.format {
            OutputFormat::Text => view.text(),
            OutputFormat::Json => serde_json::to_string(view)?,
        };
        let mut out = self
            .out
            .lock()
            .map_err(|_| Error::system("presenter lock poisoned"))?;
        writeln!(out, "{}", body)?;
        out.flush()?;
        Ok(())
    }
}
