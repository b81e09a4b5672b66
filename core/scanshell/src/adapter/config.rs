//! 設定ファイルの読み込み（adapter 層）
//!
//! `<home>/config/scanshell.json`。ファイルが無ければ既定値を使う。

use std::sync::Arc;

use common::domain::HomeDir;
use common::error::Error;
use common::ports::outbound::FileSystem;
use serde::{Deserialize, Serialize};

/// デコーダコマンドの出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureOutput {
    /// `<Symbology>:<payload>` の行（zbarimg / zbarcam 形式）
    #[default]
    Zbar,
    /// 最初の行をそのまま payload とし、format は format_label を使う
    Raw,
}

/// 結果画面の出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// 起動するコマンド（argv）
    pub command: Vec<String>,
    pub output: CaptureOutput,
    /// raw 出力のときのフォーマット名
    pub format_label: String,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            command: vec![
                "zbarcam".to_string(),
                "--oneshot".to_string(),
                "--nodisplay".to_string(),
            ],
            output: CaptureOutput::Zbar,
            format_label: "UNKNOWN".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub capture: CaptureConfig,
    pub output: OutputFormat,
}

/// 設定を読み込む。無ければ既定値、壊れていればエラー。
pub fn load_config(fs: &Arc<dyn FileSystem>, home_dir: &HomeDir) -> Result<AppConfig, Error> {
    let path = home_dir.config_file();
    if !fs.exists(&path) {
        return Ok(AppConfig::default());
    }
    let content = fs.read_to_string(&path)?;
    let config: AppConfig = serde_json::from_str(&content)
        .map_err(|e| Error::json(format!("{}: {}", path.display(), e)))?;
    if config.capture.command.is_empty() {
        return Err(Error::env(format!(
            "{}: capture.command must not be empty",
            path.display()
        )));
    }
    Ok(config)
}
