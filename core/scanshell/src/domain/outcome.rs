//! キャプチャ結果と表示用ビュー
//!
//! キャプチャエンジンは extras（SCAN_RESULT / SCAN_RESULT_FORMAT）付きの返信を 1 回だけ返す。
//! ルーターはそれを ScanOutcome に検証してから扱う。

use serde::Serialize;
use std::collections::BTreeMap;

/// 読み取ったテキストの extras キー
pub const EXTRA_SCAN_RESULT: &str = "SCAN_RESULT";
/// フォーマット名（シンボロジー名）の extras キー
pub const EXTRA_SCAN_RESULT_FORMAT: &str = "SCAN_RESULT_FORMAT";

/// キャプチャエンジンからの生の返信
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CaptureReply {
    /// false ならユーザーが中断した
    pub completed: bool,
    pub extras: BTreeMap<String, String>,
}

impl CaptureReply {
    pub fn success(payload: impl Into<String>, format: impl Into<String>) -> Self {
        let mut extras = BTreeMap::new();
        extras.insert(EXTRA_SCAN_RESULT.to_string(), payload.into());
        extras.insert(EXTRA_SCAN_RESULT_FORMAT.to_string(), format.into());
        Self { completed: true, extras }
    }

    pub fn cancelled() -> Self {
        Self::default()
    }
}

/// completed なのに必要な extras が欠けている返信
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("capture reply is missing '{field}'")]
pub struct MissingCallbackData {
    pub field: &'static str,
}

/// 1 回のキャプチャの終端結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    Success { payload: String, format: String },
    Cancelled,
}

impl ScanOutcome {
    /// 返信を検証して ScanOutcome にする
    pub fn from_reply(reply: &CaptureReply) -> Result<Self, MissingCallbackData> {
        if !reply.completed {
            return Ok(ScanOutcome::Cancelled);
        }
        let payload = reply
            .extras
            .get(EXTRA_SCAN_RESULT)
            .ok_or(MissingCallbackData { field: EXTRA_SCAN_RESULT })?;
        let format = reply
            .extras
            .get(EXTRA_SCAN_RESULT_FORMAT)
            .ok_or(MissingCallbackData { field: EXTRA_SCAN_RESULT_FORMAT })?;
        Ok(ScanOutcome::Success {
            payload: payload.clone(),
            format: format.clone(),
        })
    }
}

/// 結果画面に渡す表示専用ビュー（Success からのみ作られる）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanResultView {
    pub payload: String,
    pub format: String,
}

impl ScanResultView {
    /// 結果画面のテキスト
    pub fn text(&self) -> String {
        format!("result ={}\n\nFormat={}", self.payload, self.format)
    }
}

/// フォーマット名を大文字・アンダースコア区切りに揃える（`QR-Code` → `QR_CODE`）
pub fn normalize_format(label: &str) -> String {
    label
        .trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            c => c.to_ascii_uppercase(),
        })
        .collect()
}
