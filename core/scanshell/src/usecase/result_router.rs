//! Result Router: ScanOutcome を結果画面へ渡すか捨てるかを決める

use crate::domain::{ScanOutcome, ScanResultView};

/// ルーティング先
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// 結果画面へ引き渡す
    Present(ScanResultView),
    /// 何もしない（開始前の画面へ戻る）
    Dismiss,
}

pub fn route(outcome: ScanOutcome) -> Route {
    match outcome {
        ScanOutcome::Success { payload, format } => Route::Present(ScanResultView { payload, format }),
        ScanOutcome::Cancelled => Route::Dismiss,
    }
}
