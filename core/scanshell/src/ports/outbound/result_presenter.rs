//! 結果画面 Outbound ポート

use common::error::Error;

use crate::domain::ScanResultView;

/// 結果ビューを表示する。表示以外の副作用を持たない。
pub trait ResultPresenter: Send + Sync {
    fn render(&self, view: &ScanResultView) -> Result<(), Error>;
}
