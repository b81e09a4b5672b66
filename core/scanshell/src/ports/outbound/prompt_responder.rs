//! 端末プロンプトへの回答 Outbound ポート
//!
//! stdin の行はすべてイベントループに届く。権限待ちの間だけループが行をここへ渡す。

pub trait PromptResponder: Send + Sync {
    /// 回答待ちのプロンプトがあれば line を回答として消費し true を返す
    fn answer(&self, line: &str) -> bool;

    /// 入力が閉じた。回答待ちのプロンプトは空の結果（拒否）で解決し、
    /// 以後の要求もすぐ空の結果で解決する
    fn close(&self);
}
