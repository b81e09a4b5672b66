//! scanshell 共通ライブラリ
//!
//! エラー型・構造化ログ・ファイル/環境変数のポートと標準アダプタを提供します。

/// エラーハンドリング
pub mod error;

/// ドメイン型（Newtype）
pub mod domain;

/// Ports & Adapters のポート定義
pub mod ports;

/// 標準アダプタ
pub mod adapter;
