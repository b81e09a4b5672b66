//! Ports & Adapters のポート定義
//!
//! - inbound: ドライバ（CLI）がアプリを呼び出すインターフェース
//! - outbound: 権限・キャプチャエンジン・結果表示など外界への依頼

pub mod inbound;
pub mod outbound;
