//! アダプター（外界の I/O を trait で実装）
//!
//! 実装は標準実装（Std*）とログ出力先。テストではモックを注入する。

pub mod file_json_log;
pub mod std_env_resolver;
pub mod std_fs;
pub mod stderr_log;

pub use file_json_log::{FileJsonLog, NoopLog, TeeLog};
pub use std_env_resolver::StdEnvResolver;
pub use std_fs::StdFileSystem;
pub use stderr_log::StderrLog;
