//! scanshell コマンドの enum（Command Pattern）
//!
//! 引数解析の結果を enum に落とし、main で match してディスパッチする。

use super::permission::PermissionStatus;

/// scanshell のサブコマンド
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    Help,
    /// 対話シェル（コマンド未指定時）
    Shell,
    /// 1 セッションだけ実行して終了
    Scan,
    /// 設定画面を表示
    Settings,
    /// 権限ストアの状態表示（permission status）
    PermissionStatus,
    /// 権限ストアを書き換える（permission grant / revoke）
    PermissionSet(PermissionStatus),
    Unknown(String),
}

impl CliCommand {
    /// コマンド名と引数から解析する（permission は args を使用）
    pub fn parse_with_args(name: &str, args: &[String]) -> Self {
        if name == "permission" {
            return match args.first().map(|s| s.as_str()) {
                Some("status") | None => CliCommand::PermissionStatus,
                Some("grant") => CliCommand::PermissionSet(PermissionStatus::Granted),
                Some("revoke") => CliCommand::PermissionSet(PermissionStatus::Denied),
                Some(sub) => CliCommand::Unknown(format!("permission {}", sub)),
            };
        }
        Self::parse(name)
    }

    /// 文字列を解析する（サブコマンドなし）
    pub fn parse(s: &str) -> Self {
        match s {
            "help" => CliCommand::Help,
            "shell" => CliCommand::Shell,
            "scan" => CliCommand::Scan,
            "settings" => CliCommand::Settings,
            "permission" => CliCommand::PermissionStatus,
            _ => CliCommand::Unknown(s.to_string()),
        }
    }
}
