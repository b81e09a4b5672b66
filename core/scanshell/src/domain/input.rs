//! 対話シェルの入力コマンドとイベントループのメッセージ
//!
//! 入力行を enum に落とし、イベントループで match してディスパッチする。

use super::session::SessionEvent;

/// メニューから開ける画面（固定）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    OpenSettings,
}

/// 対話シェルの 1 行コマンド
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputCommand {
    Scan,
    Back,
    Cancel,
    Menu(MenuCommand),
    Help,
    Quit,
    /// 空行
    Empty,
    Unknown(String),
}

impl InputCommand {
    /// 入力行をコマンドに解析する
    pub fn parse(line: &str) -> Self {
        let s = line.trim();
        match s.to_ascii_lowercase().as_str() {
            "" => InputCommand::Empty,
            "scan" | "s" => InputCommand::Scan,
            "back" | "b" => InputCommand::Back,
            "cancel" | "c" => InputCommand::Cancel,
            "settings" => InputCommand::Menu(MenuCommand::OpenSettings),
            "help" | "h" | "?" => InputCommand::Help,
            "quit" | "q" | "exit" => InputCommand::Quit,
            _ => InputCommand::Unknown(s.to_string()),
        }
    }
}

/// イベントループが受け取るメッセージ（1 本の channel に集約）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// 標準入力の 1 行（権限プロンプトの回答かコマンドかはループが決める）
    Line(String),
    Session(SessionEvent),
    /// Ctrl+C
    Interrupt,
    /// 標準入力が閉じた
    InputClosed,
}
