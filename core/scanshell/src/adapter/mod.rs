//! アダプター（外界の I/O を trait で実装）
//!
//! 権限ストアとプロンプト・外部デコーダコマンド・端末への表示・Ctrl+C。

pub mod channel_event_sink;
pub mod command_capture_engine;
pub mod config;
pub mod console;
pub mod file_permission_store;
pub mod settings_screen;
pub mod sigint;
pub mod terminal_input;
pub mod terminal_permission_service;
pub mod terminal_presenter;

pub use channel_event_sink::ChannelEventSink;
pub use command_capture_engine::CommandCaptureEngine;
pub use config::{load_config, OutputFormat};
pub use console::StderrConsole;
pub use file_permission_store::FilePermissionStore;
pub use settings_screen::ConfigSettingsScreen;
pub use sigint::install_interrupt_handler;
pub use terminal_input::spawn_input_reader;
pub use terminal_permission_service::TerminalPermissionService;
pub use terminal_presenter::TerminalPresenter;
