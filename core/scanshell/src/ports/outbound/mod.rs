//! Outbound ポート: アプリが外界（権限サービス・キャプチャエンジン・画面）を使うための trait

pub mod capture_engine;
pub mod console;
pub mod permission_service;
pub mod permission_store;
pub mod prompt_responder;
pub mod result_presenter;
pub mod session_event_sink;
pub mod settings_screen;

pub use capture_engine::CaptureEngine;
pub use console::Console;
pub use permission_service::PermissionService;
pub use permission_store::PermissionStore;
pub use prompt_responder::PromptResponder;
pub use result_presenter::ResultPresenter;
pub use session_event_sink::SessionEventSink;
pub use settings_screen::SettingsScreen;
