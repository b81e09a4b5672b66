pub(crate) mod app;
pub(crate) mod capture_launcher;
pub(crate) mod permission;
pub(crate) mod permission_gate;
pub(crate) mod result_router;
pub(crate) mod session_controller;

pub(crate) use app::{LoopMode, ScanShellUseCase};
pub(crate) use permission::PermissionUseCase;
