//! ドメイン型（enum、Newtype、ルール）

pub mod command;
pub mod input;
pub mod outcome;
pub mod permission;
pub mod session;

pub use command::CliCommand;
pub use input::{AppEvent, InputCommand, MenuCommand};
pub use outcome::{normalize_format, CaptureReply, MissingCallbackData, ScanOutcome, ScanResultView};
pub use permission::{Capability, GateCheck, PermissionReply, PermissionState, PermissionStatus};
pub use session::{SessionEnd, SessionEvent, SessionState, SessionTicket, Step};
