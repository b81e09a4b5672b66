//! 配線: 標準アダプタで UseCase を組み立てる

use std::sync::Arc;

use common::adapter::{FileJsonLog, NoopLog, StdEnvResolver, StdFileSystem, StderrLog, TeeLog};
use common::domain::HomeDir;
use common::error::Error;
use common::ports::outbound::{EnvResolver, FileSystem, Log, LogLevel};

use crate::adapter::{
    load_config, CommandCaptureEngine, ConfigSettingsScreen, FilePermissionStore, OutputFormat,
    StderrConsole, TerminalPermissionService, TerminalPresenter,
};
use crate::ports::outbound::{PermissionStore, SettingsScreen};
use crate::usecase::{PermissionUseCase, ScanShellUseCase};

/// 配線オプション（CLI フラグ由来）
#[derive(Debug, Clone, Copy, Default)]
pub struct WireOptions {
    pub verbose: bool,
    pub json: bool,
}

/// 配線で組み立てたユースケース群（main の CliCommand ディスパッチで利用）
pub struct App {
    pub scan_use_case: ScanShellUseCase,
    pub permission_use_case: PermissionUseCase,
    pub logger: Arc<dyn Log>,
}

fn wire_logger(env_resolver: &dyn EnvResolver, fs: &Arc<dyn FileSystem>, verbose: bool) -> Arc<dyn Log> {
    let file_log: Arc<dyn Log> = env_resolver
        .resolve_log_file_path()
        .map(|path| Arc::new(FileJsonLog::new(Arc::clone(fs), path)) as Arc<dyn Log>)
        .unwrap_or_else(|_| Arc::new(NoopLog));
    if verbose {
        Arc::new(TeeLog::new(vec![file_log, Arc::new(StderrLog::new(LogLevel::Debug))]))
    } else {
        file_log
    }
}

/// 配線: 標準アダプタで App を組み立てる
///
/// ホームディレクトリは SCANSHELL_HOME（-d 指定時は main が設定済み）から解決する。
pub fn wire_scanshell(options: WireOptions) -> Result<App, Error> {
    let fs: Arc<dyn FileSystem> = Arc::new(StdFileSystem);
    let env_resolver = StdEnvResolver;
    let home_dir: HomeDir = env_resolver.resolve_home_dir()?;
    let logger = wire_logger(&env_resolver, &fs, options.verbose);

    let config = load_config(&fs, &home_dir)?;
    let output = if options.json {
        OutputFormat::Json
    } else {
        config.output
    };

    let store: Arc<dyn PermissionStore> =
        Arc::new(FilePermissionStore::new(Arc::clone(&fs), home_dir.permission_file()));
    let permission_service = Arc::new(TerminalPermissionService::new(
        Arc::clone(&store),
        Box::new(std::io::stderr()),
        Arc::clone(&logger),
    ));
    let engine = Arc::new(CommandCaptureEngine::from_config(&config.capture, Arc::clone(&logger))?);
    let presenter = Arc::new(TerminalPresenter::stdout(output));
    let settings: Arc<dyn SettingsScreen> = Arc::new(ConfigSettingsScreen::new(
        home_dir.config_file(),
        home_dir.permission_file(),
        config,
        Arc::clone(&store),
        Box::new(std::io::stdout()),
    ));

    // 同じサービスが要求（PermissionService）と回答（PromptResponder）の両方を受け持つ
    let scan_use_case = ScanShellUseCase::new(
        permission_service.clone(),
        permission_service,
        engine,
        presenter,
        settings,
        Arc::new(StderrConsole),
        Arc::clone(&logger),
    );
    let permission_use_case = PermissionUseCase::new(store);

    Ok(App {
        scan_use_case,
        permission_use_case,
        logger,
    })
}
