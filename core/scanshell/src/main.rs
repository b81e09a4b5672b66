mod adapter;
mod cli;
mod domain;
mod ports;
mod usecase;
mod wiring;

#[cfg(test)]
mod tests;

use std::process;
use std::sync::mpsc;
use std::sync::Arc;

use cli::{config_to_command, parse_args, print_completion, Config, ParseOutcome};
use common::error::Error;
use common::ports::outbound::{LogLevel, LogRecord};
use domain::{AppEvent, CliCommand};
use ports::inbound::UseCaseRunner;
use ports::outbound::SessionEventSink;
use usecase::LoopMode;
use wiring::{wire_scanshell, App, WireOptions};

/// CliCommand をディスパッチする Runner（match は main レイヤーに集約）
struct Runner {
    app: App,
}

impl UseCaseRunner for Runner {
    fn run(&self, config: Config) -> Result<i32, Error> {
        let command = config_to_command(&config);
        let _ = self.app.logger.log(
            &LogRecord::new(LogLevel::Info, "command started")
                .layer("cli")
                .kind("lifecycle")
                .field("command", format!("{:?}", command)),
        );

        match command {
            CliCommand::Help => {
                print_help();
                Ok(0)
            }
            CliCommand::Shell => self.run_loop(LoopMode::Interactive),
            CliCommand::Scan => self.run_loop(LoopMode::Once),
            CliCommand::Settings => self.app.scan_use_case.open_settings(),
            CliCommand::PermissionStatus => {
                let status = self.app.permission_use_case.status()?;
                println!("camera: {}", status.map(|s| s.as_str()).unwrap_or("not asked"));
                Ok(0)
            }
            CliCommand::PermissionSet(status) => {
                self.app.permission_use_case.set(status)?;
                println!("camera: {}", status.as_str());
                Ok(0)
            }
            CliCommand::Unknown(name) => Err(Error::invalid_argument(format!(
                "Unknown command '{}'.",
                name
            ))),
        }
    }
}

impl Runner {
    /// channel・Ctrl+C・入力スレッドを用意してイベントループを回す
    fn run_loop(&self, mode: LoopMode) -> Result<i32, Error> {
        let (tx, rx) = mpsc::channel::<AppEvent>();
        let sink: Arc<dyn SessionEventSink> = Arc::new(adapter::ChannelEventSink::new(tx.clone()));

        if let Err(e) = adapter::install_interrupt_handler(tx.clone()) {
            let _ = self.app.logger.log(
                &LogRecord::new(LogLevel::Warn, "Ctrl+C handler not installed")
                    .layer("cli")
                    .kind("lifecycle")
                    .field("error", e.to_string()),
            );
        }
        adapter::spawn_input_reader(tx);

        self.app.scan_use_case.run(mode, &rx, sink)
    }
}

fn main() {
    let exit_code = match run() {
        Ok(code) => code,
        Err(e) => {
            if e.is_usage() {
                print_usage();
            }
            eprintln!("scanshell: {}", e);
            e.exit_code()
        }
    };
    process::exit(exit_code);
}

fn print_usage() {
    eprintln!("Usage: scanshell [-h] [-d|--home-dir directory] [-v] [--json] [<command> [args...]]");
}

fn print_help() {
    println!("Usage: scanshell [-h] [-d|--home-dir directory] [-v] [--json] [<command> [args...]]");
    println!("  -h, --help            Display this help message.");
    println!("  -d, --home-dir        Specify a home directory (sets SCANSHELL_HOME for this process).");
    println!("  -v, --verbose         Also print structured logs to stderr.");
    println!("  --json                Print scan results as JSON.");
    println!("  --generate <shell>    Generate shell completion script (bash, zsh, fish).");
    println!("  <command>             Command to execute. Omit to start the interactive shell.");
    println!();
    println!("Commands:");
    println!("  shell                       Interactive shell: scan, back, cancel, settings, help, quit.");
    println!("  scan                        Run one scan session (exit 0 result, 1 cancelled, 77 permission denied).");
    println!("  settings                    Show the settings screen.");
    println!("  permission [status|grant|revoke]");
    println!("                              Show or change the recorded camera permission.");
    println!("  help                        Display this help message.");
    println!();
    println!("Environment:");
    println!("  SCANSHELL_HOME      Home directory (config/, state/, log/). Default: $XDG_CONFIG_HOME/scanshell or ~/.config/scanshell.");
    println!("  SCANSHELL_LOG_FILE  Structured log file. Default: <home>/log/scanshell.jsonl.");
}

fn run() -> Result<i32, Error> {
    let config = match parse_args()? {
        ParseOutcome::GenerateCompletion(shell) => {
            print_completion(shell);
            return Ok(0);
        }
        ParseOutcome::Config(c) => c,
    };

    if let Some(ref h) = config.home_dir {
        std::env::set_var("SCANSHELL_HOME", h);
    }
    // help は設定ファイルが壊れていても表示する
    if config_to_command(&config) == CliCommand::Help {
        print_help();
        return Ok(0);
    }

    let app = wire_scanshell(WireOptions {
        verbose: config.verbose,
        json: config.json,
    })?;
    let runner = Runner { app };
    runner.run(config)
}
