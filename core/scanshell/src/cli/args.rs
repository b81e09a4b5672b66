use std::ffi::OsString;

use crate::domain::CliCommand;
use clap::builder::ArgAction;
use clap::value_parser;
use clap_complete::Shell;
use common::error::Error;

/// CLI から受け取った生の設定（command は文字列のまま保持）
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Config {
    pub help: bool,
    pub home_dir: Option<String>,
    /// 構造化ログを stderr にも出す
    pub verbose: bool,
    /// 結果を JSON で出力する（設定ファイルの output より優先）
    pub json: bool,
    /// コマンド名（None の場合は Shell）
    pub command_name: Option<String>,
    pub command_args: Vec<String>,
}

/// 解析結果: 通常の Config または補完スクリプト生成
#[derive(Debug, Clone)]
pub enum ParseOutcome {
    Config(Config),
    GenerateCompletion(Shell),
}

fn global_args(cmd: clap::Command) -> clap::Command {
    cmd.disable_help_flag(true)
        .arg(
            clap::Arg::new("help")
                .short('h')
                .long("help")
                .help("Print help")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("home-dir")
                .short('d')
                .long("home-dir")
                .value_name("directory")
                .help("Specify a home directory (sets SCANSHELL_HOME for this process)")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Also print structured logs to stderr")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("json")
                .long("json")
                .help("Print scan results as JSON")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("generate")
                .long("generate")
                .value_name("shell")
                .help("Generate shell completion script")
                .value_parser(value_parser!(Shell))
                .num_args(1),
        )
}

fn build_permission_subcommand() -> clap::Command {
    clap::Command::new("permission")
        .about("Show or change the recorded camera permission")
        .subcommand_required(false)
        .subcommand(clap::Command::new("status").about("Show the recorded camera permission (default)"))
        .subcommand(clap::Command::new("grant").about("Grant camera access"))
        .subcommand(clap::Command::new("revoke").about("Revoke camera access"))
}

/// clap のコマンド定義（補完生成でも使う）
pub fn build_clap_command() -> clap::Command {
    global_args(
        clap::Command::new("scanshell")
            .about("Scan-session shell around an external barcode decoder")
            .subcommand_required(false)
            .disable_help_subcommand(true)
            .subcommand(clap::Command::new("shell").about("Start the interactive shell (default)"))
            .subcommand(clap::Command::new("scan").about("Run one scan session and exit"))
            .subcommand(clap::Command::new("settings").about("Show the settings screen"))
            .subcommand(build_permission_subcommand())
            .subcommand(clap::Command::new("help").about("Display this help message")),
    )
}

fn matches_to_config(matches: &clap::ArgMatches) -> Config {
    let help = matches.get_flag("help") || matches.subcommand_matches("help").is_some();
    let home_dir = matches.get_one::<String>("home-dir").cloned();

    let (command_name, command_args) = match matches.subcommand() {
        None => (None, Vec::new()),
        Some(("help", _)) => (None, Vec::new()),
        Some(("shell", _)) => (None, Vec::new()),
        Some(("permission", m)) => {
            let sub = m.subcommand_name().unwrap_or("status");
            (Some("permission".to_string()), vec![sub.to_string()])
        }
        Some((name, _)) => (Some(name.to_string()), vec![]),
    };

    Config {
        help,
        home_dir,
        verbose: matches.get_flag("verbose"),
        json: matches.get_flag("json"),
        command_name,
        command_args,
    }
}

/// 任意の引数列を解析する（先頭はプログラム名）
pub fn parse_args_from<I, T>(args: I) -> Result<ParseOutcome, Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = build_clap_command()
        .try_get_matches_from(args)
        .map_err(|e| Error::invalid_argument(e.to_string()))?;

    if let Some(&shell) = matches.get_one::<Shell>("generate") {
        return Ok(ParseOutcome::GenerateCompletion(shell));
    }

    Ok(ParseOutcome::Config(matches_to_config(&matches)))
}

/// コマンドラインを解析する。補完生成が要求された場合は ParseOutcome::GenerateCompletion を返す。
pub fn parse_args() -> Result<ParseOutcome, Error> {
    parse_args_from(std::env::args_os())
}

/// 補完スクリプトを標準出力に出力する。
pub fn print_completion(shell: Shell) {
    let mut cmd = build_clap_command();
    clap_complete::generate(shell, &mut cmd, "scanshell", &mut std::io::stdout());
}

/// Config を CliCommand に変換する
pub fn config_to_command(config: &Config) -> CliCommand {
    if config.help {
        return CliCommand::Help;
    }
    match &config.command_name {
        Some(name) => CliCommand::parse_with_args(name, &config.command_args),
        None => CliCommand::Shell,
    }
}
