use crate::domain::BreedidCommand;
use clap::builder::ArgAction;
use clap::value_parser;
use clap_complete::Shell;
use common::domain::{ModelName, ProviderName};
use common::error::Error;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub help: bool,
    /// -L / --list-profiles: 現在有効なプロファイル一覧を表示
    pub list_profiles: bool,
    /// -H / --history: 保存済み予測の一覧を表示
    pub history: bool,
    /// --clear-history: 履歴と永続化ファイルを削除
    pub clear_history: bool,
    /// --show <id>: 保存済み予測を再表示
    pub show: Option<String>,
    /// -f / --focus: 自由記述分析のフォーカス（breed / health / condition）
    pub focus: Option<String>,
    pub profile: Option<ProviderName>,
    pub model: Option<ModelName>,
    /// 判定する画像（ローカルパスまたはhttp(s) URL）
    pub image: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            help: false,
            list_profiles: false,
            history: false,
            clear_history: false,
            show: None,
            focus: None,
            profile: None,
            model: None,
            image: None,
        }
    }
}

/// 解析結果: 通常のConfig / 補完スクリプト生成
#[derive(Debug, Clone)]
pub enum ParseOutcome {
    Config(Config),
    GenerateCompletion(Shell),
}

fn build_clap_command() -> clap::Command {
    clap::Command::new("breedid")
        .about("Identify cattle and buffalo breeds from a photo using a hosted vision model")
        .disable_help_flag(true)
        .arg(
            clap::Arg::new("help")
                .short('h')
                .long("help")
                .help("Show this help message")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("list-profiles")
                .short('L')
                .long("list-profiles")
                .help("List currently available provider profiles")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("history")
                .short('H')
                .long("history")
                .help("Show recent predictions (most recent first, up to 10)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("clear-history")
                .long("clear-history")
                .help("Delete all stored predictions")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("show")
                .long("show")
                .value_name("id")
                .help("Re-display a stored prediction by id")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("focus")
                .short('f')
                .long("focus")
                .value_name("focus")
                .help("Free-text analysis instead of identification (breed, health, condition)")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("profile")
                .short('p')
                .long("profile")
                .value_name("profile")
                .help("Specify provider profile (openai, mock, etc.)")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("model")
                .short('m')
                .long("model")
                .value_name("model")
                .help("Specify model name (e.g. gpt-4o)")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("generate")
                .long("generate")
                .value_name("shell")
                .help("Generate shell completion script")
                .value_parser(value_parser!(Shell))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("image")
                .index(1)
                .help("Image to analyze: a local file path or an http(s) URL")
                .num_args(0..=1),
        )
}

fn matches_to_config(matches: &clap::ArgMatches) -> Config {
    Config {
        help: matches.get_flag("help"),
        list_profiles: matches.get_flag("list-profiles"),
        history: matches.get_flag("history"),
        clear_history: matches.get_flag("clear-history"),
        show: matches.get_one::<String>("show").cloned(),
        focus: matches.get_one::<String>("focus").cloned(),
        profile: matches
            .get_one::<String>("profile")
            .map(|s| ProviderName::new(s.clone())),
        model: matches
            .get_one::<String>("model")
            .map(|s| ModelName::new(s.clone())),
        image: matches.get_one::<String>("image").cloned(),
    }
}

/// コマンドラインを解析する。補完生成が要求された場合はParseOutcome::GenerateCompletionを返す。
pub fn parse_args() -> Result<ParseOutcome, Error> {
    let cmd = build_clap_command();
    let matches = cmd
        .try_get_matches()
        .map_err(|e| Error::invalid_argument(e.to_string()))?;

    if let Some(&shell) = matches.get_one::<Shell>("generate") {
        return Ok(ParseOutcome::GenerateCompletion(shell));
    }

    Ok(ParseOutcome::Config(matches_to_config(&matches)))
}

/// テスト用: 引数スライスから解析する
#[allow(dead_code)]
pub fn parse_args_from(args: &[String]) -> Result<Config, Error> {
    let cmd = build_clap_command();
    let matches = cmd
        .try_get_matches_from(args)
        .map_err(|e| Error::invalid_argument(e.to_string()))?;
    Ok(matches_to_config(&matches))
}

/// Configをコマンドに正規化する（フラグの優先順はここに集約）
pub fn config_to_command(config: Config) -> BreedidCommand {
    if config.help {
        return BreedidCommand::Help;
    }

    if config.list_profiles {
        return BreedidCommand::ListProfiles;
    }

    if config.clear_history {
        return BreedidCommand::ClearHistory;
    }

    if let Some(id) = config.show {
        return BreedidCommand::Show { id };
    }

    if config.history {
        return BreedidCommand::History;
    }

    if let Some(focus) = config.focus {
        return BreedidCommand::Analyze {
            image: config.image,
            focus,
            profile: config.profile,
            model: config.model,
        };
    }

    BreedidCommand::Identify {
        image: config.image,
        profile: config.profile,
        model: config.model,
    }
}

/// 補完スクリプトを標準出力に出力する。
pub fn print_completion(shell: Shell) {
    emit_fallback_completion(shell);
}

fn emit_fallback_completion(shell: Shell) {
    let opts = "-h --help -L --list-profiles -H --history --clear-history --show -f --focus -p --profile -m --model --generate";
    match shell {
        Shell::Bash => {
            println!(
                r#"# Fallback completion for breedid
_breedid() {{
  local cur="${{COMP_WORDS[COMP_CWORD]}}"
  COMPREPLY=($(compgen -W "{opts}" -- "$cur"))
}}
complete -o default -F _breedid breedid
"#,
                opts = opts
            );
        }
        Shell::Zsh => {
            println!(
                r#"# Fallback completion for breedid
#compdef breedid
local -a reply
reply=({opts})
_describe 'breedid' reply
"#,
                opts = opts
            );
        }
        Shell::Fish => {
            println!(
                r#"# Fallback completion for breedid
complete -c breedid -l help -s h -d "Show help"
complete -c breedid -l list-profiles -s L -d "List profiles"
complete -c breedid -l history -s H -d "Show recent predictions"
complete -c breedid -l clear-history -d "Delete stored predictions"
complete -c breedid -l show -d "Re-display a stored prediction" -r
complete -c breedid -l focus -s f -d "Analysis focus" -r -a "breed health condition"
complete -c breedid -l profile -s p -d "Provider profile" -r
complete -c breedid -l model -s m -d "Model name" -r
complete -c breedid -l generate -d "Generate completion script" -r -a "bash zsh fish"
"#
            );
        }
        _ => {
            eprintln!("Completion for {:?} is not supported", shell);
        }
    }
}
