//! CLIレイヤー: 引数解析と結果表示

pub mod args;
pub mod render;

pub use args::{config_to_command, parse_args, print_completion, Config, ParseOutcome};
