mod adapter;
mod cli;
mod domain;
mod ports;
mod usecase;
mod wiring;

#[cfg(test)]
mod tests;

use std::process;

use cli::render::{render_history, render_prediction};
use cli::{config_to_command, parse_args, print_completion, Config, ParseOutcome};
use common::domain::AnalysisFocus;
use common::error::Error;
use common::ports::outbound::{now_iso8601, LogLevel, LogRecord};
use domain::BreedidCommand;
use ports::inbound::UseCaseRunner;
use wiring::{wire_breedid, App};

/// Commandをディスパッチする Runner（matchはmainレイヤーに集約）
struct Runner {
    app: App,
}

impl UseCaseRunner for Runner {
    fn run(&self, config: Config) -> Result<i32, Error> {
        let cmd = config_to_command(config);
        let command_name = cmd_name_for_log(&cmd);
        let _ = self.app.logger.log(&LogRecord {
            ts: now_iso8601(),
            level: LogLevel::Info,
            message: "command started".to_string(),
            layer: Some("cli".to_string()),
            kind: Some("lifecycle".to_string()),
            fields: {
                let mut m = std::collections::BTreeMap::new();
                m.insert("command".to_string(), serde_json::json!(command_name));
                Some(m)
            },
        });

        let result = match cmd {
            BreedidCommand::Help => {
                print_help();
                Ok::<i32, Error>(0)
            }
            BreedidCommand::ListProfiles => {
                let (names, default) = self.app.use_case.list_profiles()?;
                for name in &names {
                    if default.as_deref() == Some(name.as_str()) {
                        println!("{} (default)", name);
                    } else {
                        println!("{}", name);
                    }
                }
                Ok(0)
            }
            BreedidCommand::History => {
                let entries = self.app.use_case.history()?;
                if entries.is_empty() {
                    println!("History is empty.");
                } else {
                    print!("{}", render_history(&entries));
                }
                Ok(0)
            }
            BreedidCommand::ClearHistory => {
                self.app.use_case.clear_history()?;
                println!("History cleared.");
                Ok(0)
            }
            BreedidCommand::Show { id } => {
                let prediction = self.app.use_case.select(&id)?;
                print!("{}", render_prediction(&prediction));
                Ok(0)
            }
            BreedidCommand::Identify {
                image,
                profile,
                model,
            } => {
                let image = image.ok_or_else(|| {
                    Error::invalid_argument(
                        "No image provided. Pass a photo of the animal to identify.",
                    )
                })?;
                let prediction =
                    self.app
                        .use_case
                        .identify(&image, profile.as_ref(), model.as_ref())?;
                print!("{}", render_prediction(&prediction));
                Ok(0)
            }
            BreedidCommand::Analyze {
                image,
                focus,
                profile,
                model,
            } => {
                let image = image.ok_or_else(|| {
                    Error::invalid_argument(
                        "No image provided. Pass a photo of the animal to analyze.",
                    )
                })?;
                let focus = AnalysisFocus::from_str(&focus).ok_or_else(|| {
                    Error::invalid_argument(format!(
                        "Unknown focus: '{}'. Available: breed, condition, health",
                        focus
                    ))
                })?;
                let text =
                    self.app
                        .use_case
                        .analyze(&image, focus, profile.as_ref(), model.as_ref())?;
                println!("{}", text);
                Ok(0)
            }
        };

        let code = result.as_ref().copied().unwrap_or(0);
        let _ = self.app.logger.log(&LogRecord {
            ts: now_iso8601(),
            level: LogLevel::Info,
            message: "command finished".to_string(),
            layer: Some("cli".to_string()),
            kind: Some("lifecycle".to_string()),
            fields: {
                let mut m = std::collections::BTreeMap::new();
                m.insert("command".to_string(), serde_json::json!(command_name));
                m.insert("exit_code".to_string(), serde_json::json!(code));
                Some(m)
            },
        });
        if let Err(ref e) = result {
            let _ = self.app.logger.log(&LogRecord {
                ts: now_iso8601(),
                level: LogLevel::Error,
                message: e.to_string(),
                layer: Some("cli".to_string()),
                kind: Some("error".to_string()),
                fields: {
                    let mut m = std::collections::BTreeMap::new();
                    m.insert("error_kind".to_string(), serde_json::json!(e.kind()));
                    Some(m)
                },
            });
        }
        result
    }
}

fn cmd_name_for_log(cmd: &BreedidCommand) -> &'static str {
    match cmd {
        BreedidCommand::Help => "help",
        BreedidCommand::ListProfiles => "list-profiles",
        BreedidCommand::History => "history",
        BreedidCommand::ClearHistory => "clear-history",
        BreedidCommand::Show { .. } => "show",
        BreedidCommand::Identify { .. } => "identify",
        BreedidCommand::Analyze { .. } => "analyze",
    }
}

fn main() {
    let exit_code = match run() {
        Ok(code) => code,
        Err(e) => {
            if e.is_usage() {
                print_usage();
            }
            eprintln!("breedid: {}", e);
            e.exit_code()
        }
    };
    process::exit(exit_code);
}

pub fn run() -> Result<i32, Error> {
    let outcome = parse_args()?;
    let config = match outcome {
        ParseOutcome::Config(c) => c,
        ParseOutcome::GenerateCompletion(shell) => {
            print_completion(shell);
            return Ok(0);
        }
    };
    let app = wire_breedid();
    let runner = Runner { app };
    runner.run(config)
}

fn print_usage() {
    eprintln!("Usage: breedid [options] <image>");
}

fn print_help() {
    println!("Usage: breedid [options] <image>");
    println!("Options:");
    println!("  -h, --help               Show this help message");
    println!("  -L, --list-profiles      List currently available provider profiles (from profiles.json + built-ins)");
    println!("  -H, --history            Show recent predictions (most recent first, up to 10)");
    println!("      --clear-history      Delete all stored predictions");
    println!("      --show <id>          Re-display a stored prediction by id");
    println!("  -f, --focus <focus>      Free-text analysis instead of identification (breed, health, condition)");
    println!("  -p, --profile <profile>  Specify provider profile (openai, mock, etc.). Default: profiles.json default, or openai if not set.");
    println!("  -m, --model <model>      Specify model name (e.g. gpt-4o). Default: profile default from profiles.json");
    println!("      --generate <shell>   Generate shell completion script (bash, zsh, fish)");
    println!();
    println!("Environment:");
    println!("  OPENAI_API_KEY  API key for the hosted vision model (or the api_key_env named in profiles.json).");
    println!("  BREEDID_HOME    Home directory. Profiles: $BREEDID_HOME/profiles.json; history: $BREEDID_HOME/history.json");
    println!("                 If unset, $XDG_CONFIG_HOME/breedid (e.g. ~/.config/breedid) is used.");
    println!();
    println!("Description:");
    println!("  Upload a photo of a cattle or buffalo and get the breed identified by a hosted");
    println!("  multimodal vision model, with confidence and detailed breed information.");
    println!("  Images up to 10MB are accepted (JPG, PNG, WEBP). The last 10 predictions are kept");
    println!("  in a local history.");
    println!();
    println!("Examples:");
    println!("  breedid photos/cow.jpg");
    println!("  breedid -p mock photos/cow.jpg");
    println!("  breedid -f health photos/cow.jpg");
    println!("  breedid --show 0000AbCd");
}
