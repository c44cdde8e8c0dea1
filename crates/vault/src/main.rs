//! `vault` — binary entry point.
//!
//! Startup sequence:
//! 1. Parse the subcommand from argv.
//! 2. Load and validate [`Config`] from environment variables.
//! 3. Initialise the tracing subscriber.
//! 4. Dispatch to the command implementation.
//!
//! Usage errors exit with code 2 and a synopsis on stderr; operational
//! failures exit with code 1.

mod commands;
mod config;
mod keysource;
mod store;
mod telemetry;

use std::env;
use std::process::ExitCode;

use config::Config;

/// Parsed subcommand and its arguments.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Seal { input: String, output: Option<String> },
    Open { input: String, output: Option<String> },
    Store { name: String, input: String },
    Fetch { name: String, output: String },
    List,
}

fn print_usage() {
    eprintln!(
        "Usage:\n  \
         vault seal <input> [output]   seal a payload file ('-' prints base64url)\n  \
         vault open <input> [output]   recover the payload from a token file\n  \
         vault store <name> <input>    seal a payload into the embedding store\n  \
         vault fetch <name> <output>   open a stored record\n  \
         vault list                    list stored record names as JSON\n\n\
         Key: hex in $VAULT_KEY, or a file named by $KEY_FILE (16/24/32 bytes)."
    );
}

/// Parse `args` (without the program name) into a [`Command`].
fn parse_command(args: &[String]) -> Option<Command> {
    match args {
        [cmd, rest @ ..] if cmd == "seal" => match rest {
            [input] => Some(Command::Seal {
                input: input.clone(),
                output: None,
            }),
            [input, output] => Some(Command::Seal {
                input: input.clone(),
                output: Some(output.clone()),
            }),
            _ => None,
        },
        [cmd, rest @ ..] if cmd == "open" => match rest {
            [input] => Some(Command::Open {
                input: input.clone(),
                output: None,
            }),
            [input, output] => Some(Command::Open {
                input: input.clone(),
                output: Some(output.clone()),
            }),
            _ => None,
        },
        [cmd, name, input] if cmd == "store" => Some(Command::Store {
            name: name.clone(),
            input: input.clone(),
        }),
        [cmd, name, output] if cmd == "fetch" => Some(Command::Fetch {
            name: name.clone(),
            output: output.clone(),
        }),
        [cmd] if cmd == "list" => Some(Command::List),
        _ => None,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();
    let Some(command) = parse_command(&args) else {
        print_usage();
        return ExitCode::from(2);
    };

    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            // Telemetry is not yet up; write to stderr directly.
            eprintln!("ERROR: configuration invalid: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = telemetry::init_telemetry(&cfg.log_level) {
        eprintln!("ERROR: {e:#}");
        return ExitCode::FAILURE;
    }

    let result = match &command {
        Command::Seal { input, output } => {
            commands::seal_file(&cfg, input, output.as_deref()).await
        }
        Command::Open { input, output } => {
            commands::open_file(&cfg, input, output.as_deref()).await
        }
        Command::Store { name, input } => commands::store_record(&cfg, name, input).await,
        Command::Fetch { name, output } => commands::fetch_record(&cfg, name, output).await,
        Command::List => commands::list_records(&cfg).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ERROR: {e:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_seal_with_and_without_output() {
        assert_eq!(
            parse_command(&argv(&["seal", "vec.bin"])),
            Some(Command::Seal {
                input: "vec.bin".into(),
                output: None
            })
        );
        assert_eq!(
            parse_command(&argv(&["seal", "vec.bin", "-"])),
            Some(Command::Seal {
                input: "vec.bin".into(),
                output: Some("-".into())
            })
        );
    }

    #[test]
    fn parses_store_fetch_list() {
        assert_eq!(
            parse_command(&argv(&["store", "alice", "vec.bin"])),
            Some(Command::Store {
                name: "alice".into(),
                input: "vec.bin".into()
            })
        );
        assert_eq!(
            parse_command(&argv(&["fetch", "alice", "out.bin"])),
            Some(Command::Fetch {
                name: "alice".into(),
                output: "out.bin".into()
            })
        );
        assert_eq!(parse_command(&argv(&["list"])), Some(Command::List));
    }

    #[test]
    fn rejects_unknown_and_malformed_commands() {
        assert_eq!(parse_command(&argv(&[])), None);
        assert_eq!(parse_command(&argv(&["scan"])), None);
        assert_eq!(parse_command(&argv(&["seal"])), None);
        assert_eq!(parse_command(&argv(&["store", "alice"])), None);
        assert_eq!(parse_command(&argv(&["list", "extra"])), None);
    }
}
