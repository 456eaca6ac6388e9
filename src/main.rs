//! Gripe CLI - complaint tracking for students and staff.

use clap::Parser;
use gripe::action_log;
use gripe::cli::{Cli, Commands, ConfigCommands, ProfileCommands, SystemCommands};
use gripe::commands::{self, Output};
use gripe::storage;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

fn main() {
    let cli = Cli::parse();
    let human = cli.human_readable;

    // Determine data directory: --data-dir flag > GRIPE_DATA_DIR env > XDG default
    let data_dir = resolve_data_dir(cli.data_dir, human);

    // Serialize command for logging
    let (cmd_name, args_json) = serialize_command(&cli.command);

    // Start timing
    let start = Instant::now();

    // Execute command
    let result = run_command(cli.command, &data_dir, human);

    // Calculate duration
    let duration = start.elapsed().as_millis() as u64;

    // Determine success/error
    let (success, error) = match &result {
        Ok(_) => (true, None),
        Err(e) => (false, Some(e.to_string())),
    };

    // Log the action (silently fails if logging is disabled or encounters errors)
    let _ = action_log::log_action(&data_dir, &cmd_name, args_json, success, error, duration);

    // Handle result
    if let Err(e) = result {
        if human {
            eprintln!("Error: {}", e);
        } else {
            eprintln!("{}", serde_json::json!({ "error": e.to_string() }));
        }
        process::exit(1);
    }
}

/// Resolve the data directory from the explicit flag (clap also fills it
/// from GRIPE_DATA_DIR) or the XDG default.
fn resolve_data_dir(explicit: Option<PathBuf>, human: bool) -> PathBuf {
    match explicit {
        Some(path) => path,
        None => match storage::default_data_dir() {
            Ok(path) => path,
            Err(e) => {
                if human {
                    eprintln!("Error: {}", e);
                } else {
                    eprintln!("{}", serde_json::json!({ "error": e.to_string() }));
                }
                process::exit(1);
            }
        },
    }
}

/// Build the command name and argument JSON recorded in the action log.
fn serialize_command(command: &Option<Commands>) -> (String, serde_json::Value) {
    match command {
        Some(Commands::Submit {
            title,
            category,
            description,
            actor,
        }) => (
            "submit".to_string(),
            serde_json::json!({
                "title": title,
                "category": category,
                "description": description,
                "actor": actor,
            }),
        ),
        Some(Commands::Mine { actor }) => {
            ("mine".to_string(), serde_json::json!({ "actor": actor }))
        }
        Some(Commands::List { status, category }) => (
            "list".to_string(),
            serde_json::json!({ "status": status, "category": category }),
        ),
        Some(Commands::Show { id }) => ("show".to_string(), serde_json::json!({ "id": id })),
        Some(Commands::Status { id, status, actor }) => (
            "status".to_string(),
            serde_json::json!({ "id": id, "status": status, "actor": actor }),
        ),
        Some(Commands::Respond {
            id,
            message,
            status,
            actor,
        }) => (
            "respond".to_string(),
            serde_json::json!({
                "id": id,
                "message": message,
                "status": status,
                "actor": actor,
            }),
        ),
        Some(Commands::Summary) => ("summary".to_string(), serde_json::json!({})),
        Some(Commands::Profile { command }) => match command {
            ProfileCommands::Register {
                full_name,
                email,
                role,
            } => (
                "profile register".to_string(),
                serde_json::json!({ "full_name": full_name, "email": email, "role": role }),
            ),
            ProfileCommands::List { role } => (
                "profile list".to_string(),
                serde_json::json!({ "role": role }),
            ),
            ProfileCommands::Show { id } => (
                "profile show".to_string(),
                serde_json::json!({ "id": id }),
            ),
        },
        Some(Commands::Config { command }) => match command {
            ConfigCommands::Get { key } => (
                "config get".to_string(),
                serde_json::json!({ "key": key }),
            ),
            ConfigCommands::Set { key, value } => (
                "config set".to_string(),
                serde_json::json!({ "key": key, "value": value }),
            ),
            ConfigCommands::List => ("config list".to_string(), serde_json::json!({})),
        },
        Some(Commands::Log { filter }) => {
            ("log".to_string(), serde_json::json!({ "filter": filter }))
        }
        Some(Commands::System { command }) => match command {
            SystemCommands::Init => ("system init".to_string(), serde_json::json!({})),
            SystemCommands::Info => ("system info".to_string(), serde_json::json!({})),
            SystemCommands::Rebuild => ("system rebuild".to_string(), serde_json::json!({})),
        },
        None => ("help".to_string(), serde_json::json!({})),
    }
}

fn run_command(
    command: Option<Commands>,
    data_dir: &Path,
    human: bool,
) -> Result<(), gripe::Error> {
    match command {
        Some(Commands::Submit {
            title,
            category,
            description,
            actor,
        }) => {
            let result = commands::complaint_submit(
                data_dir,
                actor.as_deref(),
                &title,
                &category,
                &description,
            )?;
            output(&result, human);
        }

        Some(Commands::Mine { actor }) => {
            let result = commands::complaint_mine(data_dir, actor.as_deref())?;
            output(&result, human);
        }

        Some(Commands::List { status, category }) => {
            let result =
                commands::complaint_list(data_dir, status.as_deref(), category.as_deref())?;
            output(&result, human);
        }

        Some(Commands::Show { id }) => {
            let result = commands::complaint_show(data_dir, &id)?;
            output(&result, human);
        }

        Some(Commands::Status { id, status, actor }) => {
            let result =
                commands::complaint_set_status(data_dir, &id, &status, actor.as_deref())?;
            output(&result, human);
        }

        Some(Commands::Respond {
            id,
            message,
            status,
            actor,
        }) => {
            let result = commands::complaint_respond(
                data_dir,
                &id,
                actor.as_deref(),
                &message,
                status.as_deref(),
            )?;
            output(&result, human);
        }

        Some(Commands::Summary) => {
            let result = commands::complaint_summary(data_dir)?;
            output(&result, human);
        }

        Some(Commands::Profile { command }) => match command {
            ProfileCommands::Register {
                full_name,
                email,
                role,
            } => {
                let result = commands::profile_register(data_dir, &full_name, &email, &role)?;
                output(&result, human);
            }
            ProfileCommands::List { role } => {
                let result = commands::profile_list(data_dir, role.as_deref())?;
                output(&result, human);
            }
            ProfileCommands::Show { id } => {
                let result = commands::profile_show(data_dir, &id)?;
                output(&result, human);
            }
        },

        Some(Commands::Config { command }) => match command {
            ConfigCommands::Get { key } => {
                let result = commands::config_get(data_dir, &key)?;
                output(&result, human);
            }
            ConfigCommands::Set { key, value } => {
                let result = commands::config_set(data_dir, &key, &value)?;
                output(&result, human);
            }
            ConfigCommands::List => {
                let result = commands::config_list(data_dir)?;
                output(&result, human);
            }
        },

        Some(Commands::Log { filter }) => {
            let result = commands::log_list(data_dir, filter.as_deref())?;
            output(&result, human);
        }

        Some(Commands::System { command }) => match command {
            SystemCommands::Init => {
                let result = commands::system_init(data_dir)?;
                output(&result, human);
            }
            SystemCommands::Info => {
                let result = commands::system_info(data_dir)?;
                output(&result, human);
            }
            SystemCommands::Rebuild => {
                let result = commands::system_rebuild(data_dir)?;
                output(&result, human);
            }
        },

        None => {
            use clap::CommandFactory;
            let _ = Cli::command().print_help();
        }
    }

    Ok(())
}

/// Print a command result in the requested format.
fn output<T: Output>(result: &T, human: bool) {
    if human {
        println!("{}", result.to_human());
    } else {
        println!("{}", result.to_json());
    }
}
