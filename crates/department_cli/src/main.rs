//! Command-line front end for the departments store.
//!
//! # Responsibility
//! - Resolve database path and logging settings from flags or environment.
//! - Map one subcommand onto one store operation and print the result.

use clap::{Args, Parser, Subcommand};
use department_core::db::open_db;
use department_core::{
    default_log_level, init_logging, DepartmentId, DepartmentRef, DepartmentRepository,
    DepartmentStore,
};
use log::info;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "departments")]
#[command(about = "Manage departments stored in a local SQLite file", version)]
struct Cli {
    /// SQLite database file.
    #[arg(long, env = "DEPARTMENTS_DB", default_value = "departments.sqlite3")]
    db: PathBuf,

    /// trace|debug|info|warn|error (`warning` is accepted for warn); defaults by build mode.
    #[arg(long, env = "DEPARTMENTS_LOG_LEVEL")]
    log_level: Option<String>,

    /// Absolute directory for rolling log files. Logging is off when unset.
    #[arg(long, env = "DEPARTMENTS_LOG_DIR")]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create the departments table if missing
    Init,
    /// Drop the departments table
    Drop,
    /// Insert a new department
    Create { name: String, location: String },
    /// List every department in table order
    List(OutputArgs),
    /// Show the department with the given id
    Get {
        id: DepartmentId,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Show the first department with the given name
    Find {
        name: String,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Change name and/or location of an existing department
    Update {
        id: DepartmentId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        location: Option<String>,
    },
    /// Delete the department with the given id
    Delete { id: DepartmentId },
}

#[derive(Debug, Args)]
struct OutputArgs {
    /// Print JSON instead of the display form
    #[arg(long)]
    json: bool,
}

type CliResult<T> = Result<T, Box<dyn Error>>;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CliResult<ExitCode> {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir)?;
    }

    let conn = open_db(&cli.db)?;
    let mut store = DepartmentStore::new(&conn);
    info!(
        "event=cli_command module=cli status=start command={}",
        command_name(&cli.command)
    );

    match cli.command {
        Commands::Init => store.create_table()?,
        Commands::Drop => store.drop_table()?,
        Commands::Create { name, location } => {
            let department = store.create(&name, &location)?;
            println!("{}", department.borrow());
        }
        Commands::List(output) => {
            for department in store.get_all()? {
                print_department(&department, &output)?;
            }
        }
        Commands::Get { id, output } => {
            let found = store.find_by_id(id)?;
            return print_found(found, &output, &format!("no department with id {id}"));
        }
        Commands::Find { name, output } => {
            let found = store.find_by_name(&name)?;
            return print_found(found, &output, &format!("no department named `{name}`"));
        }
        Commands::Update { id, name, location } => {
            let Some(department) = store.find_by_id(id)? else {
                eprintln!("no department with id {id}");
                return Ok(ExitCode::FAILURE);
            };
            {
                let mut current = department.borrow_mut();
                if let Some(name) = name {
                    current.name = name;
                }
                if let Some(location) = location {
                    current.location = location;
                }
            }
            store.update(&department)?;
            println!("{}", department.borrow());
        }
        Commands::Delete { id } => {
            let Some(department) = store.find_by_id(id)? else {
                eprintln!("no department with id {id}");
                return Ok(ExitCode::FAILURE);
            };
            store.delete(&department)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Init => "init",
        Commands::Drop => "drop",
        Commands::Create { .. } => "create",
        Commands::List(_) => "list",
        Commands::Get { .. } => "get",
        Commands::Find { .. } => "find",
        Commands::Update { .. } => "update",
        Commands::Delete { .. } => "delete",
    }
}

fn print_found(
    found: Option<DepartmentRef>,
    output: &OutputArgs,
    missing: &str,
) -> CliResult<ExitCode> {
    match found {
        Some(department) => {
            print_department(&department, output)?;
            Ok(ExitCode::SUCCESS)
        }
        None => {
            eprintln!("{missing}");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn print_department(department: &DepartmentRef, output: &OutputArgs) -> CliResult<()> {
    let department = department.borrow();
    if output.json {
        println!("{}", serde_json::to_string(&*department)?);
    } else {
        println!("{department}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{run, Cli, Commands};
    use clap::{CommandFactory, Parser};
    use department_core::db::open_db;
    use department_core::{DepartmentRepository, DepartmentStore};
    use std::process::ExitCode;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn log_level_help_lists_warning_alias() {
        let command = Cli::command();
        let help = command
            .get_arguments()
            .find(|arg| arg.get_id() == "log_level")
            .and_then(|arg| arg.get_help())
            .map(|help| help.to_string())
            .unwrap();
        assert!(help.contains("warning"), "unexpected help: {help}");
    }

    #[test]
    fn parses_update_with_partial_fields() {
        let cli = Cli::try_parse_from([
            "departments",
            "--db",
            "/tmp/departments.sqlite3",
            "update",
            "3",
            "--location",
            "Building B",
        ])
        .unwrap();

        match cli.command {
            Commands::Update { id, name, location } => {
                assert_eq!(id, 3);
                assert_eq!(name, None);
                assert_eq!(location.as_deref(), Some("Building B"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_find_with_json_output() {
        let cli = Cli::try_parse_from(["departments", "find", "Payroll", "--json"]).unwrap();

        match cli.command {
            Commands::Find { name, output } => {
                assert_eq!(name, "Payroll");
                assert!(output.json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn run_applies_commands_to_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("departments.sqlite3");
        let db = db.to_str().unwrap();
        let invoke = |args: &[&str]| {
            let mut argv = vec!["departments", "--db", db];
            argv.extend_from_slice(args);
            run(Cli::try_parse_from(argv).unwrap()).unwrap()
        };

        assert_eq!(invoke(&["init"]), ExitCode::SUCCESS);
        assert_eq!(invoke(&["create", "Payroll", "Building A"]), ExitCode::SUCCESS);
        assert_eq!(invoke(&["update", "1", "--name", "Accounting"]), ExitCode::SUCCESS);
        assert_eq!(invoke(&["get", "2"]), ExitCode::FAILURE);
        assert_eq!(invoke(&["delete", "2"]), ExitCode::FAILURE);

        let conn = open_db(db).unwrap();
        let mut store = DepartmentStore::new(&conn);
        let all = store.get_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].borrow().name, "Accounting");
        assert_eq!(all[0].borrow().location, "Building A");

        assert_eq!(invoke(&["delete", "1"]), ExitCode::SUCCESS);
        assert!(store.find_by_id(1).unwrap().is_none());
    }
}
