mod bootstrap;
mod commands;
mod terminal_output;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use patente_config::{
    config_dir, config_file_path, load_and_prepare, ConfigOverrides, PatenteConfig, StoreBackend,
};
use patente_logging::init_logger;

use commands::{describe_lookup, render_records, Session, NO_PLATE_MSG, SAVED_MSG, SAVE_FAILED_MSG};
use terminal_output::{note_error, note_info, note_success, note_warn};

#[derive(Parser)]
#[command(name = "patente")]
#[command(about = "Vehicle plate lookups, registrations and photo scans")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ~/.patente/config.yaml)
    #[arg(long, global = true, env = "PATENTE_CONFIG")]
    config: Option<PathBuf>,

    /// Override the configured record store
    #[arg(long, global = true, value_enum)]
    store: Option<StoreArg>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum StoreArg {
    Memory,
    Firestore,
}

impl From<StoreArg> for StoreBackend {
    fn from(arg: StoreArg) -> Self {
        match arg {
            StoreArg::Memory => StoreBackend::Memory,
            StoreArg::Firestore => StoreBackend::Firestore,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Action(Action),
    /// Read commands from stdin against one shared store
    Shell,
}

#[derive(Subcommand)]
enum Action {
    /// Show who a plate belongs to
    Lookup { plate: String },
    /// Register or replace the record for a plate
    Save {
        plate: String,
        user: String,
        /// Mark the plate as linked to the user
        #[arg(long)]
        linked: bool,
    },
    /// List every registered plate
    List,
    /// Read a plate from a photo and look it up
    Scan { image: PathBuf },
}

/// Parser for one shell line, e.g. `save abc123 Alice --linked`.
#[derive(Parser)]
#[command(no_binary_name = true)]
struct ShellLine {
    #[command(subcommand)]
    action: Action,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let path = match &cli.config {
        Some(path) => path.clone(),
        None => config_file_path(&config_dir()),
    };
    let overrides = ConfigOverrides {
        store_backend: cli.store.map(Into::into),
    };
    let config = load_and_prepare(&path, &overrides).await?;

    let _log_guard = start_logging(&config);
    info!(config = %path.display(), store = ?config.store_backend(), "patente starting");

    let session = Session::new(
        bootstrap::build_store(&config)?,
        bootstrap::build_recognizer(&config)?,
    );

    match cli.command {
        Commands::Action(action) => run_action(&session, action).await,
        Commands::Shell => run_shell(&session).await,
    }
}

fn start_logging(config: &PatenteConfig) -> Option<patente_logging::WorkerGuard> {
    let logging = config.logging.clone().unwrap_or_default();
    init_logger(
        logging.dir.as_deref().map(Path::new),
        config.log_level(),
        logging.json.unwrap_or(false),
    )
}

async fn run_action(session: &Session, action: Action) -> Result<()> {
    match action {
        Action::Lookup { plate } => {
            let record = session.lookup(&plate).await?;
            println!("{}", describe_lookup(record.as_ref()));
        }
        Action::Save { plate, user, linked } => {
            let outcome = session.save(&plate, &user, linked).await?;
            if !outcome.is_saved() {
                anyhow::bail!(SAVE_FAILED_MSG);
            }
            note_success(SAVED_MSG);
        }
        Action::List => {
            let records = session.list().await?;
            if records.is_empty() {
                note_info("No hay registros");
            } else {
                print!("{}", render_records(&records));
            }
        }
        Action::Scan { image } => match session.scan(&image).await? {
            Some((plate, record)) => {
                println!("Patente: {plate}");
                println!("{}", describe_lookup(record.as_ref()));
            }
            None => note_warn(NO_PLATE_MSG),
        },
    }
    Ok(())
}

async fn run_shell(session: &Session) -> Result<()> {
    note_info("Comandos: lookup <patente> | save <patente> <usuario> [--linked] | list | scan <imagen> | exit");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "exit" | "quit") {
            break;
        }
        match parse_shell_line(line) {
            Ok(action) => {
                if let Err(e) = run_action(session, action).await {
                    note_error(&e.to_string());
                }
            }
            Err(e) => note_error(&e.to_string()),
        }
    }
    Ok(())
}

/// Split a shell line with POSIX quoting so `save abc123 "Ana Pérez"` keeps
/// the user name as one argument.
fn parse_shell_line(line: &str) -> Result<Action> {
    let words = shlex::split(line).context("Comillas sin cerrar")?;
    Ok(ShellLine::try_parse_from(words)?.action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_user_stays_one_argument() {
        match parse_shell_line(r#"save abc123 "Ana Pérez" --linked"#).unwrap() {
            Action::Save { plate, user, linked } => {
                assert_eq!(plate, "abc123");
                assert_eq!(user, "Ana Pérez");
                assert!(linked);
            }
            _ => panic!("expected a save command"),
        }
    }

    #[test]
    fn single_quotes_are_accepted() {
        assert!(matches!(
            parse_shell_line("save abc123 'Ana Pérez'").unwrap(),
            Action::Save { ref user, linked: false, .. } if user == "Ana Pérez"
        ));
    }

    #[test]
    fn unbalanced_quote_is_an_error() {
        let err = parse_shell_line(r#"save abc123 "Ana Pérez"#).err().unwrap();
        assert_eq!(err.to_string(), "Comillas sin cerrar");
    }

    #[test]
    fn unquoted_extra_words_are_rejected() {
        assert!(parse_shell_line("save abc123 Ana Pérez").is_err());
    }

    #[test]
    fn plain_commands_parse() {
        assert!(matches!(parse_shell_line("list").unwrap(), Action::List));
        assert!(matches!(
            parse_shell_line("lookup ABC123").unwrap(),
            Action::Lookup { ref plate } if plate == "ABC123"
        ));
    }
}
