//! `kanban` command-line entry point.
//!
//! # Responsibility
//! - Drive `kanban_core` services against one SQLite board file.
//! - Print results as JSON on stdout.
//!
//! The caller identity comes from `--owner` / `KANBAN_OWNER`; this binary
//! performs no authentication of its own.

use anyhow::Context;
use clap::{Parser, Subcommand};
use kanban_core::db::open_db;
use kanban_core::{
    core_version, init_logging, CardPayload, CardService, ColumnService, CoreConfig, MovePayload,
    OrderingEngine, OwnerId, ReorderPayload, SqliteCardRepository, SqliteColumnRepository,
};
use log::debug;
use serde::Serialize;
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "kanban", version, about = "Kanban board with dense card ordering")]
struct Cli {
    /// TOML config file (db_path, log_level, log_dir).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Board database file; overrides the config file.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Absolute log directory; overrides the config file.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Acting user.
    #[arg(long, env = "KANBAN_OWNER", global = true)]
    owner: Option<Uuid>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage columns
    #[command(subcommand)]
    Column(ColumnCommand),
    /// Manage cards
    #[command(subcommand)]
    Card(CardCommand),
    /// Print the core library version
    Version,
}

#[derive(Subcommand, Debug)]
enum ColumnCommand {
    Add { title: String },
    List,
    Rename { id: Uuid, title: String },
    Rm { id: Uuid },
}

#[derive(Subcommand, Debug)]
enum CardCommand {
    /// Append a card to the end of a column
    Add {
        column: Uuid,
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        /// RFC 3339 timestamp or YYYY-MM-DD
        #[arg(long)]
        due: Option<String>,
    },
    List {
        column: Uuid,
    },
    Show {
        id: Uuid,
    },
    /// Edit card content; placement is untouched
    Edit {
        id: Uuid,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        /// Empty string clears the due date
        #[arg(long)]
        due: Option<String>,
    },
    Rm {
        id: Uuid,
    },
    /// Move a card: '{"column_id": "...", "position": 0}'
    Move {
        id: Uuid,
        destination: String,
    },
    /// Apply a full arrangement: '[{"card_id": "...", "order": 0}, ...]'
    Reorder {
        column: Uuid,
        assignments: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Version = cli.command {
        println!("{}", core_version());
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => CoreConfig::load(path)?,
        None => CoreConfig::default(),
    };
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if let Some(log_dir) = cli.log_dir {
        config.log_dir = Some(log_dir);
    }
    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, log_dir)
            .map_err(|err| anyhow::anyhow!("failed to start logging: {err}"))?;
    }

    let owner = cli
        .owner
        .context("an acting user is required: pass --owner or set KANBAN_OWNER")?;
    let conn = open_db(&config.db_path)
        .with_context(|| format!("failed to open `{}`", config.db_path.display()))?;
    debug!("event=cli_start module=cli status=ok db={}", config.db_path.display());

    match cli.command {
        Commands::Column(command) => run_column(&conn, command, owner),
        Commands::Card(command) => run_card(&conn, command, owner),
        Commands::Version => Ok(()),
    }
}

fn run_column(
    conn: &rusqlite::Connection,
    command: ColumnCommand,
    owner: OwnerId,
) -> anyhow::Result<()> {
    let service = ColumnService::new(SqliteColumnRepository::try_new(conn)?);
    match command {
        ColumnCommand::Add { title } => print_json(&service.create_column(owner, title)?),
        ColumnCommand::List => print_json(&service.list_columns(owner)?),
        ColumnCommand::Rename { id, title } => {
            print_json(&service.rename_column(id, title, owner)?)
        }
        ColumnCommand::Rm { id } => {
            service.delete_column(id, owner)?;
            Ok(())
        }
    }
}

fn run_card(
    conn: &rusqlite::Connection,
    command: CardCommand,
    owner: OwnerId,
) -> anyhow::Result<()> {
    let engine = OrderingEngine::new(
        SqliteColumnRepository::try_new(conn)?,
        SqliteCardRepository::try_new(conn)?,
    );
    let cards = CardService::new(
        SqliteColumnRepository::try_new(conn)?,
        SqliteCardRepository::try_new(conn)?,
    );

    match command {
        CardCommand::Add {
            column,
            title,
            description,
            priority,
            due,
        } => {
            let fields = CardPayload {
                title: Some(title),
                description,
                priority,
                due_at: due.map(Some),
            }
            .into_fields()?;
            print_json(&engine.append(column, fields, owner)?)
        }
        CardCommand::List { column } => print_json(&cards.list_cards(column, owner)?),
        CardCommand::Show { id } => print_json(&cards.get_card(id, owner)?),
        CardCommand::Edit {
            id,
            title,
            description,
            priority,
            due,
        } => {
            let patch = CardPayload {
                title,
                description,
                priority,
                due_at: due.map(Some),
            }
            .into_patch()?;
            print_json(&cards.update_card(id, patch, owner)?)
        }
        CardCommand::Rm { id } => {
            engine.remove(id, owner)?;
            Ok(())
        }
        CardCommand::Move { id, destination } => {
            let payload = MovePayload::from_json(parse_json(&destination, "move")?)?;
            print_json(&engine.move_card(id, payload.column_id, payload.position, owner)?)
        }
        CardCommand::Reorder {
            column,
            assignments,
        } => {
            let payload = ReorderPayload::from_json(&parse_json(&assignments, "reorder")?)?;
            print_json(&engine.reorder(column, &payload.assignments, owner)?)
        }
    }
}

fn parse_json(raw: &str, what: &str) -> anyhow::Result<serde_json::Value> {
    serde_json::from_str(raw).with_context(|| format!("{what} payload is not valid JSON"))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{parse_json, CardCommand, Cli, Commands};
    use clap::Parser;
    use kanban_core::MovePayload;
    use uuid::Uuid;

    #[test]
    fn move_command_decodes_destination_body() {
        let card = Uuid::new_v4();
        let column = Uuid::new_v4();
        let body = format!(r#"{{"columnId": "{column}", "newPosition": 2}}"#);
        let card_arg = card.to_string();
        let cli =
            Cli::try_parse_from(["kanban", "card", "move", card_arg.as_str(), body.as_str()])
                .unwrap();

        let Commands::Card(CardCommand::Move { id, destination }) = cli.command else {
            panic!("expected card move");
        };
        assert_eq!(id, card);
        let payload = MovePayload::from_json(parse_json(&destination, "move").unwrap()).unwrap();
        assert_eq!(payload.column_id, column);
        assert_eq!(payload.position, 2);
    }

    #[test]
    fn move_command_rejects_malformed_body() {
        assert!(parse_json("{column", "move").is_err());
        let missing_position = parse_json(r#"{"column_id": "x"}"#, "move").unwrap();
        assert!(MovePayload::from_json(missing_position).is_err());
    }
}
