use std::{fs, path::PathBuf, sync::Arc};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    ElectionBoard, ElectionDraft, ElectionSyncController, HttpElectionService, ListScope,
};
use shared::domain::ElectionId;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod render;

use config::load_settings;
use render::render_snapshot;

#[derive(Parser, Debug)]
#[command(name = "voter", about = "Create, inspect and vote in ledger-backed elections")]
struct Args {
    /// Config file (defaults to ./voter.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    service_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the most recent elections with their tallies.
    List {
        /// Only elections created by this account.
        #[arg(long)]
        account: Option<String>,
    },
    Show {
        election_id: String,
    },
    Create {
        #[arg(long)]
        name: String,
        #[arg(long = "candidate")]
        candidates: Vec<String>,
        /// File with one candidate per line.
        #[arg(long)]
        candidates_file: Option<PathBuf>,
        #[arg(long)]
        multiple: bool,
    },
    Vote {
        election_id: String,
        #[arg(required = true)]
        options: Vec<String>,
    },
    Revoke {
        election_id: String,
        #[arg(required = true)]
        options: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(url) = args.service_url {
        settings.service_url = url;
    }
    if let Command::List {
        account: Some(account),
    } = &args.command
    {
        settings.account = Some(account.clone());
    }
    settings.validate()?;
    info!(service_url = %settings.service_url, "using election service");

    let service = Arc::new(HttpElectionService::with_timeout(
        &settings.service_url,
        settings.request_timeout(),
    )?);
    let board = ElectionBoard::new(service, settings.list_scope());

    match args.command {
        Command::List { .. } => {
            board.open().await?;
            print_board(&board).await;
        }
        Command::Show { election_id } => {
            let controller = open_election(&board, &election_id).await?;
            print!("{}", render_snapshot(&controller.snapshot().await));
        }
        Command::Create {
            name,
            candidates,
            candidates_file,
            multiple,
        } => {
            let mut candidates_text = candidates.join("\n");
            if let Some(path) = candidates_file {
                let raw = fs::read_to_string(&path)
                    .with_context(|| format!("failed to read '{}'", path.display()))?;
                candidates_text.push('\n');
                candidates_text.push_str(&raw);
            }
            let mut draft = ElectionDraft::new(name, candidates_text, multiple);
            let election_id = board.create(&mut draft).await?;
            println!("Created election #{election_id}");
            print_board(&board).await;
        }
        Command::Vote {
            election_id,
            options,
        } => {
            let controller = open_election(&board, &election_id).await?;
            select(&controller, &options).await;
            let result = controller.submit_vote().await;
            print!("{}", render_snapshot(&controller.snapshot().await));
            result?;
        }
        Command::Revoke {
            election_id,
            options,
        } => {
            let controller = open_election(&board, &election_id).await?;
            select(&controller, &options).await;
            let result = controller.submit_revoke().await;
            print!("{}", render_snapshot(&controller.snapshot().await));
            result?;
        }
    }

    Ok(())
}

/// Elections are only reachable through the list, as on the web page.
async fn open_election(
    board: &ElectionBoard,
    election_id: &str,
) -> Result<Arc<ElectionSyncController>> {
    board.open().await?;
    let election_id = ElectionId::new(election_id);
    board.list().find(&election_id).await.ok_or_else(|| {
        let hint = match board.list().scope() {
            ListScope::Recent { limit } => format!("the {limit} most recent elections"),
            ListScope::Account(account) => format!("the elections of {account}"),
        };
        anyhow!("election #{election_id} is not among {hint}")
    })
}

async fn select(controller: &ElectionSyncController, options: &[String]) {
    for option in options {
        controller.set_option(option, true).await;
    }
}

async fn print_board(board: &ElectionBoard) {
    let snapshots = board.snapshots().await;
    if snapshots.is_empty() {
        println!("No elections yet.");
    }
    for snapshot in snapshots {
        println!("{}", render_snapshot(&snapshot));
    }
}
