use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use client_core::{EntityCollection, HttpListGateway, ListError};
use shared::{
    account::SignupForm,
    domain::{EntityId, Scope},
};
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

mod config;
mod shell;

use config::{load_settings, normalize_server_url};

#[derive(Parser, Debug)]
#[command(name = "checklist", about = "Room and place checklist client")]
struct Cli {
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long)]
    token: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List your rooms.
    Rooms,
    AddRoom {
        name: String,
    },
    RenameRoom {
        id: i64,
        name: String,
    },
    DeleteRoom {
        id: i64,
        #[arg(long)]
        yes: bool,
    },
    /// List the places of a room.
    Places {
        room: i64,
    },
    AddPlace {
        room: i64,
        name: String,
    },
    RenamePlace {
        room: i64,
        id: i64,
        name: String,
    },
    DeletePlace {
        room: i64,
        id: i64,
        #[arg(long)]
        yes: bool,
    },
    Signup {
        username: String,
        password: String,
    },
    /// Interactive session.
    Shell,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings();
    if let Some(server_url) = cli.server_url {
        settings.server_url = normalize_server_url(&server_url);
    }
    if let Some(token) = cli.token {
        settings.token = Some(token);
    }

    let gateway = Arc::new(HttpListGateway::with_timeout(
        &settings.server_url,
        settings.token.clone(),
        settings.request_timeout(),
    )?);

    let rooms = Scope::Rooms;
    let places = |room: i64| Scope::Places {
        room_id: EntityId(room),
    };

    match cli.command {
        Command::Rooms => show(loaded(gateway, rooms).await?),
        Command::Places { room } => show(loaded(gateway, places(room)).await?),
        Command::AddRoom { name } => add(gateway, rooms, &name).await?,
        Command::AddPlace { room, name } => add(gateway, places(room), &name).await?,
        Command::RenameRoom { id, name } => rename(gateway, rooms, id, &name).await?,
        Command::RenamePlace { room, id, name } => {
            rename(gateway, places(room), id, &name).await?
        }
        Command::DeleteRoom { id, yes } => delete(gateway, rooms, id, yes).await?,
        Command::DeletePlace { room, id, yes } => delete(gateway, places(room), id, yes).await?,
        Command::Signup { username, password } => {
            gateway
                .signup(&SignupForm::new(username.clone(), password))
                .await?;
            println!("account '{username}' created; sign in to get a token");
        }
        Command::Shell => {
            let mut session = client_core::ChecklistSession::new(gateway);
            let mut stdin = BufReader::new(tokio::io::stdin());
            shell::run(&mut session, &mut stdin).await?;
        }
    }

    Ok(())
}

async fn loaded(gateway: Arc<HttpListGateway>, scope: Scope) -> Result<EntityCollection> {
    let mut collection = EntityCollection::new(gateway, scope);
    collection.load().await.map_err(report)?;
    Ok(collection)
}

fn show(collection: EntityCollection) {
    if let Scope::Places { .. } = collection.scope() {
        match collection.scope_label() {
            "" => println!("{}", client_core::session::UNTITLED_ROOM),
            title => println!("{title}"),
        }
    }
    if collection.is_empty() {
        println!("(empty)");
    }
    for entity in collection.entities() {
        println!("{}\t{}", entity.id, entity.name);
    }
}

async fn add(gateway: Arc<HttpListGateway>, scope: Scope, name: &str) -> Result<()> {
    let mut collection = loaded(gateway, scope).await?;
    let entity = collection.create(name).await.map_err(report)?;
    println!("added {}\t{}", entity.id, entity.name);
    Ok(())
}

async fn rename(gateway: Arc<HttpListGateway>, scope: Scope, id: i64, name: &str) -> Result<()> {
    let mut collection = loaded(gateway, scope).await?;
    let entity = collection.rename(EntityId(id), name).await.map_err(report)?;
    println!("renamed {}\t{}", entity.id, entity.name);
    Ok(())
}

async fn delete(gateway: Arc<HttpListGateway>, scope: Scope, id: i64, yes: bool) -> Result<()> {
    let mut collection = loaded(gateway, scope).await?;
    let id = EntityId(id);
    let Some(entity) = collection.get(id).cloned() else {
        bail!("no entry with id {id}");
    };
    if !yes {
        let mut stdin = BufReader::new(tokio::io::stdin());
        let prompt = format!("Delete \"{}\"?", entity.name);
        if !shell::confirm(&mut stdin, &prompt).await? {
            println!("kept \"{}\"", entity.name);
            return Ok(());
        }
    }
    collection.delete(id).await.map_err(report)?;
    println!("deleted {}\t{}", entity.id, entity.name);
    Ok(())
}

fn report(err: ListError) -> anyhow::Error {
    anyhow::anyhow!("{} ({err})", err.user_message())
}
