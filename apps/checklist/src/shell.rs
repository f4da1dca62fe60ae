//! Interactive line-oriented front end over a [`ChecklistSession`].

use anyhow::Result;
use client_core::{
    commit_drag, ChecklistSession, DragGesture, DragOutcome, EntityCollection, ListError,
};
use shared::domain::{EntityId, Scope};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

pub const HELP: &str = "\
commands:
  list                 show the current list
  add NAME             add an entry
  edit ID              start renaming entry ID
  draft TEXT           replace the rename draft
  save                 commit the rename draft
  cancel               leave rename mode
  delete ID            delete entry ID (asks for confirmation)
  move FROM [TO]       drag entry at position FROM to position TO
  open ROOM_ID         show the places of a room
  back                 return to the room list
  reload               fetch the current list again
  quit                 exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    List,
    Add(String),
    Edit(EntityId),
    Draft(String),
    Save,
    Cancel,
    Delete(EntityId),
    Move { from: usize, to: Option<usize> },
    Open(EntityId),
    Back,
    Reload,
    Help,
    Quit,
}

/// Parses one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<ShellCommand>, String> {
    let line = line.trim_start();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "" => return Ok(None),
        "list" | "ls" => ShellCommand::List,
        "add" => ShellCommand::Add(rest.to_string()),
        "edit" => ShellCommand::Edit(parse_id(rest)?),
        "draft" => ShellCommand::Draft(rest.to_string()),
        "save" => ShellCommand::Save,
        "cancel" => ShellCommand::Cancel,
        "delete" | "rm" => ShellCommand::Delete(parse_id(rest)?),
        "move" | "mv" => {
            let mut positions = rest.split_whitespace();
            let from = parse_position(positions.next().ok_or("move needs a FROM position")?)?;
            let to = positions.next().map(parse_position).transpose()?;
            ShellCommand::Move { from, to }
        }
        "open" => ShellCommand::Open(parse_id(rest)?),
        "back" => ShellCommand::Back,
        "reload" => ShellCommand::Reload,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => return Err(format!("unknown command '{other}'; type 'help'")),
    };
    Ok(Some(command))
}

fn parse_id(raw: &str) -> Result<EntityId, String> {
    raw.trim()
        .parse::<i64>()
        .map(EntityId)
        .map_err(|_| format!("'{}' is not an id", raw.trim()))
}

/// Converts a 1-based position into an index.
fn parse_position(raw: &str) -> Result<usize, String> {
    raw.parse::<usize>()
        .ok()
        .and_then(|pos| pos.checked_sub(1))
        .ok_or_else(|| format!("'{raw}' is not a position (positions start at 1)"))
}

pub fn render(session: &ChecklistSession) -> String {
    let collection = session.active();
    let mut out = match collection.scope() {
        Scope::Rooms => "Rooms\n".to_string(),
        Scope::Places { .. } => format!(
            "Places in {}\n",
            session.room_title().unwrap_or_default()
        ),
    };
    out.push_str(&render_entries(collection));
    if let Some(message) = collection.pending_error() {
        out.push_str(&format!("! {message}\n"));
    }
    out
}

fn render_entries(collection: &EntityCollection) -> String {
    if collection.is_empty() {
        return match collection.scope() {
            Scope::Rooms => "  (no rooms yet; add one)\n".to_string(),
            Scope::Places { .. } => "  (no places registered)\n".to_string(),
        };
    }

    let edit = collection.edit_session();
    let mut out = String::new();
    for (idx, entity) in collection.entities().iter().enumerate() {
        out.push_str(&format!("  {}. [{}] {}", idx + 1, entity.id, entity.name));
        if edit.is_editing_entity(entity.id) {
            out.push_str(&format!(" -> editing: \"{}\"", edit.draft().unwrap_or_default()));
            if let Some(err) = edit.error() {
                out.push_str(&format!(" ({})", err.user_message()));
            }
        }
        out.push('\n');
    }
    out
}

/// Reads a yes/no answer; anything but `y`/`yes` counts as no.
pub async fn confirm<R: AsyncBufRead + Unpin>(input: &mut R, prompt: &str) -> Result<bool> {
    println!("{prompt} [y/N]");
    let mut answer = String::new();
    input.read_line(&mut answer).await?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

pub async fn run<R: AsyncBufRead + Unpin>(
    session: &mut ChecklistSession,
    input: &mut R,
) -> Result<()> {
    if let Err(err) = session.load_rooms().await {
        debug!(error = %err, "initial room load failed");
    }
    print!("{}", render(session));
    println!("type 'help' for commands");

    let mut line = String::new();
    loop {
        line.clear();
        if input.read_line(&mut line).await? == 0 {
            return Ok(());
        }
        let command = match parse_command(line.trim_end_matches(['\r', '\n'])) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };
        if command == ShellCommand::Quit {
            return Ok(());
        }
        execute(session, command, input).await?;
    }
}

/// Runs one command and redraws. Engine failures are recorded on the
/// collection and drawn by [`render`]; only I/O errors propagate.
async fn execute<R: AsyncBufRead + Unpin>(
    session: &mut ChecklistSession,
    command: ShellCommand,
    input: &mut R,
) -> Result<()> {
    let outcome: Result<(), ListError> = match command {
        ShellCommand::List => Ok(()),
        ShellCommand::Help => {
            println!("{HELP}");
            return Ok(());
        }
        ShellCommand::Add(name) => session.active_mut().create(&name).await.map(drop),
        ShellCommand::Edit(id) => session.active_mut().start_edit(id),
        ShellCommand::Draft(text) => {
            let result = session.active_mut().update_draft(&text);
            if let Err(err) = &result {
                println!("{}", err.user_message());
            }
            result
        }
        ShellCommand::Save => session.active_mut().commit_edit().await.map(drop),
        ShellCommand::Cancel => {
            session.active_mut().cancel_edit();
            Ok(())
        }
        ShellCommand::Delete(id) => {
            let Some(entity) = session.active().get(id).cloned() else {
                println!("no entry with id {id}");
                return Ok(());
            };
            if !confirm(input, &format!("Delete \"{}\"?", entity.name)).await? {
                println!("kept \"{}\"", entity.name);
                return Ok(());
            }
            if session.places().is_some() {
                session.active_mut().delete(id).await
            } else {
                session.delete_room(id).await
            }
        }
        ShellCommand::Move { from, to } => {
            commit_drag(session.active_mut(), DragGesture::new(from, to)).map(|outcome| {
                if outcome == DragOutcome::Aborted {
                    println!("move cancelled");
                }
            })
        }
        ShellCommand::Open(room_id) => session.open_room(room_id).await,
        ShellCommand::Back => {
            session.close_room();
            session.load_rooms().await
        }
        ShellCommand::Reload => session.active_mut().load().await,
        ShellCommand::Quit => return Ok(()),
    };
    if let Err(err) = outcome {
        debug!(error = %err, "shell command failed");
    }
    print!("{}", render(session));
    Ok(())
}
