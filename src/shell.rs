//! Line-oriented terminal front end.
//!
//! Each input line is parsed into a [`Command`], turned into a controller
//! [`Action`], and followed by a re-render of the screen.

use anyhow::Context;
use shelf_kernel::{Book, BooksApi};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::modules::books::{view, Action, BooksController, FormField};

pub const HELP: &str = "\
Commands:
  set <field> <text>     edit a form field (title, author, category, year, copies)
  add                    submit the form as a new book
  inc <row> | + <row>    add one available copy
  dec <row> | - <row>    remove one available copy
  adjust <row> <delta>   change available copies by <delta>
  delete <row>           delete a book (only when it has 0 copies)
  refresh                reload the list
  show                   redraw the screen
  help                   show this help
  quit                   exit
A <row> is a table row number; anything else is taken as a book id.
";

const PROMPT: &str = "> ";

/// One parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Set(FormField, String),
    Add,
    Adjust { target: String, change: i64 },
    Delete { target: String },
    Refresh,
    Show,
    Help,
    Quit,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command '{0}'")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error(transparent)]
    Field(#[from] crate::modules::books::form::UnknownField),

    #[error("'{0}' is not a whole number")]
    Delta(String),
}

/// Parse one input line; blank lines yield `None`
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    let Some((verb, rest)) = split_word(line) else {
        return Ok(None);
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "set" => {
            let (field, value) = split_word(rest).ok_or(CommandError::Usage("set <field> <text>"))?;
            Command::Set(field.parse()?, value.to_string())
        }
        "add" => Command::Add,
        "inc" | "+" | "+1" => Command::Adjust {
            target: single_target(rest, "inc <row>")?,
            change: 1,
        },
        "dec" | "-" | "-1" => Command::Adjust {
            target: single_target(rest, "dec <row>")?,
            change: -1,
        },
        "adjust" => {
            let (target, delta) = split_word(rest).ok_or(CommandError::Usage("adjust <row> <delta>"))?;
            let delta = delta.trim();
            if delta.is_empty() {
                return Err(CommandError::Usage("adjust <row> <delta>"));
            }
            let change = delta
                .parse::<i64>()
                .map_err(|_| CommandError::Delta(delta.to_string()))?;
            Command::Adjust {
                target: target.to_string(),
                change,
            }
        }
        "delete" | "del" | "rm" => Command::Delete {
            target: single_target(rest, "delete <row>")?,
        },
        "refresh" | "list" => Command::Refresh,
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };

    Ok(Some(command))
}

/// Map a row number to the book shown there; other text is an id as-is
pub fn resolve_target(target: &str, books: &[Book]) -> String {
    target
        .parse::<usize>()
        .ok()
        .and_then(|row| row.checked_sub(1))
        .and_then(|index| books.get(index))
        .map_or_else(|| target.to_string(), |book| book.id.clone())
}

/// Convert a command into a controller action against the displayed list
pub fn to_action(command: Command, books: &[Book]) -> Option<Action> {
    match command {
        Command::Set(field, value) => Some(Action::EditField(field, value)),
        Command::Add => Some(Action::Submit),
        Command::Adjust { target, change } => Some(Action::AdjustCopies {
            id: resolve_target(&target, books),
            change,
        }),
        Command::Delete { target } => Some(Action::Delete {
            id: resolve_target(&target, books),
        }),
        Command::Refresh => Some(Action::Refresh),
        Command::Show | Command::Help | Command::Quit => None,
    }
}

/// Drive the controller from `input` until EOF or `quit`
pub async fn run<A, R, W>(
    controller: &mut BooksController<A>,
    input: R,
    output: &mut W,
) -> anyhow::Result<()>
where
    A: BooksApi,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    write_out(output, &view::render(controller)).await?;

    let mut lines = input.lines();
    loop {
        write_out(output, PROMPT).await?;
        let Some(line) = lines.next_line().await.context("failed to read input")? else {
            break;
        };

        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                write_out(output, &format!("{e}\n")).await?;
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Help => write_out(output, HELP).await?,
            command => {
                if let Some(action) = to_action(command, controller.books()) {
                    tracing::debug!(?action, "dispatching action");
                    controller.update(action).await;
                }
                write_out(output, &view::render(controller)).await?;
            }
        }
    }

    Ok(())
}

async fn write_out<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> anyhow::Result<()> {
    output
        .write_all(text.as_bytes())
        .await
        .context("failed to write output")?;
    output.flush().await.context("failed to flush output")
}

fn split_word(text: &str) -> Option<(&str, &str)> {
    let text = text.trim_start();
    if text.is_empty() {
        return None;
    }
    Some(match text.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (text, ""),
    })
}

fn single_target(rest: &str, usage: &'static str) -> Result<String, CommandError> {
    match split_word(rest) {
        Some((target, "")) => Ok(target.to_string()),
        _ => Err(CommandError::Usage(usage)),
    }
}
