//! Line-oriented command input.

use std::io::BufRead;
use std::thread;

use crawlwatch_core::{Msg, SortField, UrlId};
use tokio::sync::mpsc;

pub const HELP: &str = "\
Commands:
  login <user> <password>   sign in
  logout                    sign out and forget the session
  add <url>                 submit a URL for crawling
  reload                    reload the current page
  page <n> | next | prev    move between pages
  size <n>                  rows per page (1-100)
  sort <column>             sort by id, url, created_at or updated_at; again to flip order
  select <id>...            toggle selection of rows
  all                       select or clear the whole page
  start | stop              start or stop jobs for the selected rows
  dismiss                   clear the current notice
  help                      show this text
  quit                      exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Send(Vec<Msg>),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown command `{0}`, type `help` for a list")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
}

/// Parses one input line. Blank lines yield `None`.
pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    if word.is_empty() {
        return Ok(None);
    }

    let send = |msg: Msg| -> Result<Option<Command>, ParseError> {
        Ok(Some(Command::Send(vec![msg])))
    };
    match word.to_ascii_lowercase().as_str() {
        "login" => {
            let mut parts = rest.split_whitespace();
            match (parts.next(), parts.next(), parts.next()) {
                (Some(username), Some(password), None) => send(Msg::LoginSubmitted {
                    username: username.to_string(),
                    password: password.to_string(),
                }),
                _ => Err(ParseError::Usage("login <user> <password>")),
            }
        }
        "logout" => send(Msg::LogoutClicked),
        "add" if !rest.is_empty() => send(Msg::UrlSubmitted(rest.to_string())),
        "add" => Err(ParseError::Usage("add <url>")),
        "reload" | "list" => send(Msg::ReloadRequested),
        "page" => rest
            .parse::<i64>()
            .map_err(|_| ParseError::Usage("page <n>"))
            .and_then(|page| send(Msg::PageRequested(page))),
        "next" | "n" => send(Msg::NextPage),
        "prev" | "p" => send(Msg::PrevPage),
        "size" => rest
            .parse::<u32>()
            .map_err(|_| ParseError::Usage("size <n>"))
            .and_then(|limit| send(Msg::PageSizeChanged(limit))),
        "sort" => SortField::parse(rest)
            .ok_or(ParseError::Usage("sort <id|url|created_at|updated_at>"))
            .and_then(|field| send(Msg::SortClicked(field))),
        "select" => {
            let ids = rest
                .split(|c: char| c.is_whitespace() || c == ',')
                .filter(|part| !part.is_empty())
                .map(str::parse::<UrlId>)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|_| ParseError::Usage("select <id>..."))?;
            if ids.is_empty() {
                return Err(ParseError::Usage("select <id>..."));
            }
            Ok(Some(Command::Send(
                ids.into_iter().map(Msg::SelectionToggled).collect(),
            )))
        }
        "all" => send(Msg::SelectAllToggled),
        "start" => send(Msg::StartSelectedClicked),
        "stop" => send(Msg::StopSelectedClicked),
        "dismiss" => send(Msg::NoticeDismissed),
        "help" | "?" => Ok(Some(Command::Help)),
        "quit" | "exit" | "q" => Ok(Some(Command::Quit)),
        other => Err(ParseError::Unknown(other.to_string())),
    }
}

/// Reads stdin on a dedicated thread. The channel closes on EOF.
pub fn spawn_reader() -> mpsc::UnboundedReceiver<String> {
    let (line_tx, line_rx) = mpsc::unbounded_channel();
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if line_tx.send(line).is_err() {
                break;
            }
        }
    });
    line_rx
}
