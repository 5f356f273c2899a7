use anyhow::Result;
use std::io::Write as _;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use watchlist_sync::{WatchlistComponent, WatchlistResult, WatchlistState};

use crate::render;

const HELP: &str = "\
Commands:
  add <SYMBOL>     add a stock (bare text does the same)
  rm <SYMBOL>      remove a stock
  refresh          reload from the server
  show             redraw the watchlist
  help             this text
  quit             exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Add(String),
    Remove(String),
    Refresh,
    Show,
    Help,
    Quit,
    Empty,
}

pub fn parse_command(line: &str) -> SessionCommand {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    match head.to_ascii_lowercase().as_str() {
        "" => SessionCommand::Empty,
        "add" => SessionCommand::Add(rest.to_string()),
        "rm" | "remove" => SessionCommand::Remove(rest.to_string()),
        "refresh" | "r" => SessionCommand::Refresh,
        "show" | "ls" => SessionCommand::Show,
        "help" | "?" => SessionCommand::Help,
        "quit" | "exit" | "q" => SessionCommand::Quit,
        _ => SessionCommand::Add(line.to_string()),
    }
}

fn describe(action: &str, symbol: &str, result: &WatchlistResult<WatchlistState>) -> String {
    match result {
        Ok(_) => format!("{action} {symbol}: ok"),
        Err(err) if err.is_local() => format!("{action} {symbol} not sent: {err}"),
        Err(err) => format!("{action} {symbol} failed: {err}"),
    }
}

async fn redraw(component: &WatchlistComponent) {
    let view = component.render().await;
    let synced_at = component.state().await.last_synced_at;
    println!("{}", render::watchlist(&view, synced_at));
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

/// Interactive watchlist. Remote calls run on spawned tasks so the prompt
/// stays usable; each completion triggers a redraw.
pub async fn run(component: WatchlistComponent) -> Result<()> {
    component.activate().await;
    redraw(&component).await;
    println!("{HELP}");

    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<String>();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        prompt();
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_command(&line) {
                    SessionCommand::Empty => {}
                    SessionCommand::Quit => break,
                    SessionCommand::Help => println!("{HELP}"),
                    SessionCommand::Show => redraw(&component).await,
                    SessionCommand::Refresh => {
                        let component = component.clone();
                        let done_tx = done_tx.clone();
                        tokio::spawn(async move {
                            let state = component.refresh().await;
                            let _ = done_tx.send(format!("refresh: {:?}", state.status));
                        });
                    }
                    SessionCommand::Add(symbol) => {
                        let component = component.clone();
                        let done_tx = done_tx.clone();
                        tokio::spawn(async move {
                            let result = component.submit_input(symbol.clone()).await;
                            let _ = done_tx.send(describe("add", &symbol, &result));
                        });
                    }
                    SessionCommand::Remove(symbol) => {
                        let component = component.clone();
                        let done_tx = done_tx.clone();
                        tokio::spawn(async move {
                            let result = component.remove(&symbol).await;
                            let _ = done_tx.send(describe("remove", &symbol, &result));
                        });
                    }
                }
            }
            Some(note) = done_rx.recv() => {
                println!("\n{note}");
                redraw(&component).await;
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received SIGINT, leaving watchlist session");
                break;
            }
        }
    }

    Ok(())
}
