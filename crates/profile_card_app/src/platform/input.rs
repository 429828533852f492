use std::io::{self, BufRead};
use std::sync::mpsc;
use std::thread;

use card_logging::card_warn;
use profile_card_core::Msg;

use super::ui::constants::{CMD_HELP, CMD_NEW, CMD_OPEN, CMD_QUIT};

/// One line typed at the interactive prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Look up a username (the Generate button).
    Query(String),
    /// New Search.
    New,
    /// View on GitHub.
    Open,
    Help,
    Quit,
    Blank,
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        match trimmed {
            "" => Command::Blank,
            CMD_NEW => Command::New,
            CMD_OPEN => Command::Open,
            CMD_HELP => Command::Help,
            CMD_QUIT | ":q" => Command::Quit,
            _ => Command::Query(trimmed.to_string()),
        }
    }

    /// Messages that carry this command into the state machine.
    pub fn into_msgs(self) -> Vec<Msg> {
        match self {
            Command::Query(text) => vec![Msg::InputChanged(text), Msg::SubmitInput],
            Command::New => vec![Msg::Reset],
            Command::Open => vec![Msg::OpenProfileClicked],
            Command::Help | Command::Quit | Command::Blank => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Line(String),
    Closed,
}

/// Reads stdin on a background thread so the main loop can keep applying
/// fetch results while the user types.
pub fn spawn_stdin_reader(tx: mpsc::Sender<InputEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(InputEvent::Line(line)).is_err() {
                        return;
                    }
                }
                Err(err) => {
                    card_warn!("Failed to read stdin: {}", err);
                    break;
                }
            }
        }
        let _ = tx.send(InputEvent::Closed);
    });
}
