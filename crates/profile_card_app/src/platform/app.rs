use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

use anyhow::Context;
use card_logging::{card_info, card_warn};
use profile_card_core::ViewState;
use profile_card_engine::{EngineHandle, ProfileController};

use super::cli::Args;
use super::config::{self, Settings};
use super::effects;
use super::input::{self, Command, InputEvent};
use super::ui;

/// How often the interactive loop checks for finished fetches.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub fn run_app(args: Args) -> anyhow::Result<ExitCode> {
    let settings = config::load(&args).context("failed to load configuration")?;
    card_logging::initialize(&settings.log_destination, settings.log_level);
    card_info!(
        "profile-card starting api={} top_repos={}",
        settings.fetch.api_base_url,
        settings.fetch.top_repo_limit
    );

    let engine =
        EngineHandle::new(settings.fetch.clone()).context("failed to start profile engine")?;
    let mut controller = ProfileController::new(engine);

    match args.username.as_deref() {
        Some(username) => run_once(&mut controller, &settings, username, args.open),
        None => run_interactive(&mut controller, &settings),
    }
}

fn run_once(
    controller: &mut ProfileController,
    settings: &Settings,
    username: &str,
    open: bool,
) -> anyhow::Result<ExitCode> {
    controller.input_changed(username);
    controller.submit_input();
    if controller.view_state() == &ViewState::Idle {
        eprintln!("Username must not be empty.");
        return Ok(ExitCode::from(2));
    }

    let settled = controller.wait_until_settled(settings.settle_timeout());
    if !settled {
        card_warn!("Lookup of {:?} did not finish in time", username);
        eprintln!("Timed out waiting for GitHub.");
        return Ok(ExitCode::FAILURE);
    }

    print_view(controller)?;
    match controller.view_state() {
        ViewState::Loaded(_) => {
            if open {
                if let Some(url) = controller.open_profile() {
                    effects::open_url(&url);
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        _ => Ok(ExitCode::FAILURE),
    }
}

fn run_interactive(
    controller: &mut ProfileController,
    settings: &Settings,
) -> anyhow::Result<ExitCode> {
    let (input_tx, input_rx) = mpsc::channel();
    input::spawn_stdin_reader(input_tx);

    print_view(controller)?;
    controller.consume_dirty();

    loop {
        match input_rx.recv_timeout(POLL_INTERVAL) {
            Ok(InputEvent::Line(line)) => match Command::parse(&line) {
                Command::Quit => break,
                Command::Help => println!("{}", ui::constants::HELP),
                Command::Blank => {}
                Command::Open if controller.view_state().record().is_none() => {
                    println!("No profile loaded.");
                }
                Command::Query(_) if controller.view_state().is_loading() => {
                    println!("Still loading, please wait.");
                }
                command => {
                    for msg in command.into_msgs() {
                        let remaining = controller.dispatch(msg);
                        effects::perform(remaining);
                    }
                }
            },
            Ok(InputEvent::Closed) | Err(RecvTimeoutError::Disconnected) => {
                // Piped input: let the last lookup finish before exiting.
                controller.wait_until_settled(settings.settle_timeout());
                if controller.consume_dirty() {
                    print_view(controller)?;
                }
                break;
            }
            Err(RecvTimeoutError::Timeout) => {}
        }

        controller.poll();
        if controller.consume_dirty() {
            print_view(controller)?;
        }
    }

    card_info!("profile-card exiting");
    Ok(ExitCode::SUCCESS)
}

fn print_view(controller: &ProfileController) -> anyhow::Result<()> {
    let rendered = ui::render::render(&controller.view());
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(rendered.as_bytes())
        .and_then(|()| stdout.flush())
        .context("failed to write to stdout")
}
