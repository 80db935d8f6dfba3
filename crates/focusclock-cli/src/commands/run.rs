//! Interactive terminal session.
//!
//! Reads one command per line from stdin and redraws a single status line
//! whenever the visible clock changes.

use std::io::{self, Write};

use clap::Args;
use focusclock_core::service::Command;
use focusclock_core::{
    Config, Event, Mode, SessionController, SessionService, SessionSnapshot, SettingField,
    TokioClock,
};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::SettingsArgs;
use crate::bell::TerminalBell;

const HELP: &str = "\
commands:
  s | space            start / pause
  r                    reset current phase
  m <focus|short|long> switch mode
  set <field> <value>  change a setting (focus, short, long, cycles, auto, sound)
  + <field> | - <field> nudge a setting by one
  defaults             restore default settings
  task <text>          set the task label
  status               print the full state as JSON
  help                 show this help
  q                    quit";

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Task label to show next to the clock
    #[arg(long)]
    pub task: Option<String>,
    /// Start counting down immediately
    #[arg(long)]
    pub start: bool,
    #[command(flatten)]
    pub settings: SettingsArgs,
}

/// One parsed line of user input.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Command(Command),
    Status,
    Help,
    Quit,
}

pub fn parse_input(line: &str) -> Result<Input, String> {
    if line == " " {
        return Ok(Input::Command(Command::StartPause));
    }
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let input = match word.to_ascii_lowercase().as_str() {
        "s" | "start" | "pause" | "" if rest.is_empty() => Command::StartPause,
        "r" | "reset" => Command::Reset,
        "m" | "mode" => Command::ChangeMode(rest.parse::<Mode>()?),
        "set" => {
            let (field, value) = rest
                .split_once(char::is_whitespace)
                .ok_or_else(|| "usage: set <field> <value>".to_string())?;
            Command::UpdateSetting {
                field: field.parse::<SettingField>()?,
                value: value.trim().to_string(),
            }
        }
        "+" | "-" => Command::StepSetting {
            field: rest.parse::<SettingField>()?,
            delta: if word == "+" { 1 } else { -1 },
        },
        "defaults" => Command::RestoreDefaultSettings,
        "task" => Command::SetTaskLabel(rest.to_string()),
        "status" => return Ok(Input::Status),
        "help" | "?" => return Ok(Input::Help),
        "q" | "quit" | "exit" => return Ok(Input::Quit),
        other => return Err(format!("unknown command: {other} (try 'help')")),
    };
    Ok(Input::Command(input))
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run_session(args))
}

async fn run_session(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let settings = args.settings.apply(config.settings.clone());
    let controller = SessionController::new(settings)
        .with_clock(TokioClock)
        .with_cue(TerminalBell);
    let (handle, task) = SessionService::spawn(controller, config.tick_interval());

    if let Some(label) = args.task {
        handle.send(Command::SetTaskLabel(label)).await?;
    }
    if args.start {
        handle.send(Command::Start).await?;
    }

    println!("{HELP}");
    let mut snapshots = handle.watch();
    let mut events = handle.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut shown = render(&handle.snapshot(), None)?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_input(&line) {
                    Ok(Input::Command(command)) => handle.send(command).await?,
                    Ok(Input::Status) => {
                        println!("{}", serde_json::to_string_pretty(&handle.snapshot())?);
                    }
                    Ok(Input::Help) => println!("{HELP}"),
                    Ok(Input::Quit) => break,
                    Err(message) => println!("{message}"),
                }
            }
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = snapshots.borrow_and_update().clone();
                shown = render(&snapshot, Some(&shown))?;
            }
            event = events.recv() => {
                if let Ok(Event::PhaseCompleted { completed, next, auto_started, .. }) = event {
                    let hint = if auto_started { "" } else { " (press s to start)" };
                    println!("\n{completed} complete, next up: {next}{hint}");
                }
            }
        }
    }

    println!();
    handle.shutdown().await.ok();
    let controller = task.await?;
    tracing::info!(
        focus_sessions = controller.daily_focus_sessions(),
        "session ended"
    );
    Ok(())
}

/// Redraw the status line if it differs from what is on screen.
fn render(snapshot: &SessionSnapshot, shown: Option<&str>) -> io::Result<String> {
    let line = snapshot.status_line();
    if shown != Some(line.as_str()) {
        draw(&mut io::stdout().lock(), &line)?;
    }
    Ok(line)
}

fn draw(out: &mut impl Write, line: &str) -> io::Result<()> {
    write!(out, "\r{line}\x1b[K")?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggles_and_simple_commands() {
        assert_eq!(parse_input("s"), Ok(Input::Command(Command::StartPause)));
        assert_eq!(parse_input(" "), Ok(Input::Command(Command::StartPause)));
        assert_eq!(parse_input(""), Ok(Input::Command(Command::StartPause)));
        assert_eq!(parse_input("r"), Ok(Input::Command(Command::Reset)));
        assert_eq!(parse_input("q"), Ok(Input::Quit));
        assert_eq!(parse_input("status"), Ok(Input::Status));
        assert_eq!(
            parse_input("defaults"),
            Ok(Input::Command(Command::RestoreDefaultSettings))
        );
    }

    #[test]
    fn mode_and_settings_commands() {
        assert_eq!(
            parse_input("m long"),
            Ok(Input::Command(Command::ChangeMode(Mode::LongBreak)))
        );
        assert_eq!(
            parse_input("set short 10"),
            Ok(Input::Command(Command::UpdateSetting {
                field: SettingField::ShortBreakMinutes,
                value: "10".into(),
            }))
        );
        assert_eq!(
            parse_input("- cycles"),
            Ok(Input::Command(Command::StepSetting {
                field: SettingField::CyclesBeforeLongBreak,
                delta: -1,
            }))
        );
    }

    #[test]
    fn task_label_keeps_inner_spaces() {
        assert_eq!(
            parse_input("task write the  report"),
            Ok(Input::Command(Command::SetTaskLabel("write the  report".into())))
        );
    }

    struct ClosedTerminal;

    impl Write for ClosedTerminal {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn draw_overwrites_the_line_in_place() {
        let mut out = Vec::new();
        draw(&mut out, "Focus 25:00").unwrap();
        assert_eq!(out, b"\rFocus 25:00\x1b[K");
    }

    #[test]
    fn draw_reports_write_failures() {
        let err = draw(&mut ClosedTerminal, "Focus 25:00").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn malformed_input_is_reported() {
        assert!(parse_input("m nap").is_err());
        assert!(parse_input("set focus").is_err());
        assert!(parse_input("set volume 3").is_err());
        assert!(parse_input("jump").is_err());
    }
}
