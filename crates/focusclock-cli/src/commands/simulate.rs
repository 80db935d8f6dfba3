//! Headless run of the focus cycle on a manual clock.
//!
//! A stopped timer is restarted right away, as a user pressing start at
//! every phase boundary would.

use std::time::Duration;

use clap::Args;
use focusclock_core::{Config, Event, ManualClock, SessionController, SessionSnapshot};
use serde::Serialize;

use super::SettingsArgs;

#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Simulated seconds to run
    #[arg(long)]
    pub seconds: u64,
    /// Seconds of simulated time per tick
    #[arg(long, default_value_t = 1.0)]
    pub step: f64,
    /// Task label to attach to the session
    #[arg(long)]
    pub task: Option<String>,
    /// Print a JSON report instead of text
    #[arg(long)]
    pub json: bool,
    #[command(flatten)]
    pub settings: SettingsArgs,
}

#[derive(Debug, Serialize)]
pub struct Transition {
    pub elapsed_secs: f64,
    pub event: Event,
}

#[derive(Debug, Serialize)]
pub struct Report {
    pub transitions: Vec<Transition>,
    #[serde(rename = "final")]
    pub final_snapshot: SessionSnapshot,
}

pub fn simulate(
    controller: SessionController,
    clock: &ManualClock,
    seconds: u64,
    step: Duration,
) -> Report {
    let mut controller = controller;
    let total = Duration::from_secs(seconds);
    let mut transitions = Vec::new();

    controller.start();
    while clock.elapsed() < total {
        let remaining = total - clock.elapsed();
        clock.advance(step.min(remaining));
        if let Some(event) = controller.tick() {
            transitions.push(Transition {
                elapsed_secs: clock.elapsed().as_secs_f64(),
                event,
            });
        }
        if !controller.is_running() {
            controller.start();
        }
    }

    Report {
        transitions,
        final_snapshot: controller.snapshot(),
    }
}

pub fn run(args: SimulateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let step = step_duration(args.step)?;
    let config = Config::load()?;
    let settings = args.settings.apply(config.settings);

    let clock = ManualClock::new();
    let mut controller = SessionController::new(settings).with_clock(clock.clone());
    if let Some(task) = args.task {
        controller.set_task_label(task);
    }

    let report = simulate(controller, &clock, args.seconds, step);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for t in &report.transitions {
        if let Event::PhaseCompleted {
            completed,
            next,
            completed_focus_cycles,
            ..
        } = &t.event
        {
            println!(
                "[{}] {completed} complete -> {next} (focus cycles: {completed_focus_cycles})",
                format_elapsed(t.elapsed_secs)
            );
        }
    }
    println!("{}", report.final_snapshot.status_line());
    Ok(())
}

fn step_duration(step: f64) -> Result<Duration, String> {
    let invalid = || format!("--step must be a positive number of seconds, got {step}");
    if step <= 0.0 {
        return Err(invalid());
    }
    Duration::try_from_secs_f64(step).map_err(|_| invalid())
}

fn format_elapsed(secs: f64) -> String {
    let secs = secs.max(0.0).round() as u64;
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}
