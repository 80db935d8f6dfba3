//! Integration tests for the focus cycle.
//!
//! Drives the controller through whole cycles on a manual clock and checks
//! the long-break rollover, counter bookkeeping and remaining-time bounds.

use std::time::Duration;

use focusclock_core::{Event, ManualClock, Mode, SessionController, SettingField, Settings};
use proptest::prelude::*;

fn controller_with(settings: Settings) -> (SessionController, ManualClock) {
    let clock = ManualClock::new();
    (SessionController::new(settings).with_clock(clock.clone()), clock)
}

/// Tick once per second until a phase completes. Returns the completion
/// event and the number of seconds it took.
fn run_phase(c: &mut SessionController, clock: &ManualClock) -> (Event, u64) {
    c.start();
    let mut secs = 0;
    loop {
        clock.advance(Duration::from_secs(1));
        secs += 1;
        if let Some(event) = c.tick() {
            return (event, secs);
        }
        assert!(secs <= 180 * 60, "phase never completed");
    }
}

#[test]
fn test_four_focus_phases_end_in_long_break() {
    let mut settings = Settings::default();
    settings.focus_minutes = 50;
    settings.cycles_before_long_break = 4;
    let (mut c, clock) = controller_with(settings);

    let mut nexts = Vec::new();
    let mut counts = Vec::new();
    for _ in 0..4 {
        assert_eq!(c.mode(), Mode::Focus);
        let (event, secs) = run_phase(&mut c, &clock);
        assert_eq!(secs, 50 * 60);
        match event {
            Event::PhaseCompleted {
                completed: Mode::Focus,
                next,
                completed_focus_cycles,
                ..
            } => {
                nexts.push(next);
                counts.push(completed_focus_cycles);
            }
            other => panic!("unexpected event: {other:?}"),
        }
        if c.mode() != Mode::LongBreak {
            // Finish the short break to get back to Focus.
            let (event, _) = run_phase(&mut c, &clock);
            assert!(matches!(
                event,
                Event::PhaseCompleted {
                    next: Mode::Focus,
                    ..
                }
            ));
        }
    }

    assert_eq!(
        nexts,
        vec![Mode::ShortBreak, Mode::ShortBreak, Mode::ShortBreak, Mode::LongBreak]
    );
    assert_eq!(counts, vec![1, 2, 3, 4]);
    assert_eq!(c.snapshot().cycle_position, 0);

    let (event, secs) = run_phase(&mut c, &clock);
    assert_eq!(secs, 15 * 60);
    assert!(matches!(
        event,
        Event::PhaseCompleted {
            completed: Mode::LongBreak,
            next: Mode::Focus,
            completed_focus_cycles: 4,
            ..
        }
    ));
}

#[test]
fn test_auto_start_runs_cycle_unattended() {
    let mut settings = Settings::default();
    settings.auto_start_next = true;
    settings.cycles_before_long_break = 2;
    let (mut c, clock) = controller_with(settings);
    c.start();

    let mut completions = Vec::new();
    // focus 25 + short 5 + focus 25 + long 15
    for _ in 0..(25 + 5 + 25 + 15) * 60 {
        clock.advance(Duration::from_secs(1));
        if let Some(Event::PhaseCompleted { completed, next, .. }) = c.tick() {
            completions.push((completed, next));
        }
    }

    assert_eq!(
        completions,
        vec![
            (Mode::Focus, Mode::ShortBreak),
            (Mode::ShortBreak, Mode::Focus),
            (Mode::Focus, Mode::LongBreak),
            (Mode::LongBreak, Mode::Focus),
        ]
    );
    assert!(c.is_running());
    assert_eq!(c.daily_focus_sessions(), 2);
    assert_eq!(c.snapshot().streak_dots.iter().filter(|d| **d).count(), 2);
}

#[test]
fn test_without_auto_start_every_completion_stops() {
    let (mut c, clock) = controller_with(Settings::default());
    for _ in 0..3 {
        run_phase(&mut c, &clock);
        assert!(!c.is_running());
        clock.advance(Duration::from_secs(600));
        assert!(c.tick().is_none());
    }
}

#[test]
fn test_jittery_ticks_do_not_drift() {
    let (mut c, clock) = controller_with(Settings::default());
    c.start();
    let mut total = Duration::ZERO;
    let jitter = [900u64, 1100, 1000, 1350, 650];
    for i in 0..200 {
        let step = Duration::from_millis(jitter[i % jitter.len()]);
        clock.advance(step);
        total += step;
        c.tick();
    }
    let expected = 25.0 * 60.0 - total.as_secs_f64();
    assert!((c.remaining_secs() - expected).abs() < 1e-6);
}

#[derive(Debug, Clone)]
enum Op {
    Elapse(u64),
    StartPause,
    Reset,
    ChangeMode(Mode),
    Update(SettingField, u32),
    Step(SettingField, i32),
    RestoreDefaults,
}

fn mode_strategy() -> impl Strategy<Value = Mode> {
    prop_oneof![Just(Mode::Focus), Just(Mode::ShortBreak), Just(Mode::LongBreak)]
}

fn field_strategy() -> impl Strategy<Value = SettingField> {
    proptest::sample::select(SettingField::ALL.to_vec())
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0u64..4_000_000).prop_map(Op::Elapse),
        2 => Just(Op::StartPause),
        1 => Just(Op::Reset),
        1 => mode_strategy().prop_map(Op::ChangeMode),
        1 => (field_strategy(), 0u32..200).prop_map(|(f, v)| Op::Update(f, v)),
        1 => (field_strategy(), -20i32..20).prop_map(|(f, d)| Op::Step(f, d)),
        1 => Just(Op::RestoreDefaults),
    ]
}

proptest! {
    #[test]
    fn remaining_stays_within_phase_bounds(ops in proptest::collection::vec(op_strategy(), 1..80)) {
        let (mut c, clock) = controller_with(Settings::default());
        let mut last_cycles = 0;

        for op in ops {
            let mode_before = c.mode();
            let running_before = c.is_running();
            let edits_settings = matches!(op, Op::Update(..) | Op::Step(..) | Op::RestoreDefaults);
            let event = match op {
                Op::Elapse(ms) => {
                    clock.advance(Duration::from_millis(ms));
                    c.tick()
                }
                Op::StartPause => c.start_pause(),
                Op::Reset => c.reset(),
                Op::ChangeMode(mode) => c.change_mode(mode),
                Op::Update(field, value) => c.update_setting(field, &value.to_string()),
                Op::Step(field, delta) => c.step_setting(field, delta),
                Op::RestoreDefaults => c.restore_default_settings(),
            };

            if edits_settings {
                prop_assert_eq!(c.is_running(), running_before);
                prop_assert_eq!(c.mode(), mode_before);
            }

            let remaining = c.remaining_secs();
            prop_assert!(remaining >= 0.0);
            prop_assert!(remaining <= c.total_secs() as f64);

            let cycles = c.completed_focus_cycles();
            match event {
                Some(Event::PhaseCompleted { completed: Mode::Focus, .. }) => {
                    prop_assert_eq!(mode_before, Mode::Focus);
                    prop_assert_eq!(cycles, last_cycles + 1);
                }
                _ => {
                    prop_assert_eq!(cycles, last_cycles);
                }
            }
            prop_assert_eq!(c.daily_focus_sessions(), cycles);
            last_cycles = cycles;
        }
    }

    #[test]
    fn phase_completes_exactly_at_its_duration(minutes in 5u32..=60) {
        let mut settings = Settings::default();
        settings.focus_minutes = minutes;
        let (mut c, clock) = controller_with(settings);
        let (event, secs) = run_phase(&mut c, &clock);
        prop_assert_eq!(secs, u64::from(minutes) * 60);
        let is_focus_completion = matches!(event, Event::PhaseCompleted { completed: Mode::Focus, .. });
        prop_assert!(is_focus_completion);
        prop_assert_eq!(c.completed_focus_cycles(), 1);
    }
}
