//! Integration tests for the Controller input paths.
//!
//! No tasks are spawned here: every test drives the controller
//! synchronously (`submit_line`, `process_inputs`, `timer_tick`) and
//! inspects the dispatch queue and the diagnostic lines directly.

use trafficlight::app::command::{Color, Command};
use trafficlight::app::service::Controller;
use trafficlight::config::ControllerConfig;
use trafficlight::events::ButtonId;

use super::mock_hw::{CollectSink, ManualClock, MockLights};

fn make_controller(config: ControllerConfig) -> (Controller, CollectSink, ManualClock) {
    let sink = CollectSink::new();
    let clock = ManualClock::new();
    let controller = Controller::new(config, MockLights::new(), sink.clone(), clock.clone())
        .expect("valid config");
    (controller, sink, clock)
}

fn debug_config() -> ControllerConfig {
    ControllerConfig {
        debug_enabled_at_boot: true,
        ..ControllerConfig::default()
    }
}

/// Flush the debug backlog into the sink.
fn flush_debug(controller: &Controller) {
    let ctx = controller.context();
    while ctx.debug.try_drain_one(ctx.sink()) {}
}

fn queued(controller: &Controller) -> Vec<Command> {
    let queue = &controller.context().queue;
    std::iter::from_fn(|| queue.try_pop()).collect()
}

// ── Construction ──────────────────────────────────────────────

#[test]
fn invalid_config_is_rejected() {
    let config = ControllerConfig {
        alarm_tick_interval_ms: 0,
        ..ControllerConfig::default()
    };
    let result = Controller::new(config, MockLights::new(), CollectSink::new(), ManualClock::new());
    assert!(result.is_err());
}

#[test]
fn boot_flags_follow_config() {
    let (controller, _, _) = make_controller(ControllerConfig {
        paused_at_boot: true,
        ..ControllerConfig::default()
    });
    assert!(controller.is_paused());
    assert!(!controller.is_debug_enabled());
}

// ── Serial lines ──────────────────────────────────────────────

#[test]
fn immediate_commands_are_queued_in_order() {
    let (controller, _, _) = make_controller(ControllerConfig::default());
    controller.submit_line("R,500");
    controller.submit_line("g");
    controller.submit_line("Y,0");

    assert_eq!(
        queued(&controller),
        vec![
            Command::new(Color::Red, 500),
            Command::new(Color::Green, 1000),
            Command::new(Color::Yellow, 0),
        ]
    );
}

#[test]
fn rejected_lines_leave_queue_untouched() {
    let (controller, sink, _) = make_controller(debug_config());
    controller.submit_line("X,200");
    controller.submit_line("?");
    controller.submit_line("   ");
    flush_debug(&controller);

    assert!(controller.context().queue.is_empty());
    assert!(sink.contains("UART: unknown color 'X' ignored (input: 'X,200')"));
    assert!(sink.contains("UART: unknown or malformed command: '?'"));
}

#[test]
fn long_rejected_line_is_reported_truncated() {
    let (controller, sink, _) = make_controller(debug_config());
    let line = format!("X{}", "y".repeat(200));
    controller.submit_line(&line);
    flush_debug(&controller);

    let lines = sink.lines();
    let report = lines
        .iter()
        .find(|l| l.starts_with("UART: unknown color 'X' ignored (input: 'Xyy"))
        .expect("report emitted");
    assert_eq!(report.len(), trafficlight::config::DEBUG_MESSAGE_LEN);
    assert_eq!(controller.context().debug.dropped(), 0);
}

#[test]
fn push_and_timing_lines_when_debug_on() {
    let (controller, sink, _) = make_controller(debug_config());
    controller.submit_line("G,300");
    flush_debug(&controller);

    assert!(sink.contains("PUSH FIFO: G, 300 ms"));
    assert!(sink.contains("UART sequence handling time:"));
}

#[test]
fn nothing_is_logged_when_debug_off() {
    let (controller, sink, _) = make_controller(ControllerConfig::default());
    controller.submit_line("G,300");
    controller.submit_line("Q");
    flush_debug(&controller);

    assert!(sink.lines().is_empty());
    assert_eq!(controller.context().debug.backlog_len(), 0);
}

// ── Alarm ─────────────────────────────────────────────────────

#[test]
fn alarm_fires_once_after_delay() {
    let (controller, sink, clock) = make_controller(ControllerConfig::default());
    clock.set_ms(10_000);
    controller.submit_line("000002/G");
    assert!(sink.contains("Alarm set for 2 seconds -> color G"));
    assert_eq!(controller.alarm_remaining_ms(), Some(2_000));

    clock.advance_ms(1_999);
    assert!(!controller.timer_tick());
    clock.advance_ms(1);
    assert!(controller.timer_tick());
    assert!(!controller.timer_tick());

    assert_eq!(controller.process_inputs(), 1);
    assert_eq!(queued(&controller), vec![Command::new(Color::Green, 1000)]);
    assert_eq!(controller.alarm_remaining_ms(), None);
}

#[test]
fn alarm_without_suffix_uses_default_color() {
    let (controller, _, clock) = make_controller(ControllerConfig {
        default_alarm_color: Color::Yellow,
        alarm_duration_ms: 250,
        ..ControllerConfig::default()
    });
    controller.submit_line("000001");
    clock.advance_ms(1_000);
    assert!(controller.timer_tick());
    controller.process_inputs();
    assert_eq!(queued(&controller), vec![Command::new(Color::Yellow, 250)]);
}

#[test]
fn rearming_replaces_pending_alarm() {
    let (controller, _, clock) = make_controller(ControllerConfig::default());
    controller.submit_line("000005/R");
    clock.advance_ms(1_000);
    controller.submit_line("000002/Y");

    clock.advance_ms(2_000);
    assert!(controller.timer_tick());
    clock.advance_ms(10_000);
    assert!(!controller.timer_tick());

    controller.process_inputs();
    assert_eq!(queued(&controller), vec![Command::new(Color::Yellow, 1000)]);
}

#[test]
fn invalid_alarm_reports_code_and_keeps_previous() {
    let (controller, sink, _) = make_controller(debug_config());
    controller.submit_line("000010");
    controller.submit_line("006000");
    controller.submit_line("12345");
    controller.submit_line("000000/G");
    flush_debug(&controller);

    assert!(sink.contains("UART TIME CMD parse error: code=-5 for input '006000'"));
    assert!(sink.contains("UART TIME CMD parse error: code=-2 for input '12345'"));
    assert!(sink.contains("UART TIME CMD parse error: code=-7 for input '000000/G'"));
    assert_eq!(controller.alarm_remaining_ms(), Some(10_000));
}

#[test]
fn alarm_with_unknown_color_is_ignored() {
    let (controller, sink, _) = make_controller(debug_config());
    controller.submit_line("000010/B");
    flush_debug(&controller);

    assert!(sink.contains("UART: unknown color 'B' ignored (input: '000010/B')"));
    assert_eq!(controller.alarm_remaining_ms(), None);
}

// ── Buttons ───────────────────────────────────────────────────

#[test]
fn manual_override_ignored_unless_paused() {
    let (controller, sink, _) = make_controller(debug_config());

    assert!(controller.button_pressed(ButtonId::ManualRed));
    controller.process_inputs();
    assert!(controller.context().queue.is_empty());
    flush_debug(&controller);
    assert!(sink.contains("Button1 pressed but pause inactive -> ignored"));

    controller.button_pressed(ButtonId::Pause);
    controller.button_pressed(ButtonId::ManualYellow);
    controller.button_pressed(ButtonId::ManualGreen);
    assert_eq!(controller.process_inputs(), 3);

    assert!(controller.is_paused());
    assert!(sink.contains("Button0 pressed: pause status=1"));
    assert_eq!(
        queued(&controller),
        vec![Command::new(Color::Yellow, 1000), Command::new(Color::Green, 1000)]
    );
}

#[test]
fn pause_does_not_block_serial_or_alarm() {
    let (controller, sink, clock) = make_controller(ControllerConfig {
        paused_at_boot: true,
        ..ControllerConfig::default()
    });
    controller.submit_line("R,100");
    controller.submit_line("000001/G");
    clock.advance_ms(1_000);
    controller.timer_tick();
    controller.process_inputs();

    assert_eq!(
        queued(&controller),
        vec![Command::new(Color::Red, 100), Command::new(Color::Green, 1000)]
    );

    controller.button_pressed(ButtonId::Pause);
    controller.process_inputs();
    assert!(!controller.is_paused());
    assert!(sink.contains("Button0 pressed: pause status=0"));
}

#[test]
fn debug_toggle_announces_and_discards_backlog() {
    let (controller, sink, _) = make_controller(ControllerConfig::default());

    controller.button_pressed(ButtonId::DebugToggle);
    controller.process_inputs();
    assert!(controller.is_debug_enabled());
    assert!(sink.contains("DEBUG MODE: ON"));

    controller.submit_line("R,10");
    controller.submit_line("G,10");
    assert!(controller.context().debug.backlog_len() > 0);

    controller.button_pressed(ButtonId::DebugToggle);
    controller.process_inputs();
    assert!(sink.contains("DEBUG MODE: OFF"));
    assert_eq!(controller.context().debug.backlog_len(), 0);

    sink.clear();
    flush_debug(&controller);
    assert!(sink.lines().is_empty(), "stale debug lines leaked: {:?}", sink.lines());
}

#[test]
fn full_input_channel_drops_and_counts() {
    let (controller, _, _) = make_controller(ControllerConfig::default());
    let accepted = (0..20)
        .filter(|_| controller.button_pressed(ButtonId::ManualRed))
        .count();

    assert_eq!(accepted, 16);
    assert_eq!(controller.context().inputs.dropped(), 4);
    assert_eq!(controller.process_inputs(), 16);
}
