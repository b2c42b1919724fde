//! Byte-level serial input: line assembly, overflow and malformed bytes.

use trafficlight::app::command::{Color, Command};
use trafficlight::app::service::Controller;
use trafficlight::config::{ControllerConfig, LINE_BUFFER_LEN};
use trafficlight::drivers::uart::pump_serial;
use trafficlight::parser::LineBuffer;

use super::mock_hw::{CollectSink, ManualClock, MockLights, ScriptedSerial};

fn make_controller() -> (Controller, CollectSink) {
    let sink = CollectSink::new();
    let config = ControllerConfig {
        debug_enabled_at_boot: true,
        ..ControllerConfig::default()
    };
    let controller = Controller::new(config, MockLights::new(), sink.clone(), ManualClock::new())
        .expect("valid config");
    (controller, sink)
}

fn flush_debug(controller: &Controller) {
    let ctx = controller.context();
    while ctx.debug.try_drain_one(ctx.sink()) {}
}

#[test]
fn mixed_terminators_split_lines() {
    let (controller, _) = make_controller();
    let mut serial = ScriptedSerial::new(b"R,100\r\nG\n\r\nY,5\rG,7");
    let mut buffer = LineBuffer::<LINE_BUFFER_LEN>::new();

    assert_eq!(pump_serial(&controller, &mut serial, &mut buffer), 3);
    assert_eq!(serial.remaining(), 0);
    assert_eq!(buffer.pending(), 3, "unterminated line stays buffered");

    let queue = &controller.context().queue;
    let queued: Vec<_> = std::iter::from_fn(|| queue.try_pop()).collect();
    assert_eq!(
        queued,
        vec![
            Command::new(Color::Red, 100),
            Command::new(Color::Green, 1000),
            Command::new(Color::Yellow, 5),
        ]
    );
}

#[test]
fn overlong_line_is_dropped_and_reading_restarts() {
    let (controller, sink) = make_controller();
    // A full buffer plus one overflowing byte, then a fresh command on
    // the same physical line.
    let mut script = vec![b'x'; LINE_BUFFER_LEN + 1];
    script.extend_from_slice(b"R,5\rG,10\n");
    let mut serial = ScriptedSerial::new(&script);
    let mut buffer = LineBuffer::<LINE_BUFFER_LEN>::new();

    assert_eq!(pump_serial(&controller, &mut serial, &mut buffer), 3);
    flush_debug(&controller);

    assert!(sink.contains("UART: input too long, dropping buffer"));
    let queue = &controller.context().queue;
    assert_eq!(queue.try_pop(), Some(Command::new(Color::Red, 5)));
    assert_eq!(queue.try_pop(), Some(Command::new(Color::Green, 10)));
    assert_eq!(queue.try_pop(), None);
}

#[test]
fn longest_line_fits_the_buffer() {
    let (controller, sink) = make_controller();
    let mut script = b"R,".to_vec();
    script.resize(LINE_BUFFER_LEN, b'0');
    script.push(b'\n');
    let mut serial = ScriptedSerial::new(&script);
    let mut buffer = LineBuffer::<LINE_BUFFER_LEN>::new();

    assert_eq!(pump_serial(&controller, &mut serial, &mut buffer), 1);
    flush_debug(&controller);

    assert!(!sink.contains("input too long"));
    assert_eq!(
        controller.context().queue.try_pop(),
        Some(Command::new(Color::Red, 0))
    );
}

#[test]
fn non_utf8_line_is_rejected() {
    let (controller, sink) = make_controller();
    let mut serial = ScriptedSerial::new(b"R,\xff\xfe\n");
    let mut buffer = LineBuffer::<LINE_BUFFER_LEN>::new();

    assert_eq!(pump_serial(&controller, &mut serial, &mut buffer), 1);
    flush_debug(&controller);

    assert!(controller.context().queue.is_empty());
    assert!(sink.contains("UART: unknown or malformed command"));
}
