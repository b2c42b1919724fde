//! Mock adapters for integration tests.
//!
//! Records every lamp transition with a timestamp and every diagnostic
//! line, so tests can assert on the full history without touching real
//! GPIO registers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use trafficlight::app::command::{Color, Lamp};
use trafficlight::app::ports::{DiagnosticSink, LightPort, SerialPort, TimePort};

// ── Lamp transition record ────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub lamp: Lamp,
    pub active: bool,
    pub at: Instant,
}

/// One reconstructed lane activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Activation {
    pub color: Color,
    pub on_at: Instant,
    pub off_at: Instant,
}

// ── MockLights ────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockLights {
    transitions: Arc<Mutex<Vec<Transition>>>,
}

#[allow(dead_code)]
impl MockLights {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transitions(&self) -> Vec<Transition> {
        self.transitions.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.transitions.lock().unwrap().len()
    }

    /// Block until at least `count` transitions were recorded.
    pub fn wait_for(&self, count: usize, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if self.len() >= count {
                return true;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        self.len() >= count
    }

    /// Fold the raw transitions back into lane activations.
    ///
    /// Panics if the history is not a clean alternation of "lamps on"
    /// and "the same lamps off" — i.e. if two lanes ever overlapped.
    pub fn activations(&self) -> Vec<Activation> {
        let history = self.transitions();
        let mut out = Vec::new();
        let mut i = 0;
        while i < history.len() {
            let on: Vec<_> = history[i..].iter().take_while(|t| t.active).copied().collect();
            assert!(!on.is_empty(), "lamp switched off while dark at {}", i);
            i += on.len();
            let off: Vec<_> = history[i..]
                .iter()
                .take(on.len())
                .take_while(|t| !t.active)
                .copied()
                .collect();
            assert_eq!(off.len(), on.len(), "activation at {} never completed", i);
            i += off.len();

            let lamps_on: Vec<_> = on.iter().map(|t| t.lamp).collect();
            let lamps_off: Vec<_> = off.iter().map(|t| t.lamp).collect();
            assert_eq!(lamps_on, lamps_off, "lanes overlapped");

            let color = match lamps_on.as_slice() {
                [Lamp::Red] => Color::Red,
                [Lamp::Green] => Color::Green,
                [Lamp::Red, Lamp::Green] => Color::Yellow,
                other => panic!("unexpected lamp group {:?}", other),
            };
            out.push(Activation {
                color,
                on_at: on[0].at,
                off_at: off[off.len() - 1].at,
            });
        }
        out
    }
}

impl LightPort for MockLights {
    fn set_output(&mut self, lamp: Lamp, active: bool) {
        self.transitions.lock().unwrap().push(Transition {
            lamp,
            active,
            at: Instant::now(),
        });
    }
}

// ── CollectSink ───────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct CollectSink {
    lines: Arc<Mutex<Vec<String>>>,
}

#[allow(dead_code)]
impl CollectSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.lock().unwrap().iter().any(|l| l.contains(needle))
    }

    pub fn clear(&self) {
        self.lines.lock().unwrap().clear();
    }
}

impl DiagnosticSink for CollectSink {
    fn emit(&self, text: &str) {
        self.lines.lock().unwrap().push(text.to_owned());
    }
}

// ── ManualClock ───────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct ManualClock {
    now_ms: Arc<AtomicU64>,
}

#[allow(dead_code)]
impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_ms(&self, ms: u64) {
        self.now_ms.store(ms, Ordering::SeqCst);
    }

    pub fn advance_ms(&self, ms: u64) {
        self.now_ms.fetch_add(ms, Ordering::SeqCst);
    }
}

impl TimePort for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

// ── ScriptedSerial ────────────────────────────────────────────

/// Serial port replaying a fixed byte script.
pub struct ScriptedSerial {
    bytes: std::collections::VecDeque<u8>,
}

#[allow(dead_code)]
impl ScriptedSerial {
    pub fn new(script: &[u8]) -> Self {
        Self {
            bytes: script.iter().copied().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len()
    }
}

impl SerialPort for ScriptedSerial {
    fn poll_byte(&mut self) -> Option<u8> {
        self.bytes.pop_front()
    }
}
