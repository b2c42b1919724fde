//! Lamp adapter — bridges two GPIO outputs to [`LightPort`].
//!
//! Generic over any `embedded-hal` output pin so the same adapter
//! drives ESP-IDF `PinDriver`s on target and recording mocks on host.
//! Pin errors are logged and swallowed; a lamp that fails to switch
//! must not stall the lane that drove it.

use embedded_hal::digital::OutputPin;
use log::warn;

use crate::app::command::Lamp;
use crate::app::ports::LightPort;

pub struct PinLights<R, G> {
    red: R,
    green: G,
}

impl<R: OutputPin, G: OutputPin> PinLights<R, G> {
    /// Take ownership of both pins and drive them low.
    pub fn new(red: R, green: G) -> Self {
        let mut lights = Self { red, green };
        drive(&mut lights.red, Lamp::Red, false);
        drive(&mut lights.green, Lamp::Green, false);
        lights
    }
}

fn drive<P: OutputPin>(pin: &mut P, lamp: Lamp, active: bool) {
    let result = if active { pin.set_high() } else { pin.set_low() };
    if let Err(e) = result {
        warn!("lights: {:?} pin write failed: {:?}", lamp, e);
    }
}

impl<R, G> LightPort for PinLights<R, G>
where
    R: OutputPin + Send,
    G: OutputPin + Send,
{
    fn set_output(&mut self, lamp: Lamp, active: bool) {
        match lamp {
            Lamp::Red => drive(&mut self.red, lamp, active),
            Lamp::Green => drive(&mut self.green, lamp, active),
        }
    }
}
