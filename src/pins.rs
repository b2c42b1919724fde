//! GPIO / peripheral pin assignments for the traffic light board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

use crate::events::ButtonId;

// ---------------------------------------------------------------------------
// Lamps (active HIGH, driven through transistor stages)
// ---------------------------------------------------------------------------

pub const LED_RED_GPIO: i32 = 2;
pub const LED_GREEN_GPIO: i32 = 4;

// ---------------------------------------------------------------------------
// Buttons (active HIGH with pull-down, rising-edge interrupt)
// ---------------------------------------------------------------------------

/// Toggles pause / manual override mode.
pub const BUTTON_PAUSE_GPIO: i32 = 13;
pub const BUTTON_RED_GPIO: i32 = 12;
pub const BUTTON_YELLOW_GPIO: i32 = 14;
pub const BUTTON_GREEN_GPIO: i32 = 27;
/// Toggles the debug log.
pub const BUTTON_DEBUG_GPIO: i32 = 26;

/// Pin for every button, indexed by [`ButtonId::index`].
pub const BUTTON_GPIOS: [i32; 5] = [
    BUTTON_PAUSE_GPIO,
    BUTTON_RED_GPIO,
    BUTTON_YELLOW_GPIO,
    BUTTON_GREEN_GPIO,
    BUTTON_DEBUG_GPIO,
];

/// Which button is wired to `gpio`.
pub fn button_for_gpio(gpio: i32) -> Option<ButtonId> {
    BUTTON_GPIOS
        .iter()
        .position(|&pin| pin == gpio)
        .map(|i| ButtonId::ALL[i])
}

// ---------------------------------------------------------------------------
// UART console
// ---------------------------------------------------------------------------

pub const UART_TX_GPIO: i32 = 1;
pub const UART_RX_GPIO: i32 = 3;
pub const UART_BAUD: u32 = 115_200;
