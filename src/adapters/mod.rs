//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements     | Connects to                |
//! |------------|----------------|----------------------------|
//! | `lights`   | LightPort      | Two `embedded-hal` outputs |
//! | `log_sink` | DiagnosticSink | Serial log output          |
//! | `time`     | TimePort       | ESP32 system timer         |

pub mod lights;
pub mod log_sink;
pub mod time;
