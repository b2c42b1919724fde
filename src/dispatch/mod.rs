//! Command dispatch: queue, lane gates, dispatcher and lane workers.
//!
//! ```text
//!  producers ──▶ CommandQueue ──▶ Dispatcher ──▶ ColorGate[R|Y|G] ──▶ LaneWorker
//!                                     ▲                                  │
//!                                     └────────── CompletionGate ◀───────┘
//! ```

pub mod dispatcher;
pub mod gate;
pub mod lane;
pub mod queue;
