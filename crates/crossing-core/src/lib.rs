#![no_std]

//! Control logic for a two-approach traffic crossing with a 4-digit
//! countdown display and button-driven duration configuration.
//!
//! Everything in this crate is hardware-free: it consumes raw button levels
//! and a tick cadence, and produces lamp levels and display digits. The
//! firmware crate owns the pins and the clock and calls [`Controller::tick`]
//! every 10 ms.

pub mod buttons;
pub mod controller;
pub mod display;
pub mod durations;
pub mod mode;
pub mod trafficlight;

pub use buttons::{Button, ButtonBank, ButtonId};
pub use controller::{Controller, Lamp, TickOutputs};
pub use display::DigitScanner;
pub use durations::Durations;
pub use mode::{Blink, Mode};
pub use trafficlight::{Color, Phase, TrafficLight};

/// Control loop period in milliseconds.
pub const TICK_MS: u32 = 10;

/// Ticks per wall-clock second at the nominal loop period.
pub const TICKS_PER_SECOND: i32 = (1000 / TICK_MS) as i32;
