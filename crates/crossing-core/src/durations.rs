//! The three configurable phase durations, in whole seconds.

use crate::trafficlight::Color;

/// Shortest allowed phase, in seconds. A phase can never be configured away
/// entirely.
pub const MIN_SECONDS: u8 = 1;
/// Longest allowed phase: two digits on the display.
pub const MAX_SECONDS: u8 = 99;

/// Per-color phase lengths. Mutated only while the matching setting mode is
/// active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Durations {
    pub red: u8,
    pub yellow: u8,
    pub green: u8,
}

impl Default for Durations {
    /// Built-in durations used until the operator configures their own.
    fn default() -> Self {
        Durations {
            red: 5,
            yellow: 2,
            green: 3,
        }
    }
}

impl Durations {
    pub fn get(&self, color: Color) -> u8 {
        match color {
            Color::Red => self.red,
            Color::Yellow => self.yellow,
            Color::Green => self.green,
        }
    }

    /// Increment one duration, wrapping 99 → 1.
    pub fn bump(&mut self, color: Color) {
        let slot = match color {
            Color::Red => &mut self.red,
            Color::Yellow => &mut self.yellow,
            Color::Green => &mut self.green,
        };
        *slot = *slot % MAX_SECONDS + MIN_SECONDS;
    }

    /// Duration in ticks for one color.
    pub fn ticks(&self, color: Color, ticks_per_second: i32) -> i32 {
        i32::from(self.get(color)) * ticks_per_second
    }
}
