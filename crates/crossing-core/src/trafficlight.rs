//! The four-phase timing state machine for the two approaches.

use crate::durations::Durations;

/// Lamp color shown by one approach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Color {
    Red,
    Yellow,
    Green,
}

/// One of the four fixed main/sub combinations, named after the approach
/// that is currently non-red. The other approach always shows red.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    MainGreen,
    MainYellow,
    SubGreen,
    SubYellow,
}

impl Phase {
    /*
     * Determine the phase that follows this one. The cycle is strict: the
     * sub approach gets its green only after the main approach has gone
     * through yellow back to red, and vice versa.
     */
    fn next(self) -> Phase {
        match self {
            Phase::MainGreen => Phase::MainYellow,
            Phase::MainYellow => Phase::SubGreen,
            Phase::SubGreen => Phase::SubYellow,
            Phase::SubYellow => Phase::MainGreen,
        }
    }

    pub fn main_color(self) -> Color {
        match self {
            Phase::MainGreen => Color::Green,
            Phase::MainYellow => Color::Yellow,
            Phase::SubGreen | Phase::SubYellow => Color::Red,
        }
    }

    pub fn sub_color(self) -> Color {
        match self {
            Phase::SubGreen => Color::Green,
            Phase::SubYellow => Color::Yellow,
            Phase::MainGreen | Phase::MainYellow => Color::Red,
        }
    }
}

/// The state machine proper: current phase plus the two countdowns, in
/// ticks. Countdowns are floored at 0 by [`TrafficLight::tick`]; they are
/// never negative.
#[derive(Debug, Clone, Copy)]
pub struct TrafficLight {
    phase: Phase,
    remain_main: i32,
    remain_sub: i32,
}

impl TrafficLight {
    /// Power-on state: main approach green, both countdowns full.
    pub fn new(durations: &Durations, ticks_per_second: i32) -> Self {
        Self::restart_at(Phase::MainGreen, durations, ticks_per_second)
    }

    /// Initialize the countdowns for an arbitrary starting phase using the
    /// same pairing as the transition table. Starting in a yellow phase,
    /// the red-side countdown is the red duration minus the green already
    /// notionally elapsed; if the configuration makes that negative, fall
    /// back to the phase's own full duration.
    pub fn restart_at(phase: Phase, durations: &Durations, t: i32) -> Self {
        let red = durations.ticks(Color::Red, t);
        let yellow = durations.ticks(Color::Yellow, t);
        let green = durations.ticks(Color::Green, t);

        let (remain_main, remain_sub) = match phase {
            Phase::MainGreen => (green, red),
            Phase::MainYellow => {
                let offset = red - green;
                (yellow, if offset < 0 { yellow } else { offset })
            }
            Phase::SubGreen => (red, green),
            Phase::SubYellow => {
                let offset = red - green;
                (if offset < 0 { yellow } else { offset }, yellow)
            }
        };

        TrafficLight {
            phase,
            remain_main,
            remain_sub,
        }
    }

    /// Re-enter normal operation after a duration edit: the phase whose
    /// duration was edited becomes active with a full countdown, and the
    /// paired approach gets its full countdown too.
    pub fn after_edit(edited: Color, durations: &Durations, t: i32) -> Self {
        let (phase, remain_main, remain_sub) = match edited {
            Color::Red => (
                Phase::SubGreen,
                durations.ticks(Color::Red, t),
                durations.ticks(Color::Green, t),
            ),
            Color::Yellow => (
                Phase::MainYellow,
                durations.ticks(Color::Yellow, t),
                durations.ticks(Color::Red, t),
            ),
            Color::Green => (
                Phase::MainGreen,
                durations.ticks(Color::Green, t),
                durations.ticks(Color::Red, t),
            ),
        };

        TrafficLight {
            phase,
            remain_main,
            remain_sub,
        }
    }

    /// Advance one tick: decrement both countdowns (flooring at 0), then
    /// transition if the countdown governing the current phase has run out
    /// and reload per the cycle table.
    pub fn tick(&mut self, durations: &Durations, t: i32) {
        if self.remain_main > 0 {
            self.remain_main -= 1;
        }
        if self.remain_sub > 0 {
            self.remain_sub -= 1;
        }

        match self.phase {
            Phase::MainGreen => {
                if self.remain_main <= 0 {
                    self.phase = self.phase.next();
                    self.remain_main = durations.ticks(Color::Yellow, t);
                }
            }
            Phase::MainYellow => {
                if self.remain_main <= 0 {
                    self.phase = self.phase.next();
                    self.remain_main = durations.ticks(Color::Red, t);
                    self.remain_sub = durations.ticks(Color::Green, t);
                }
            }
            Phase::SubGreen => {
                if self.remain_sub <= 0 {
                    self.phase = self.phase.next();
                    self.remain_sub = durations.ticks(Color::Yellow, t);
                }
            }
            Phase::SubYellow => {
                if self.remain_sub <= 0 {
                    self.phase = self.phase.next();
                    self.remain_main = durations.ticks(Color::Green, t);
                    self.remain_sub = durations.ticks(Color::Red, t);
                }
            }
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn remain_main(&self) -> i32 {
        self.remain_main
    }

    pub fn remain_sub(&self) -> i32 {
        self.remain_sub
    }
}
