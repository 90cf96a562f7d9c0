//! The control-loop context: all state the loop carries between ticks, and
//! the one `tick` entry point that advances it.

use enum_ordinalize::Ordinalize;

use crate::TICK_MS;
use crate::buttons::{BUTTON_COUNT, ButtonBank, ButtonId};
use crate::display::{self, DIGIT_COUNT, DigitScanner};
use crate::durations::Durations;
use crate::mode::{Blink, Mode};
use crate::trafficlight::{Color, Phase, TrafficLight};

/// Every physical lamp on the crossing, one per approach and color. The
/// ordinal doubles as the index into the per-tick level array and into the
/// firmware's pin table.
#[derive(Ordinalize, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(usize)]
pub enum Lamp {
    MainRed,
    MainYellow,
    MainGreen,
    SubRed,
    SubYellow,
    SubGreen,
}

fn main_lamp(color: Color) -> Lamp {
    match color {
        Color::Red => Lamp::MainRed,
        Color::Yellow => Lamp::MainYellow,
        Color::Green => Lamp::MainGreen,
    }
}

fn sub_lamp(color: Color) -> Lamp {
    match color {
        Color::Red => Lamp::SubRed,
        Color::Yellow => Lamp::SubYellow,
        Color::Green => Lamp::SubGreen,
    }
}

/// What one tick asks the hardware to do. The lamp vector is complete every
/// tick; a lamp lit by a previous mode can never linger.
pub struct TickOutputs {
    pub lamps: [bool; Lamp::VARIANT_COUNT],
    pub digits: [u8; DIGIT_COUNT],
    /// `Some(position)` when the display should rotate to the next digit.
    pub scan: Option<usize>,
}

/// All control-loop state. Constructed once at power-on; the loop holds the
/// only reference and calls [`Controller::tick`] every 10 ms.
pub struct Controller {
    buttons: ButtonBank,
    durations: Durations,
    trafficlight: TrafficLight,
    mode: Mode,
    blink: Blink,
    digits: [u8; DIGIT_COUNT],
    scanner: DigitScanner,
    ticks_per_second: i32,
}

impl Controller {
    pub fn new(ticks_per_second: i32) -> Self {
        let durations = Durations::default();
        Controller {
            buttons: ButtonBank::new(),
            trafficlight: TrafficLight::new(&durations, ticks_per_second),
            durations,
            mode: Mode::Normal,
            blink: Blink::default(),
            digits: [0; DIGIT_COUNT],
            scanner: DigitScanner::new(),
            ticks_per_second,
        }
    }

    /// Advance the whole system one tick. `raw` holds the physical button
    /// levels in [`ButtonId`] order, `true` meaning pressed.
    pub fn tick(&mut self, raw: [bool; BUTTON_COUNT]) -> TickOutputs {
        self.buttons.sample(raw, self.ticks_per_second as u32);

        // Every edge is consumed exactly once per tick; an edge that the
        // current mode gives no meaning to is discarded rather than left
        // latched for a later mode.
        let mode_pressed = self.buttons.take_pressed(ButtonId::Mode);
        let adjust_pressed = self.buttons.take_pressed(ButtonId::Adjust);
        let confirm_pressed = self.buttons.take_pressed(ButtonId::Confirm);

        if mode_pressed {
            self.mode = self.mode.next();
        }

        let mut lamps = [false; Lamp::VARIANT_COUNT];

        match self.mode.editing() {
            None => {
                self.trafficlight.tick(&self.durations, self.ticks_per_second);
                self.light_phase(&mut lamps);
                self.digits = display::normal_digits(
                    self.trafficlight.remain_main(),
                    self.trafficlight.remain_sub(),
                    self.ticks_per_second,
                );
            }
            Some(edited) => {
                self.blink.tick(TICK_MS);

                if adjust_pressed {
                    self.durations.bump(edited);
                }

                if confirm_pressed {
                    self.trafficlight =
                        TrafficLight::after_edit(edited, &self.durations, self.ticks_per_second);
                    self.mode = Mode::Normal;
                    self.light_phase(&mut lamps);
                    self.digits = display::normal_digits(
                        self.trafficlight.remain_main(),
                        self.trafficlight.remain_sub(),
                        self.ticks_per_second,
                    );
                } else {
                    // Flash the two lamps of the color under edit, in phase.
                    if self.blink.is_on() {
                        lamps[main_lamp(edited).ordinal()] = true;
                        lamps[sub_lamp(edited).ordinal()] = true;
                    }
                    self.digits =
                        display::setting_digits(self.mode, self.durations.get(edited));
                }
            }
        }

        TickOutputs {
            lamps,
            digits: self.digits,
            scan: self.scanner.tick(),
        }
    }

    fn light_phase(&self, lamps: &mut [bool; Lamp::VARIANT_COUNT]) {
        let phase = self.trafficlight.phase();
        lamps[main_lamp(phase.main_color()).ordinal()] = true;
        lamps[sub_lamp(phase.sub_color()).ordinal()] = true;
    }

    pub fn phase(&self) -> Phase {
        self.trafficlight.phase()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn durations(&self) -> &Durations {
        &self.durations
    }

    pub fn remain_main(&self) -> i32 {
        self.trafficlight.remain_main()
    }

    pub fn remain_sub(&self) -> i32 {
        self.trafficlight.remain_sub()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TICKS_PER_SECOND;

    const IDLE: [bool; BUTTON_COUNT] = [false; BUTTON_COUNT];

    fn press(controller: &mut Controller, id: ButtonId) {
        let mut raw = IDLE;
        raw[id as usize] = true;
        // Two identical samples to debounce the press, two to release.
        controller.tick(raw);
        controller.tick(raw);
        controller.tick(IDLE);
        controller.tick(IDLE);
    }

    fn lamp_on(outputs: &TickOutputs, lamp: Lamp) -> bool {
        outputs.lamps[lamp.ordinal()]
    }

    #[test]
    fn normal_mode_drives_the_phase_lamps() {
        let mut controller = Controller::new(TICKS_PER_SECOND);
        let outputs = controller.tick(IDLE);

        assert_eq!(controller.phase(), Phase::MainGreen);
        assert!(lamp_on(&outputs, Lamp::MainGreen));
        assert!(lamp_on(&outputs, Lamp::SubRed));
        for lamp in [Lamp::MainRed, Lamp::MainYellow, Lamp::SubYellow, Lamp::SubGreen] {
            assert!(!lamp_on(&outputs, lamp));
        }
    }

    #[test]
    fn a_button_held_down_registers_a_single_press() {
        let mut controller = Controller::new(TICKS_PER_SECOND);
        let mut raw = IDLE;
        raw[ButtonId::Mode as usize] = true;
        for _ in 0..30 {
            controller.tick(raw);
        }
        assert_eq!(controller.mode(), Mode::SetRed);
    }

    #[test]
    fn the_mode_button_cycles_with_period_four() {
        let mut controller = Controller::new(TICKS_PER_SECOND);
        assert_eq!(controller.mode(), Mode::Normal);
        for expected in [Mode::SetRed, Mode::SetYellow, Mode::SetGreen, Mode::Normal] {
            press(&mut controller, ButtonId::Mode);
            assert_eq!(controller.mode(), expected);
        }
    }

    #[test]
    fn setting_mode_shows_the_mode_index_and_the_edited_duration() {
        let mut controller = Controller::new(TICKS_PER_SECOND);
        press(&mut controller, ButtonId::Mode);
        let outputs = controller.tick(IDLE);
        // Red defaults to 5 seconds; SetRed displays as mode 2.
        assert_eq!(outputs.digits, [0, 2, 0, 5]);
    }

    #[test]
    fn adjusting_then_confirming_reenters_normal_in_the_edited_phase() {
        let mut controller = Controller::new(TICKS_PER_SECOND);
        for _ in 0..3 {
            press(&mut controller, ButtonId::Mode);
        }
        assert_eq!(controller.mode(), Mode::SetGreen);

        // Green defaults to 3; four bumps make it 7.
        for _ in 0..4 {
            press(&mut controller, ButtonId::Adjust);
        }
        assert_eq!(controller.durations().green, 7);

        press(&mut controller, ButtonId::Confirm);
        assert_eq!(controller.mode(), Mode::Normal);
        assert_eq!(controller.phase(), Phase::MainGreen);
        // The countdown was reloaded from the edited duration, minus the
        // ticks already spent back in normal mode during the release.
        assert_eq!(controller.remain_main(), 7 * TICKS_PER_SECOND - 2);
        assert_eq!(controller.remain_sub(), 5 * TICKS_PER_SECOND - 2);
    }

    #[test]
    fn leaving_setting_mode_with_the_mode_button_resumes_the_frozen_countdown() {
        let mut controller = Controller::new(TICKS_PER_SECOND);
        for _ in 0..100 {
            controller.tick(IDLE);
        }
        let frozen = controller.remain_main();

        press(&mut controller, ButtonId::Mode);
        for _ in 0..25 {
            controller.tick(IDLE);
        }
        for _ in 0..3 {
            press(&mut controller, ButtonId::Mode);
        }

        assert_eq!(controller.phase(), Phase::MainGreen);
        // The machine only advanced on the ticks actually spent in normal
        // mode: one before the first press registered, three after the
        // last one did.
        assert_eq!(controller.remain_main(), frozen - 4);
    }

    #[test]
    fn the_lamps_of_the_edited_duration_blink_in_setting_mode() {
        let mut controller = Controller::new(TICKS_PER_SECOND);
        press(&mut controller, ButtonId::Mode);
        assert_eq!(controller.mode(), Mode::SetRed);

        let mut outputs = controller.tick(IDLE);
        for _ in 0..50 {
            outputs = controller.tick(IDLE);
        }
        assert!(lamp_on(&outputs, Lamp::MainRed));
        assert!(lamp_on(&outputs, Lamp::SubRed));
        for lamp in [Lamp::MainYellow, Lamp::MainGreen, Lamp::SubYellow, Lamp::SubGreen] {
            assert!(!lamp_on(&outputs, lamp));
        }

        for _ in 0..50 {
            outputs = controller.tick(IDLE);
        }
        assert!(!lamp_on(&outputs, Lamp::MainRed));
        assert!(!lamp_on(&outputs, Lamp::SubRed));
    }

    #[test]
    fn the_digits_keep_changing_while_the_crossing_runs() {
        let mut controller = Controller::new(TICKS_PER_SECOND);
        let first = controller.tick(IDLE).digits;
        let mut changed = false;
        for _ in 0..2 * TICKS_PER_SECOND {
            if controller.tick(IDLE).digits != first {
                changed = true;
            }
        }
        assert!(changed, "display froze");
    }
}
