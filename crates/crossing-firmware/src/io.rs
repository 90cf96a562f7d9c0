/*
 * The I/O module for the crossing controller.
 *
 * This module is the only part of the program that is device-specific: it
 * owns every pin and translates between the core's channel enumerations
 * (lamps, buttons, digits) and the actual GPIO lines of the board. The
 * control logic never sees a pin number.
 *
 * Wiring: traffic lamps on PA8..PA13 (active high, in `Lamp` order),
 * 7-segment data lines on PB0..PB7 (active low), digit enables on PA0..PA3
 * (active low, one asserted at a time), buttons on PB13..PB15 (pull-up,
 * pressed pulls the line low).
 */

use embassy_stm32::Peripherals;
use embassy_stm32::gpio::{Input, Level, Output, Pin, Pull, Speed};
use enum_ordinalize::Ordinalize;

use crossing_core::Lamp;
use crossing_core::buttons::BUTTON_COUNT;
use crossing_core::display::DIGIT_COUNT;

const SEGMENT_COUNT: usize = 8;

// Glyphs for 0..9 on the common-anode display, one bit per segment line
// PB0..PB7. A low line lights the segment.
const SEG_PATTERNS: [u8; 10] = [
    0xC0, 0xF9, 0xA4, 0xB0, 0x99, 0x92, 0x82, 0xF8, 0x80, 0x90,
];

// Deal with active-high or active-low at this boundary, so that the control
// logic can just use easy to understand `true` for on logic.
fn light(pin: &mut Output, on: bool) {
    pin.set_level(if on { Level::High } else { Level::Low });
}

pub struct Board {
    lamps: [Output<'static>; Lamp::VARIANT_COUNT],
    segments: [Output<'static>; SEGMENT_COUNT],
    digit_enables: [Output<'static>; DIGIT_COUNT],
    buttons: [Input<'static>; BUTTON_COUNT],
}

impl Board {
    pub fn new(p: Peripherals) -> Self {
        let lamps = [
            Output::new(p.PA8.degrade(), Level::Low, Speed::Low),
            Output::new(p.PA9.degrade(), Level::Low, Speed::Low),
            Output::new(p.PA10.degrade(), Level::Low, Speed::Low),
            Output::new(p.PA11.degrade(), Level::Low, Speed::Low),
            Output::new(p.PA12.degrade(), Level::Low, Speed::Low),
            Output::new(p.PA13.degrade(), Level::Low, Speed::Low),
        ];

        // Everything idles high: segments dark, no digit enabled.
        let segments = [
            Output::new(p.PB0.degrade(), Level::High, Speed::Low),
            Output::new(p.PB1.degrade(), Level::High, Speed::Low),
            Output::new(p.PB2.degrade(), Level::High, Speed::Low),
            Output::new(p.PB3.degrade(), Level::High, Speed::Low),
            Output::new(p.PB4.degrade(), Level::High, Speed::Low),
            Output::new(p.PB5.degrade(), Level::High, Speed::Low),
            Output::new(p.PB6.degrade(), Level::High, Speed::Low),
            Output::new(p.PB7.degrade(), Level::High, Speed::Low),
        ];
        let digit_enables = [
            Output::new(p.PA0.degrade(), Level::High, Speed::Low),
            Output::new(p.PA1.degrade(), Level::High, Speed::Low),
            Output::new(p.PA2.degrade(), Level::High, Speed::Low),
            Output::new(p.PA3.degrade(), Level::High, Speed::Low),
        ];

        let buttons = [
            Input::new(p.PB13.degrade(), Pull::Up),
            Input::new(p.PB14.degrade(), Pull::Up),
            Input::new(p.PB15.degrade(), Pull::Up),
        ];

        Board {
            lamps,
            segments,
            digit_enables,
            buttons,
        }
    }

    /// Raw button levels in `ButtonId` order, `true` meaning pressed.
    pub fn read_buttons(&self) -> [bool; BUTTON_COUNT] {
        [
            self.buttons[0].is_low(),
            self.buttons[1].is_low(),
            self.buttons[2].is_low(),
        ]
    }

    /// Drive all six lamps from the per-tick level vector.
    pub fn set_lamps(&mut self, levels: &[bool; Lamp::VARIANT_COUNT]) {
        for (pin, on) in self.lamps.iter_mut().zip(levels) {
            light(pin, *on);
        }
    }

    /// Rotate the multiplexed display: disable every digit, put `value` on
    /// the segment lines, then enable the one digit at `position`. A value
    /// above 9 cannot be rendered and faults here rather than showing a
    /// garbage glyph.
    pub fn show_digit(&mut self, position: usize, value: u8) {
        let pattern = SEG_PATTERNS[usize::from(value)];

        for enable in self.digit_enables.iter_mut() {
            enable.set_high();
        }
        for (bit, line) in self.segments.iter_mut().enumerate() {
            light(line, pattern & (1 << bit) != 0);
        }
        self.digit_enables[position].set_low();
    }
}
