#![no_std]
#![no_main]

/*
 * Firmware entry point: one cooperative super-loop gated to a 10 ms tick.
 * All decisions live in crossing-core; this file only owns the clock and
 * shovels levels between the pins and the controller.
 */

use defmt::info;
use defmt_rtt as _;
use panic_probe as _;

use embassy_executor::Spawner;
use embassy_time::Instant;

use crossing_core::{Controller, TICK_MS, TICKS_PER_SECOND};

mod io;
use io::Board;

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let peripherals = embassy_stm32::init(Default::default());
    let mut board = Board::new(peripherals);
    let mut controller = Controller::new(TICKS_PER_SECOND);

    info!("crossing controller up, {} ms tick", TICK_MS);

    let mut last_phase = controller.phase();
    let mut last_mode = controller.mode();
    let mut last_tick = Instant::now().as_millis() as u32;

    loop {
        // Busy-poll the millisecond clock. Unsigned subtraction keeps the
        // elapsed comparison correct across counter wraparound, and the
        // gate advances by exactly one period so ticks do not drift.
        let now = Instant::now().as_millis() as u32;
        if now.wrapping_sub(last_tick) < TICK_MS {
            continue;
        }
        last_tick = last_tick.wrapping_add(TICK_MS);

        let outputs = controller.tick(board.read_buttons());

        board.set_lamps(&outputs.lamps);
        if let Some(position) = outputs.scan {
            board.show_digit(position, outputs.digits[position]);
        }

        if controller.phase() != last_phase {
            last_phase = controller.phase();
            info!("phase {}", last_phase);
        }
        if controller.mode() != last_mode {
            last_mode = controller.mode();
            info!("mode {}", last_mode);
        }
    }
}
