#![no_main]
#![no_std]

use cortex_m_rt::{entry, exception};
use defmt_rtt as _;
use panic_halt as _;

use hal::{
    flash::Flash,
    pac,
    prelude::*,
    serial::{Config as SerialConfig, Serial},
};
use stm32f7xx_hal as hal;

use pinlock::hw::{clock, BoardPins, Clock, FlashRecord, Hd44780, Usart};
use pinlock_core::{Config, Indicator, Lock};

/// Attempts at loading the PIN record before giving up and running on the cached default.
const START_ATTEMPTS: u32 = 3;

#[entry]
fn main() -> ! {
    // Peripherals
    let dp = pac::Peripherals::take().unwrap();
    let cp = cortex_m::Peripherals::take().unwrap();

    // Clocks
    let rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.freeze();
    let sysclk = clocks.sysclk().raw();

    let pins = BoardPins::new(dp.GPIOB, dp.GPIOD, dp.GPIOE);

    // LEDs
    let led = Indicator::active_high(pins.leds.green);
    let mut fault_led = pins.leds.red;
    fault_led.set_low();

    // USART3 (ST-LINK VCP)
    let usart_cfg = SerialConfig {
        baud_rate: 115_200.bps(),
        ..Default::default()
    };
    let serial = Serial::new(dp.USART3, (pins.usart3.tx, pins.usart3.rx), &clocks, usart_cfg);
    let usart = Usart::new(serial);

    // LCD
    let l = pins.lcd;
    let mut lcd = Hd44780::new(l.rs, l.en, l.d4, l.d5, l.d6, l.d7, sysclk);
    if let Err(e) = lcd.init() {
        defmt::error!("lcd init: {}", e);
    }

    // PIN record
    let store = FlashRecord::new(Flash::new(dp.FLASH));

    let clock = Clock::start(cp.SYST, sysclk);
    let config = Config::default();
    defmt::info!(
        "pinlock: {=u8} attempts, {=u16} s lockout",
        config.max_attempts,
        config.lockout_secs
    );

    let mut lock = Lock::new(usart, lcd, store, led, config);

    let mut started = false;
    for attempt in 1..=START_ATTEMPTS {
        match lock.start(clock.now()) {
            Ok(()) => {
                started = true;
                break;
            }
            Err(e) => defmt::warn!("start attempt {=u32}: {}", attempt, e),
        }
    }
    if !started {
        defmt::error!("PIN record unavailable");
        fault_led.set_high();
    }

    loop {
        if let Err(e) = lock.poll(clock.now()) {
            defmt::warn!("poll: {}", e);
        }
    }
}

#[exception]
fn SysTick() {
    clock::tick();
}
