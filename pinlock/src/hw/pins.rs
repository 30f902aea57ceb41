// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Pin definitions for the NUCLEO-F767ZI keypad lock.

use stm32f7xx_hal::{
    gpio::{gpiob, gpiod, gpioe, Alternate, Output, PushPull},
    pac,
    prelude::*,
};

/// All board pins. Construct this once at startup using:
///
/// ```ignore
/// let pins = BoardPins::new(dp.GPIOB, dp.GPIOD, dp.GPIOE);
/// ```
pub struct BoardPins {
    pub leds: LedPins,
    pub usart3: Usart3Pins,
    pub lcd: LcdPins,
}

pub struct LedPins {
    pub green: gpiob::PB0<Output<PushPull>>, // LD1, unlock indicator
    pub red: gpiob::PB14<Output<PushPull>>,  // LD3, storage fault
}

/// USART3 is routed to the ST-LINK virtual COM port.
pub struct Usart3Pins {
    pub tx: gpiod::PD8<Alternate<7>>,
    pub rx: gpiod::PD9<Alternate<7>>,
}

/// HD44780 in 4-bit mode on the CN10 header. RW is tied to ground.
pub struct LcdPins {
    pub rs: gpioe::PE7<Output<PushPull>>,
    pub en: gpioe::PE8<Output<PushPull>>,
    pub d4: gpioe::PE10<Output<PushPull>>,
    pub d5: gpioe::PE12<Output<PushPull>>,
    pub d6: gpioe::PE14<Output<PushPull>>,
    pub d7: gpioe::PE15<Output<PushPull>>,
}

impl BoardPins {
    /// Create all named pins from raw GPIO peripherals.
    pub fn new(gpiob: pac::GPIOB, gpiod: pac::GPIOD, gpioe: pac::GPIOE) -> Self {
        let gpiob = gpiob.split();
        let gpiod = gpiod.split();
        let gpioe = gpioe.split();

        Self {
            leds: LedPins {
                green: gpiob.pb0.into_push_pull_output(),
                red: gpiob.pb14.into_push_pull_output(),
            },

            usart3: Usart3Pins {
                tx: gpiod.pd8.into_alternate::<7>(),
                rx: gpiod.pd9.into_alternate::<7>(),
            },

            lcd: LcdPins {
                rs: gpioe.pe7.into_push_pull_output(),
                en: gpioe.pe8.into_push_pull_output(),
                d4: gpioe.pe10.into_push_pull_output(),
                d5: gpioe.pe12.into_push_pull_output(),
                d6: gpioe.pe14.into_push_pull_output(),
                d7: gpioe.pe15.into_push_pull_output(),
            },
        }
    }
}
