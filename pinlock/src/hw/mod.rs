pub mod clock;
pub mod flash;
pub mod lcd;
pub mod pins;
pub mod usart;

pub use clock::Clock;
pub use flash::FlashRecord;
pub use lcd::Hd44780;
pub use pins::BoardPins;
pub use usart::Usart;
