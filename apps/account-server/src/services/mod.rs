//! Background services.

mod birthday_sweep;

pub use birthday_sweep::*;
