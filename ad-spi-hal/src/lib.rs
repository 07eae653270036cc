//! # Drivers for the AD53x8 DAC and AD7811 ADC
//!
//! This crate builds blocking drivers on top of the [register definitions](ad_spi) of the FIFO
//! based SPI interface controllers which connect the two chips to the processor.
//!
//! The layers are composed instead of stacked:
//!
//! - [regs::RegisterSpace] is the minimal read/write-word-at-offset capability. [regs::Mmio]
//!   implements it with volatile accesses to a base address.
//! - [fifo::FifoSync] polls the status register of a controller until a FIFO flag clears.
//! - [dac::Ad53x8] and [adc::Ad7811] encode the chip command words and sequence the chip
//!   initialization.
//!
//! All waits are busy-waits without a timeout by default. The `try_*` variants take a poll limit
//! for callers which need to bound the wait time.
#![no_std]

#[cfg(test)]
extern crate std;

pub use ad_spi as pac;

pub mod adc;
pub mod dac;
pub mod fifo;
pub mod regs;

pub use adc::Ad7811;
pub use dac::Ad53x8;
pub use fifo::{FifoSync, FifoTimeoutError};
pub use regs::{Mmio, RegisterSpace};
