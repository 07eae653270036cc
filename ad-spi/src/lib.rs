//! # Register definitions for the AD53x8 and AD7811 interface controllers
//!
//! Both chips sit behind a small FIFO-buffered SPI interface controller which is mapped into the
//! processor address space. This crate describes the register blocks of those controllers and the
//! command words understood by the chips themselves. It does not contain any driver logic, see
//! the `ad-spi-hal` crate for that.
//!
//! The base address of a controller instance depends on the FPGA design and must be supplied by
//! the user.
#![no_std]

pub mod adc;
pub mod dac;
