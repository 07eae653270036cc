//! AD7811 ADC driver.
//!
//! Every transaction is a command word written to the TX FIFO, followed by the conversion result
//! which arrives in the RX FIFO.
use ad_spi::adc::{
    AdcInterface, CTRL_OFFSET, Command, Control, RX_FIFO_OFFSET, STAT_OFFSET, STATUS_RX_EMPTY,
    SpiSpeed, TX_FIFO_OFFSET,
};

use crate::fifo::{FifoSync, FifoTimeoutError};
use crate::regs::{Mmio, RegisterSpace};

/// Driver for the AD7811 ADC interface controller.
#[derive(Debug)]
pub struct Ad7811<R> {
    fifo: FifoSync<R>,
}

impl Ad7811<Mmio> {
    /// Create a driver for the interface controller at `base_addr`.
    ///
    /// # Safety
    ///
    /// See [Mmio::new].
    pub unsafe fn new_mmio_at(base_addr: usize) -> Self {
        Self::new(Mmio::from(unsafe { AdcInterface::new_mmio_at(base_addr) }))
    }
}

impl<R: RegisterSpace> Ad7811<R> {
    #[inline]
    pub const fn new(regs: R) -> Self {
        Self {
            fifo: FifoSync::new(regs),
        }
    }

    /// Select fast SPI timing and wake the chip up.
    ///
    /// The first command word only serves to let the chip go through its power-up time, the
    /// returned conversion result is discarded.
    pub fn init(&mut self) {
        self.set_speed(SpiSpeed::Fast);
        let _ = self.transact(Command::power_up());
        log::debug!("AD7811 init done");
    }

    #[inline]
    pub fn set_speed(&mut self, speed: SpiSpeed) {
        self.fifo
            .write(CTRL_OFFSET, Control::DEFAULT.with_speed(speed).raw_value());
    }

    /// Write a command word and return the word shifted back by the chip.
    ///
    /// The TX FIFO is not checked before the write, the controller is expected to accept a
    /// command at any time after [Self::init].
    pub fn transact(&mut self, cmd: Command) -> u32 {
        log::trace!("AD7811 command {:#05x}", cmd.raw_value());
        self.fifo.write(TX_FIFO_OFFSET, cmd.raw_value());
        self.fifo.wait_rx_ready(STAT_OFFSET, STATUS_RX_EMPTY);
        self.fifo.read(RX_FIFO_OFFSET)
    }

    /// [Self::transact] with a bounded wait for the reply.
    ///
    /// On timeout the command has already been sent, so the reply may still show up in the RX
    /// FIFO later.
    pub fn try_transact(&mut self, cmd: Command, max_polls: u32) -> Result<u32, FifoTimeoutError> {
        log::trace!("AD7811 command {:#05x}", cmd.raw_value());
        self.fifo.write(TX_FIFO_OFFSET, cmd.raw_value());
        self.fifo
            .try_wait_rx_ready(STAT_OFFSET, STATUS_RX_EMPTY, max_polls)?;
        Ok(self.fifo.read(RX_FIFO_OFFSET))
    }

    /// Convert a single-ended channel using the external reference.
    ///
    /// `channel` is masked to 2 bits. The raw reading is returned without any scaling.
    #[inline]
    pub fn read_channel(&mut self, channel: u8) -> u32 {
        self.transact(Command::read_channel(channel))
    }

    /// Like [Self::read_channel], but with the differential input mode selected.
    #[inline]
    pub fn read_channel_differential(&mut self, channel: u8) -> u32 {
        self.transact(Command::read_channel(channel).with_differential(true))
    }

    #[inline]
    pub fn regs(&self) -> &R {
        self.fifo.regs()
    }

    #[inline]
    pub fn release(self) -> R {
        self.fifo.release()
    }
}
