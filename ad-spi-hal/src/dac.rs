//! AD53x8 DAC driver.
//!
//! The DAC is write-only from the point of view of the interface controller. Every command word
//! is pushed into the TX FIFO once the FIFO has room, there is no acknowledgment.
use ad_spi::dac::{
    CTRL_OFFSET, ChannelData, Command, Control, DacInterface, GainBufferVdd, LdacControl,
    LdacMode, LoadMode, Payload, PowerDown, Reset, ResetScope, STAT_OFFSET, STATUS_TX_FULL,
    TX_FIFO_OFFSET,
};

use crate::fifo::{FifoSync, FifoTimeoutError};
use crate::regs::{Mmio, RegisterSpace};

/// Configuration written by [Ad53x8::init_with_config].
#[derive(Debug, Clone, Copy)]
pub struct Config {
    pub load_mode: LoadMode,
    pub reset_scope: ResetScope,
    pub power_down: PowerDown,
    pub ldac_mode: LdacMode,
    pub gain_buffer_vdd: GainBufferVdd,
}

impl Default for Config {
    /// Synchronous loading, full reset, all channels powered up, LDAC driven by the external
    /// hardware signal and buffered references with a 0 V to VREF range on all channels.
    fn default() -> Self {
        Self {
            load_mode: LoadMode::Load,
            reset_scope: ResetScope::DataAndControl,
            power_down: PowerDown::ALL_UP,
            ldac_mode: LdacMode::High,
            gain_buffer_vdd: GainBufferVdd::DEFAULT.with_buf_ad(true).with_buf_eh(true),
        }
    }
}

/// Driver for the AD53x8 DAC interface controller.
#[derive(Debug)]
pub struct Ad53x8<R> {
    fifo: FifoSync<R>,
}

impl Ad53x8<Mmio> {
    /// Create a driver for the interface controller at `base_addr`.
    ///
    /// # Safety
    ///
    /// See [Mmio::new].
    pub unsafe fn new_mmio_at(base_addr: usize) -> Self {
        Self::new(Mmio::from(unsafe { DacInterface::new_mmio_at(base_addr) }))
    }
}

impl<R: RegisterSpace> Ad53x8<R> {
    #[inline]
    pub const fn new(regs: R) -> Self {
        Self {
            fifo: FifoSync::new(regs),
        }
    }

    /// Initialize the interface controller and the DAC with the default [Config].
    #[inline]
    pub fn init(&mut self) {
        self.init_with_config(&Config::default());
    }

    /// Initialize the interface controller and the DAC.
    ///
    /// The reset is issued before all mode configuration writes, because it would undo them.
    pub fn init_with_config(&mut self, config: &Config) {
        self.set_load_mode(config.load_mode);
        self.reset(config.reset_scope);
        self.power_down(config.power_down);
        self.set_ldac_mode(config.ldac_mode);
        self.set_gain_buffer_vdd(config.gain_buffer_vdd);
        log::debug!("AD53x8 init done: {config:?}");
    }

    /// Configure whether new data is loaded into the DAC registers or held back.
    #[inline]
    pub fn set_load_mode(&mut self, mode: LoadMode) {
        self.fifo.write(
            CTRL_OFFSET,
            Control::DEFAULT.with_load_mode(mode).raw_value(),
        );
    }

    #[inline]
    pub fn reset(&mut self, scope: ResetScope) {
        self.send_command(Reset::DEFAULT.with_scope(scope));
    }

    /// Power down the channels set in the mask and power up all others.
    #[inline]
    pub fn power_down(&mut self, channels: PowerDown) {
        self.send_command(channels);
    }

    #[inline]
    pub fn set_ldac_mode(&mut self, mode: LdacMode) {
        self.send_command(LdacControl::DEFAULT.with_mode(mode));
    }

    #[inline]
    pub fn set_gain_buffer_vdd(&mut self, config: GainBufferVdd) {
        self.send_command(config);
    }

    /// Send a control command word for the given function payload.
    #[inline]
    pub fn send_command<P: Payload>(&mut self, payload: P) {
        self.send_word(Command::new_write(payload).raw_value());
    }

    /// Write a 10-bit value to a DAC channel.
    ///
    /// `channel` is masked to 3 bits and `data` to 10 bits. Out-of-range values are silently
    /// truncated and end up on a different channel or with a different value, so callers must
    /// check the ranges against [ad_spi::dac::MAX_CHANNEL] and [ad_spi::dac::MAX_DATA] if that
    /// is not acceptable.
    #[inline]
    pub fn write_channel(&mut self, channel: u8, data: u16) {
        self.send_word(ChannelData::new_masked(channel, data).raw_value());
    }

    /// [Self::write_channel] with a bounded wait for TX FIFO space.
    pub fn try_write_channel(
        &mut self,
        channel: u8,
        data: u16,
        max_polls: u32,
    ) -> Result<(), FifoTimeoutError> {
        self.try_send_word(ChannelData::new_masked(channel, data).raw_value(), max_polls)
    }

    /// Wait for space in the TX FIFO and push a raw word.
    pub fn send_word(&mut self, word: u16) {
        self.fifo.wait_tx_ready(STAT_OFFSET, STATUS_TX_FULL);
        log::trace!("AD53x8 word {word:#06x}");
        self.fifo.write(TX_FIFO_OFFSET, word as u32);
    }

    pub fn try_send_word(&mut self, word: u16, max_polls: u32) -> Result<(), FifoTimeoutError> {
        self.fifo
            .try_wait_tx_ready(STAT_OFFSET, STATUS_TX_FULL, max_polls)?;
        log::trace!("AD53x8 word {word:#06x}");
        self.fifo.write(TX_FIFO_OFFSET, word as u32);
        Ok(())
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
