//! FIFO status polling.
//!
//! The interface controllers only signal FIFO state through status flags. Every write to a TX
//! FIFO must be preceded by a wait for the TX full flag to clear, and every read from an RX FIFO
//! by a wait for the RX empty flag to clear. Otherwise data is lost.
use core::ops::ControlFlow;

use crate::regs::RegisterSpace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("status flag {mask:#x} still set after {polls} polls")]
pub struct FifoTimeoutError {
    pub mask: u32,
    pub polls: u32,
}

/// Register space with blocking FIFO synchronization primitives.
#[derive(Debug)]
pub struct FifoSync<R> {
    regs: R,
}

impl<R: RegisterSpace> FifoSync<R> {
    #[inline]
    pub const fn new(regs: R) -> Self {
        Self { regs }
    }

    /// Block until `full_mask` is cleared in the status word at `status_offset`.
    ///
    /// There is no timeout. If the hardware never clears the flag, this function never returns.
    #[inline]
    pub fn wait_tx_ready(&mut self, status_offset: usize, full_mask: u32) {
        self.wait_flag_clear(status_offset, full_mask);
    }

    /// Block until `empty_mask` is cleared in the status word at `status_offset`.
    ///
    /// There is no timeout. If the hardware never clears the flag, this function never returns.
    #[inline]
    pub fn wait_rx_ready(&mut self, status_offset: usize, empty_mask: u32) {
        self.wait_flag_clear(status_offset, empty_mask);
    }

    /// Bounded version of [Self::wait_tx_ready] which gives up after `max_polls` status reads.
    ///
    /// A limit of 0 fails without reading the status register.
    pub fn try_wait_tx_ready(
        &mut self,
        status_offset: usize,
        full_mask: u32,
        max_polls: u32,
    ) -> Result<(), FifoTimeoutError> {
        self.try_wait_flag_clear(status_offset, full_mask, max_polls)
    }

    /// Bounded version of [Self::wait_rx_ready] which gives up after `max_polls` status reads.
    ///
    /// A limit of 0 fails without reading the status register.
    pub fn try_wait_rx_ready(
        &mut self,
        status_offset: usize,
        empty_mask: u32,
        max_polls: u32,
    ) -> Result<(), FifoTimeoutError> {
        self.try_wait_flag_clear(status_offset, empty_mask, max_polls)
    }

    /// Poll the status word until `mask` is cleared.
    ///
    /// `poll` is called with the status word after every read which still had the flag set.
    /// Returning [ControlFlow::Break] aborts the wait, in which case this function returns
    /// [ControlFlow::Break] as well.
    pub fn wait_flag_clear_with<F: FnMut(u32) -> ControlFlow<()>>(
        &mut self,
        status_offset: usize,
        mask: u32,
        mut poll: F,
    ) -> ControlFlow<()> {
        loop {
            let status = self.regs.read(status_offset);
            if status & mask == 0 {
                return ControlFlow::Continue(());
            }
            if poll(status).is_break() {
                return ControlFlow::Break(());
            }
        }
    }

    fn wait_flag_clear(&mut self, status_offset: usize, mask: u32) {
        let _ = self.wait_flag_clear_with(status_offset, mask, |_| {
            core::hint::spin_loop();
            ControlFlow::Continue(())
        });
    }

    fn try_wait_flag_clear(
        &mut self,
        status_offset: usize,
        mask: u32,
        max_polls: u32,
    ) -> Result<(), FifoTimeoutError> {
        if max_polls == 0 {
            log::warn!("FIFO status flag {mask:#x} wait with a poll limit of 0");
            return Err(FifoTimeoutError { mask, polls: 0 });
        }
        let mut polls = 0;
        let result = self.wait_flag_clear_with(status_offset, mask, |_| {
            polls += 1;
            if polls >= max_polls {
                return ControlFlow::Break(());
            }
            core::hint::spin_loop();
            ControlFlow::Continue(())
        });
        match result {
            ControlFlow::Continue(()) => Ok(()),
            ControlFlow::Break(()) => {
                log::warn!("FIFO status flag {mask:#x} did not clear after {polls} polls");
                Err(FifoTimeoutError { mask, polls })
            }
        }
    }

    #[inline(always)]
    pub fn read(&mut self, offset: usize) -> u32 {
        self.regs.read(offset)
    }

    #[inline(always)]
    pub fn write(&mut self, offset: usize, value: u32) {
        self.regs.write(offset, value)
    }

    #[inline]
    pub fn regs(&self) -> &R {
        &self.regs
    }

    #[inline]
    pub fn regs_mut(&mut self) -> &mut R {
        &mut self.regs
    }

    #[inline]
    pub fn release(self) -> R {
        self.regs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regs::mock::MockRegs;
    use ad_spi::adc::{STAT_OFFSET, STATUS_RX_EMPTY, STATUS_TX_EMPTY, STATUS_TX_FULL};

    #[test]
    fn test_tx_ready_when_flag_clear() {
        let mut fifo = FifoSync::new(MockRegs::new().with_value(STAT_OFFSET, STATUS_TX_EMPTY));
        fifo.wait_tx_ready(STAT_OFFSET, STATUS_TX_FULL);
        assert_eq!(fifo.regs().reads(), 1);
    }

    #[test]
    fn test_tx_ready_after_flag_clears() {
        let regs = MockRegs::new().with_script(
            STAT_OFFSET,
            &[STATUS_TX_FULL, STATUS_TX_FULL, STATUS_TX_FULL, 0],
        );
        let mut fifo = FifoSync::new(regs);
        fifo.wait_tx_ready(STAT_OFFSET, STATUS_TX_FULL);
        assert_eq!(fifo.regs().reads(), 4);
    }

    #[test]
    fn test_rx_ready_ignores_other_flags() {
        let regs = MockRegs::new().with_script(
            STAT_OFFSET,
            &[STATUS_RX_EMPTY | STATUS_TX_FULL, STATUS_TX_FULL],
        );
        let mut fifo = FifoSync::new(regs);
        fifo.wait_rx_ready(STAT_OFFSET, STATUS_RX_EMPTY);
        assert_eq!(fifo.regs().reads(), 2);
    }

    #[test]
    #[should_panic(expected = "read limit of 1000 exceeded")]
    fn test_tx_wait_never_returns_when_stuck() {
        let regs = MockRegs::new()
            .with_value(STAT_OFFSET, STATUS_TX_FULL)
            .with_read_limit(1000);
        let mut fifo = FifoSync::new(regs);
        fifo.wait_tx_ready(STAT_OFFSET, STATUS_TX_FULL);
    }

    #[test]
    #[should_panic(expected = "read limit of 1000 exceeded")]
    fn test_rx_wait_never_returns_when_stuck() {
        let regs = MockRegs::new()
            .with_value(STAT_OFFSET, STATUS_RX_EMPTY)
            .with_read_limit(1000);
        let mut fifo = FifoSync::new(regs);
        fifo.wait_rx_ready(STAT_OFFSET, STATUS_RX_EMPTY);
    }

    #[test]
    fn test_bounded_wait_times_out() {
        let regs = MockRegs::new().with_value(STAT_OFFSET, STATUS_TX_FULL);
        let mut fifo = FifoSync::new(regs);
        let result = fifo.try_wait_tx_ready(STAT_OFFSET, STATUS_TX_FULL, 16);
        assert_eq!(
            result,
            Err(FifoTimeoutError {
                mask: STATUS_TX_FULL,
                polls: 16
            })
        );
        assert_eq!(fifo.regs().reads(), 16);
    }

    #[test]
    fn test_bounded_wait_zero_limit() {
        let regs = MockRegs::new().with_value(STAT_OFFSET, STATUS_TX_FULL);
        let mut fifo = FifoSync::new(regs);
        assert_eq!(
            fifo.try_wait_tx_ready(STAT_OFFSET, STATUS_TX_FULL, 0),
            Err(FifoTimeoutError {
                mask: STATUS_TX_FULL,
                polls: 0
            })
        );
        // Also fails when the flag would already be clear, nothing is read.
        let mut fifo = FifoSync::new(MockRegs::new());
        assert!(fifo.try_wait_rx_ready(STAT_OFFSET, STATUS_RX_EMPTY, 0).is_err());
        assert_eq!(fifo.regs().reads(), 0);
    }

    #[test]
    fn test_bounded_wait_succeeds_within_limit() {
        let regs = MockRegs::new().with_script(STAT_OFFSET, &[STATUS_RX_EMPTY, STATUS_RX_EMPTY]);
        let mut fifo = FifoSync::new(regs);
        assert!(fifo.try_wait_rx_ready(STAT_OFFSET, STATUS_RX_EMPTY, 3).is_ok());
        assert_eq!(fifo.regs().reads(), 3);
    }

    #[test]
    fn test_custom_poll_hook_sees_status() {
        let regs = MockRegs::new().with_script(STAT_OFFSET, &[STATUS_TX_FULL | 0x10, 0x10]);
        let mut fifo = FifoSync::new(regs);
        let mut seen = std::vec::Vec::new();
        let result = fifo.wait_flag_clear_with(STAT_OFFSET, STATUS_TX_FULL, |status| {
            seen.push(status);
            ControlFlow::Continue(())
        });
        assert_eq!(result, ControlFlow::Continue(()));
        assert_eq!(seen, [STATUS_TX_FULL | 0x10]);
    }
}
