//! Register space access.
use ad_spi::{adc::MmioAdcInterface, dac::MmioDacInterface};

/// Read and write 32-bit words at a byte offset inside a register block.
///
/// Implementations must perform exactly one access per call, in program order, without caching
/// or merging values.
pub trait RegisterSpace {
    fn read(&mut self, offset: usize) -> u32;
    fn write(&mut self, offset: usize, value: u32);
}

impl<R: RegisterSpace + ?Sized> RegisterSpace for &mut R {
    #[inline(always)]
    fn read(&mut self, offset: usize) -> u32 {
        (**self).read(offset)
    }

    #[inline(always)]
    fn write(&mut self, offset: usize, value: u32) {
        (**self).write(offset, value)
    }
}

/// Memory mapped register space starting at a fixed base address.
#[derive(Debug)]
pub struct Mmio {
    base_addr: usize,
}

impl Mmio {
    /// Create a register space for the block starting at `base_addr`.
    ///
    /// # Safety
    ///
    /// `base_addr` must point to mapped, 4-byte aligned device memory which is valid for all
    /// offsets used by the driver. The user must also ensure that no other driver instance
    /// accesses the same block concurrently.
    #[inline]
    pub const unsafe fn new(base_addr: usize) -> Self {
        Self { base_addr }
    }

    #[inline]
    pub const fn base_addr(&self) -> usize {
        self.base_addr
    }

    #[inline(always)]
    fn ptr(&self, offset: usize) -> *mut u32 {
        (self.base_addr + offset) as *mut u32
    }
}

impl RegisterSpace for Mmio {
    #[inline(always)]
    fn read(&mut self, offset: usize) -> u32 {
        // Safety: Address validity is guaranteed by the constructor contract.
        unsafe { core::ptr::read_volatile(self.ptr(offset)) }
    }

    #[inline(always)]
    fn write(&mut self, offset: usize, value: u32) {
        // Safety: Address validity is guaranteed by the constructor contract.
        unsafe { core::ptr::write_volatile(self.ptr(offset), value) }
    }
}

impl From<MmioDacInterface<'static>> for Mmio {
    fn from(regs: MmioDacInterface<'static>) -> Self {
        Self {
            base_addr: unsafe { regs.ptr() } as usize,
        }
    }
}

impl From<MmioAdcInterface<'static>> for Mmio {
    fn from(regs: MmioAdcInterface<'static>) -> Self {
        Self {
            base_addr: unsafe { regs.ptr() } as usize,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use ad_spi::dac::{CTRL_OFFSET, DacInterface, STAT_OFFSET, STATUS_TX_FULL, TX_FIFO_OFFSET};

    #[test]
    fn test_mmio_volatile_access() {
        let mut block = [0u32; 4];
        {
            let mut regs = unsafe { Mmio::new(block.as_mut_ptr() as usize) };
            regs.write(TX_FIFO_OFFSET, 0xF000);
            regs.write(STAT_OFFSET, STATUS_TX_FULL);
            assert_eq!(regs.read(TX_FIFO_OFFSET), 0xF000);
            assert_eq!(regs.read(STAT_OFFSET), STATUS_TX_FULL);
            assert_eq!(regs.read(CTRL_OFFSET), 0);
        }
        assert_eq!(block, [0, STATUS_TX_FULL, 0xF000, 0]);
    }

    #[test]
    fn test_mmio_from_register_block() {
        let mut block = [0u32; 3];
        let base_addr = block.as_mut_ptr() as usize;
        let typed = unsafe { DacInterface::new_mmio_at(base_addr) };
        let mut regs = Mmio::from(typed);
        assert_eq!(regs.base_addr(), base_addr);
        regs.write(STAT_OFFSET, STATUS_TX_FULL);

        let typed = unsafe { DacInterface::new_mmio_at(base_addr) };
        assert!(typed.read_sr().tx_full());
        assert!(!typed.read_sr().tx_empty());
    }

    #[test]
    fn test_mock_records_in_order() {
        let mut regs = mock::MockRegs::new()
            .with_value(STAT_OFFSET, 2)
            .with_script(STAT_OFFSET, &[1]);
        regs.write(TX_FIFO_OFFSET, 5);
        assert_eq!(regs.read(STAT_OFFSET), 1);
        assert_eq!(regs.read(STAT_OFFSET), 2);
        assert_eq!(
            regs.log,
            [
                mock::Access::Write {
                    offset: TX_FIFO_OFFSET,
                    value: 5
                },
                mock::Access::Read {
                    offset: STAT_OFFSET,
                    value: 1
                },
                mock::Access::Read {
                    offset: STAT_OFFSET,
                    value: 2
                },
            ]
        );
    }
}
