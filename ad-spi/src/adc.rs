//! AD7811 interface controller registers and ADC command words.
use arbitrary_int::u2;

pub const CTRL_OFFSET: usize = 0x0;
pub const STAT_OFFSET: usize = 0x4;
pub const TX_FIFO_OFFSET: usize = 0x8;
pub const RX_FIFO_OFFSET: usize = 0xC;

pub const STATUS_TX_FULL: u32 = 1 << 0;
pub const STATUS_TX_EMPTY: u32 = 1 << 1;
pub const STATUS_RX_FULL: u32 = 1 << 2;
pub const STATUS_RX_EMPTY: u32 = 1 << 3;

pub const MAX_CHANNEL: u8 = 3;

#[bitbybit::bitenum(u1, exhaustive = true)]
#[derive(Debug, PartialEq, Eq)]
pub enum SpiSpeed {
    Fast = 0b0,
    Slow = 0b1,
}

#[bitbybit::bitfield(u32, default = 0x0, debug)]
pub struct Control {
    #[bit(0, rw)]
    speed: SpiSpeed,
}

#[bitbybit::bitfield(u32, debug)]
pub struct Status {
    #[bit(3, r)]
    rx_empty: bool,
    #[bit(2, r)]
    rx_full: bool,
    #[bit(1, r)]
    tx_empty: bool,
    #[bit(0, r)]
    tx_full: bool,
}

/// AD7811 interface controller register access.
#[derive(derive_mmio::Mmio)]
#[repr(C)]
pub struct AdcInterface {
    cr: Control,
    #[mmio(PureRead)]
    sr: Status,
    #[mmio(Write)]
    txd: u32,
    /// Reading pops the RX FIFO.
    #[mmio(Read)]
    rxd: u32,
}

static_assertions::const_assert_eq!(core::mem::size_of::<AdcInterface>(), 0x10);
static_assertions::const_assert_eq!(core::mem::offset_of!(AdcInterface, cr), CTRL_OFFSET);
static_assertions::const_assert_eq!(core::mem::offset_of!(AdcInterface, sr), STAT_OFFSET);
static_assertions::const_assert_eq!(core::mem::offset_of!(AdcInterface, txd), TX_FIFO_OFFSET);
static_assertions::const_assert_eq!(core::mem::offset_of!(AdcInterface, rxd), RX_FIFO_OFFSET);

#[bitbybit::bitenum(u2, exhaustive = true)]
#[derive(Debug, PartialEq, Eq)]
pub enum PowerMode {
    FullPowerDown = 0b00,
    /// Partial power-down at the end of a conversion.
    PartialPowerDownAtEoc = 0b01,
    /// Full power-down at the end of a conversion.
    FullPowerDownAtEoc = 0b10,
    PowerUp = 0b11,
}

/// AD7811 control word. Only the lower 9 bits are shifted out to the chip.
#[bitbybit::bitfield(u32, default = 0x0, debug)]
pub struct Command {
    #[bit(8, rw)]
    address: bool,
    #[bits(6..=7, rw)]
    power: PowerMode,
    /// Use VIN4 as reference for the other channels.
    #[bit(5, rw)]
    ref_vin4: bool,
    #[bit(4, rw)]
    differential: bool,
    #[bits(2..=3, rw)]
    channel: u2,
    /// Initiate a conversion.
    #[bit(1, rw)]
    convst: bool,
    /// Use the external voltage reference.
    #[bit(0, rw)]
    ext_ref: bool,
}

impl Command {
    /// External reference with the device powered up. This is also the word used to wake the
    /// chip up after power-on.
    #[inline]
    pub fn power_up() -> Self {
        Self::DEFAULT
            .with_ext_ref(true)
            .with_power(PowerMode::PowerUp)
    }

    /// Conversion request for the given channel. The channel is masked to two bits.
    #[inline]
    pub fn read_channel(channel: u8) -> Self {
        Self::power_up().with_channel(u2::new(channel & MAX_CHANNEL))
    }
}
