//! AD53x8 interface controller registers and DAC command words.
use arbitrary_int::{u3, u10, u13};

pub const CTRL_OFFSET: usize = 0x0;
pub const STAT_OFFSET: usize = 0x4;
pub const TX_FIFO_OFFSET: usize = 0x8;

/// TX FIFO is full.
pub const STATUS_TX_FULL: u32 = 1 << 0;
/// TX FIFO is empty.
pub const STATUS_TX_EMPTY: u32 = 1 << 1;

/// Highest DAC channel index (channel H).
pub const MAX_CHANNEL: u8 = 7;
/// Highest value accepted by the 10-bit data field.
pub const MAX_DATA: u16 = 0x3FF;

#[bitbybit::bitenum(u1, exhaustive = true)]
#[derive(Debug, PartialEq, Eq)]
pub enum LoadMode {
    /// DAC registers are rewritten, new data shows up on the outputs.
    Load = 0b0,
    /// DAC registers are not overwritten, the outputs keep their values.
    Store = 0b1,
}

#[bitbybit::bitfield(u32, default = 0x0, debug)]
pub struct Control {
    #[bit(0, rw)]
    load_mode: LoadMode,
}

#[bitbybit::bitfield(u32, debug)]
pub struct Status {
    #[bit(1, r)]
    tx_empty: bool,
    #[bit(0, r)]
    tx_full: bool,
}

/// AD53x8 interface controller register access.
#[derive(derive_mmio::Mmio)]
#[repr(C)]
pub struct DacInterface {
    cr: Control,
    #[mmio(PureRead)]
    sr: Status,
    #[mmio(Write)]
    txd: u32,
}

static_assertions::const_assert_eq!(core::mem::size_of::<DacInterface>(), 0xC);
static_assertions::const_assert_eq!(core::mem::offset_of!(DacInterface, cr), CTRL_OFFSET);
static_assertions::const_assert_eq!(core::mem::offset_of!(DacInterface, sr), STAT_OFFSET);
static_assertions::const_assert_eq!(core::mem::offset_of!(DacInterface, txd), TX_FIFO_OFFSET);
static_assertions::const_assert_eq!(STATUS_TX_FULL & STATUS_TX_EMPTY, 0);

/// Function selected by a control command word.
#[bitbybit::bitenum(u2, exhaustive = true)]
#[derive(Debug, PartialEq, Eq)]
pub enum Function {
    GainBufferVdd = 0b00,
    Ldac = 0b01,
    PowerDown = 0b10,
    Reset = 0b11,
}

/// Control command word. The 13 payload bits are function specific.
#[bitbybit::bitfield(u16, default = 0x0, debug)]
pub struct Command {
    #[bit(15, rw)]
    write_cmd: bool,
    #[bits(13..=14, rw)]
    function: Function,
    #[bits(0..=12, rw)]
    payload: u13,
}

/// Payload of a control command word.
pub trait Payload {
    const FUNCTION: Function;

    fn payload_bits(&self) -> u16;
}

impl Command {
    /// Build a write command word for the given function payload.
    pub fn new_write<P: Payload>(payload: P) -> Self {
        Self::DEFAULT
            .with_write_cmd(true)
            .with_function(P::FUNCTION)
            .with_payload(u13::new(payload.payload_bits() & 0x1FFF))
    }
}

#[bitbybit::bitenum(u1, exhaustive = true)]
#[derive(Debug, PartialEq, Eq)]
pub enum Gain {
    /// Output range of 0 V to VREF.
    ZeroToVref = 0b0,
    /// Output range of 0 V to 2 * VREF.
    ZeroToTwiceVref = 0b1,
}

/// Gain, reference buffer and Vdd reference configuration. Channels A-D and E-H are configured
/// as two groups.
#[bitbybit::bitfield(u16, default = 0x0, debug)]
pub struct GainBufferVdd {
    #[bit(5, rw)]
    gain_eh: Gain,
    #[bit(4, rw)]
    gain_ad: Gain,
    /// Buffered reference input for channels E-H.
    #[bit(3, rw)]
    buf_eh: bool,
    /// Buffered reference input for channels A-D.
    #[bit(2, rw)]
    buf_ad: bool,
    /// Use Vdd as reference for channels E-H.
    #[bit(1, rw)]
    vdd_eh: bool,
    /// Use Vdd as reference for channels A-D.
    #[bit(0, rw)]
    vdd_ad: bool,
}

impl Payload for GainBufferVdd {
    const FUNCTION: Function = Function::GainBufferVdd;

    #[inline]
    fn payload_bits(&self) -> u16 {
        self.raw_value()
    }
}

#[bitbybit::bitenum(u2)]
#[derive(Debug, PartialEq, Eq)]
pub enum LdacMode {
    /// LDAC is permanently low, the DAC registers are updated continuously.
    Low = 0b00,
    /// LDAC is permanently high, the DAC registers are latched. Updates are driven by the
    /// external LDAC signal.
    High = 0b01,
    /// Single LDAC pulse, the DAC registers are updated once.
    SinglePulse = 0b10,
}

#[bitbybit::bitfield(u16, default = 0x0, debug)]
pub struct LdacControl {
    #[bits(0..=1, rw)]
    mode: Option<LdacMode>,
}

impl Payload for LdacControl {
    const FUNCTION: Function = Function::Ldac;

    #[inline]
    fn payload_bits(&self) -> u16 {
        self.raw_value()
    }
}

/// Power-down configuration, one bit per channel. Bit 0 is channel A, a set bit powers the
/// channel down.
#[bitbybit::bitfield(u16, default = 0x0, debug)]
pub struct PowerDown {
    #[bits(0..=7, rw)]
    channels: u8,
}

impl PowerDown {
    pub const ALL_UP: Self = Self::DEFAULT;

    #[inline]
    pub fn new_with_mask(channels: u8) -> Self {
        Self::DEFAULT.with_channels(channels)
    }
}

impl Payload for PowerDown {
    const FUNCTION: Function = Function::PowerDown;

    #[inline]
    fn payload_bits(&self) -> u16 {
        self.raw_value()
    }
}

#[bitbybit::bitenum(u1, exhaustive = true)]
#[derive(Debug, PartialEq, Eq)]
pub enum ResetScope {
    DataOnly = 0b0,
    DataAndControl = 0b1,
}

#[bitbybit::bitfield(u16, default = 0x0, debug)]
pub struct Reset {
    #[bit(12, rw)]
    scope: ResetScope,
}

impl Payload for Reset {
    const FUNCTION: Function = Function::Reset;

    #[inline]
    fn payload_bits(&self) -> u16 {
        self.raw_value()
    }
}

/// Channel data word. Bit 15 is cleared, which selects a data write.
#[bitbybit::bitfield(u16, default = 0x0, debug)]
pub struct ChannelData {
    #[bits(12..=14, rw)]
    channel: u3,
    /// Bits 0 and 1 below the data field are unused.
    #[bits(2..=11, rw)]
    data: u10,
}

impl ChannelData {
    /// Build a data word. Out-of-range inputs are masked to the width of their field, so
    /// channel 9 silently becomes channel 1.
    pub fn new_masked(channel: u8, data: u16) -> Self {
        Self::DEFAULT
            .with_channel(u3::new(channel & MAX_CHANNEL))
            .with_data(u10::new(data & MAX_DATA))
    }
}
