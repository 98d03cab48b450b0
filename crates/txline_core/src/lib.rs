pub mod baud;
pub mod tx;

pub use baud::BaudGen;
pub use tx::{Transmitter, TxInput};

/// Width of the baud-rate phase accumulator in bits.
///
/// Together with the accumulator increment and the tick rate this fixes
/// the bit rate: `tick_rate * incr / 2^PHASE_WIDTH`.
pub const PHASE_WIDTH: u32 = 26;

/// Bit positions in one frame on the wire: start bit + 8 data bits +
/// stop bit.
pub const FRAME_BITS: u8 = 10;
