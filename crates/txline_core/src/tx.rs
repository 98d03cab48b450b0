use crate::baud::BaudGen;
use crate::FRAME_BITS;

/// Input levels sampled by the transmitter at one tick boundary.
///
/// The driver presents these fresh on every `tick` call, the way a
/// testbench drives input pins each clock edge.
#[derive(Copy, Clone, Debug, Default)]
pub struct TxInput {
    /// Synchronous reset level. Dominates everything else this tick.
    pub reset: bool,
    /// Transmission request level. Level-sensitive: a request while the
    /// transmitter is busy is silently ignored, and holding the level
    /// high until the load is observed is the intended handshake.
    pub send: bool,
    /// Byte to latch when a send is accepted. Ignored on all other ticks.
    pub data: u8,
}

impl TxInput {
    /// Quiet bus: no reset, no send.
    pub const IDLE: TxInput = TxInput {
        reset: false,
        send: false,
        data: 0,
    };

    /// Request transmission of `data`.
    pub fn send(data: u8) -> TxInput {
        TxInput {
            reset: false,
            send: true,
            data,
        }
    }
}

/// UART-style serial transmitter.
///
/// One start bit, eight data bits LSB first, one stop bit; the wire
/// idles high. Time advances via explicit `tick` calls at the reference
/// clock rate and bit timing comes from the embedded [`BaudGen`]. The
/// frame position is tracked as a countdown of bit slots left to send
/// (10 = start bit just latched, 0 = idle); the line level is derived
/// from that countdown and the latched byte, never stored.
pub struct Transmitter {
    pub(crate) baud: BaudGen,
    /// Byte currently on the wire. Latched on load, stable for the
    /// whole frame.
    pub(crate) data: u8,
    /// Frame bit slots still to send, counted down from `FRAME_BITS`.
    pub(crate) bits_left: u8,
}

impl Transmitter {
    pub fn new(incr: u32) -> Self {
        Self {
            baud: BaudGen::new(incr),
            data: 0,
            bits_left: 0,
        }
    }

    /// Advance the machine by one reference-clock tick.
    ///
    /// Returns `true` when a bit-time boundary occurred this tick, so a
    /// driver can sample the line at exactly the bit rate. All state
    /// transitions read the values held at the start of the tick; a load
    /// and a countdown decrement can never both fire on one tick because
    /// the load requires the countdown to already be zero.
    pub fn tick(&mut self, input: TxInput) -> bool {
        if input.reset {
            self.baud.reset();
            self.data = 0;
            self.bits_left = 0;
            return false;
        }

        let pulse = self.baud.tick();

        if input.send && self.bits_left == 0 {
            self.data = input.data;
            self.bits_left = FRAME_BITS;
            log::trace!("latched {:#04x}, frame started", self.data);
        } else if pulse && self.bits_left != 0 {
            self.bits_left -= 1;
            if self.bits_left == 0 {
                log::trace!("frame finished, line idle");
            }
        }

        pulse
    }

    /// Line level right now.
    ///
    /// Purely derived from committed state, so it is valid between
    /// ticks as well as immediately after one.
    pub fn tx_out(&self) -> bool {
        output_bit(self.bits_left, self.data)
    }

    /// True while a frame is in flight. A send request is only accepted
    /// while this is false.
    pub fn busy(&self) -> bool {
        self.bits_left != 0
    }
}

/// Line level for a countdown position.
///
/// 10 is the start bit, 9..=2 are the data bits LSB first. The default
/// arm covers the stop bit, the idle line, and any countdown value that
/// should never occur; all of them keep the line high.
fn output_bit(bits_left: u8, data: u8) -> bool {
    match bits_left {
        10 => false,                // start bit
        9 => (data & 0x01) != 0,    // data bit 0 (LSB)
        8 => (data & 0x02) != 0,
        7 => (data & 0x04) != 0,
        6 => (data & 0x08) != 0,
        5 => (data & 0x10) != 0,
        4 => (data & 0x20) != 0,
        3 => (data & 0x40) != 0,
        2 => (data & 0x80) != 0,    // data bit 7 (MSB)
        _ => true,                  // stop bit / idle-high
    }
}
