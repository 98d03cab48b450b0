use txline_core::{Transmitter, TxInput, FRAME_BITS};

/// One transmitted frame as observed on the wire.
pub struct FrameTrace {
    pub byte: u8,
    /// Line level sampled at each bit-pulse boundary, in wire order:
    /// start bit, data bits LSB first, stop bit.
    pub bits: Vec<bool>,
    /// Tick at which the byte was latched.
    pub start_tick: u64,
    /// Tick of the pulse that closed the stop bit.
    pub end_tick: u64,
}

impl FrameTrace {
    /// Sampled levels as `start data stop` digit groups, e.g.
    /// `0 10101100 1`.
    pub fn bits_string(&self) -> String {
        let mut out = String::new();
        for (i, &bit) in self.bits.iter().enumerate() {
            if i == 1 || i + 1 == self.bits.len() {
                out.push(' ');
            }
            out.push(if bit { '1' } else { '0' });
        }
        out
    }

    /// ASCII rendition of the line level over the frame, two cells per
    /// bit, flanked by the idle-high line.
    pub fn waveform(&self) -> String {
        let mut wave = String::from("‾");
        for &bit in &self.bits {
            wave.push_str(if bit { "‾‾" } else { "__" });
        }
        wave.push('‾');
        wave
    }
}

/// Drives a [`Transmitter`] tick by tick and records the frames it puts
/// on the wire. This plays the role of the external collaborator: it
/// owns the clock, the reset line, and the send handshake, and only
/// observes the transmitter through its pin-level interface.
pub struct Simulator {
    tx: Transmitter,
    ticks: u64,
}

impl Simulator {
    pub fn new(incr: u32) -> Self {
        let mut sim = Self {
            tx: Transmitter::new(incr),
            ticks: 0,
        };
        // Power-on: one tick with reset held puts every register in its
        // documented initial state.
        sim.step(TxInput {
            reset: true,
            ..TxInput::IDLE
        });
        sim
    }

    fn step(&mut self, input: TxInput) -> bool {
        self.ticks += 1;
        self.tx.tick(input)
    }

    /// Total ticks driven since power-on.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Transmit one byte and return the observed frame.
    ///
    /// Holds `send` high until the transmitter reports busy (the
    /// level-sensitive handshake), then samples the line level at every
    /// bit-pulse boundary until busy falls.
    pub fn send_byte(&mut self, byte: u8) -> FrameTrace {
        while !self.tx.busy() {
            self.step(TxInput::send(byte));
        }
        let start_tick = self.ticks;

        let mut bits = Vec::with_capacity(FRAME_BITS as usize);
        while self.tx.busy() {
            // The level on the wire during the bit interval that this
            // tick's pulse (if any) closes.
            let level = self.tx.tx_out();
            if self.step(TxInput::IDLE) {
                bits.push(level);
            }
        }

        log::debug!(
            "frame 0x{:02x}: ticks {}..{}",
            byte,
            start_tick,
            self.ticks
        );
        FrameTrace {
            byte,
            bits,
            start_tick,
            end_tick: self.ticks,
        }
    }
}
