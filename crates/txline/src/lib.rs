mod sim;

pub use sim::{FrameTrace, Simulator};

use std::collections::HashMap;

use anyhow::{bail, Context, Result};
use lazy_static::lazy_static;
use typed_builder::TypedBuilder;
use txline_core::PHASE_WIDTH;

lazy_static! {
    /// Named baud-rate presets accepted on the command line alongside
    /// plain numeric rates.
    static ref BAUD_PRESETS: HashMap<&'static str, u32> = {
        let mut m = HashMap::new();
        m.insert("midi", 31_250);
        m.insert("dmx", 250_000);
        m
    };
}

/// Simulation parameters assembled by the command line front end.
#[derive(TypedBuilder)]
pub struct SimConfig {
    /// Reference clock rate in Hz driving the transmitter's tick input.
    pub clock_hz: u32,
    /// Requested bit rate on the wire.
    pub baud: u32,
    /// Bytes to transmit, one frame each.
    pub payload: Vec<u8>,
    #[builder(default = true)]
    pub show_waveform: bool,
}

/// Parse a baud rate argument: a preset name or a decimal rate
/// (underscores allowed as digit separators).
pub fn parse_baud(raw: &str) -> Result<u32> {
    let key = raw.to_ascii_lowercase();
    if let Some(&rate) = BAUD_PRESETS.get(key.as_str()) {
        return Ok(rate);
    }
    key.replace('_', "")
        .parse::<u32>()
        .with_context(|| format!("unrecognised baud rate '{}'", raw))
}

/// Compute the phase-accumulator increment for a requested baud rate.
///
/// `incr = round(baud * 2^26 / clock_hz)`. Picking and validating this
/// value is the integrator's job, so all the range checks live here and
/// the core just takes the number.
pub fn derive_increment(clock_hz: u32, baud: u32) -> Result<u32> {
    if clock_hz == 0 {
        bail!("reference clock rate must be nonzero");
    }
    if baud == 0 {
        bail!("baud rate must be nonzero");
    }
    if baud >= clock_hz {
        bail!(
            "baud rate {} is not below the {} Hz reference clock",
            baud,
            clock_hz
        );
    }

    let scaled = (baud as u64) << PHASE_WIDTH;
    let incr = (scaled + clock_hz as u64 / 2) / clock_hz as u64;
    if incr == 0 {
        bail!(
            "baud rate {} is too slow for a {}-bit accumulator at {} Hz",
            baud,
            PHASE_WIDTH,
            clock_hz
        );
    }
    if (incr >> PHASE_WIDTH) != 0 {
        bail!(
            "increment {:#x} does not fit the {}-bit accumulator",
            incr,
            PHASE_WIDTH
        );
    }
    Ok(incr as u32)
}

/// Bit rate actually produced by an increment at a given clock.
pub fn achieved_baud(clock_hz: u32, incr: u32) -> f64 {
    clock_hz as f64 * incr as f64 / (1u64 << PHASE_WIDTH) as f64
}

fn printable(byte: u8) -> char {
    if byte.is_ascii_graphic() || byte == b' ' {
        byte as char
    } else {
        '.'
    }
}

/// Drive one simulation run described by `config` and print what the
/// wire did.
pub fn run(config: SimConfig) -> Result<()> {
    let incr = derive_increment(config.clock_hz, config.baud)?;
    let achieved = achieved_baud(config.clock_hz, incr);
    let error_ppm = (achieved - config.baud as f64) / config.baud as f64 * 1e6;
    log::info!(
        "clock {} Hz, requested {} baud: incr {} achieves {:.2} baud ({:+.2} ppm)",
        config.clock_hz,
        config.baud,
        incr,
        achieved,
        error_ppm
    );

    let mut sim = Simulator::new(incr);
    let mut bit_ticks = 0u64;
    for &byte in &config.payload {
        let trace = sim.send_byte(byte);
        bit_ticks += trace.end_tick - trace.start_tick;
        println!(
            "tick {:>10}  0x{:02X} '{}'  {}",
            trace.start_tick,
            trace.byte,
            printable(trace.byte),
            trace.bits_string()
        );
        if config.show_waveform {
            println!("                        {}", trace.waveform());
        }
    }

    if !config.payload.is_empty() {
        let bits = config.payload.len() as u64 * u64::from(txline_core::FRAME_BITS);
        log::info!(
            "sent {} bytes in {} ticks, measured bit period {:.2} ticks",
            config.payload.len(),
            sim.ticks(),
            bit_ticks as f64 / bits as f64
        );
    }

    Ok(())
}
