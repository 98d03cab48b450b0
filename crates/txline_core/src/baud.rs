use crate::PHASE_WIDTH;

/// Mask selecting the live accumulator bits.
const PHASE_MASK: u64 = (1u64 << PHASE_WIDTH) - 1;

/// Fractional baud-rate generator.
///
/// This is the phase-accumulator divider found in DDS/NCO designs: every
/// reference tick adds a fixed increment to a 26-bit accumulator, and the
/// carry out of the top bit marks one bit-time boundary. The pulse train
/// runs at `tick_rate * incr / 2^26`, so bit rates that are not integer
/// divisors of the reference clock still come out right in the long run;
/// individual pulse gaps only ever differ by one tick.
pub struct BaudGen {
    /// Current accumulator value, always below 2^26.
    pub(crate) phase: u32,
    /// Per-tick increment, fixed at construction.
    incr: u32,
    /// Test-only count of pulses emitted so far.
    #[cfg(test)]
    pub(crate) pulse_debug_count: u64,
}

impl BaudGen {
    pub fn new(incr: u32) -> Self {
        Self {
            phase: 0,
            incr,
            #[cfg(test)]
            pulse_debug_count: 0,
        }
    }

    /// Advance the accumulator by one reference tick.
    ///
    /// Returns `true` when the addition carried out of the accumulator
    /// width. The sum is formed in 64 bits so the carry is read from bit
    /// 26 directly instead of leaning on wrapping-arithmetic semantics.
    pub fn tick(&mut self) -> bool {
        let sum = self.phase as u64 + self.incr as u64;
        self.phase = (sum & PHASE_MASK) as u32;
        let pulse = (sum >> PHASE_WIDTH) & 1 != 0;
        #[cfg(test)]
        {
            if pulse {
                self.pulse_debug_count = self.pulse_debug_count.saturating_add(1);
            }
        }
        pulse
    }

    /// Clear the accumulator. A reset tick never pulses, so callers
    /// invoke this *instead of* `tick` while reset is held.
    pub fn reset(&mut self) {
        self.phase = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// With incr = 25770 the ideal pulse period is 2^26 / 25770
    /// ≈ 2604.15 ticks, deliberately not an integer.
    const TEST_INCR: u32 = 25770;

    #[test]
    fn pulse_count_matches_fractional_divide_exactly() {
        let mut baud = BaudGen::new(TEST_INCR);
        let ticks: u64 = 1_000_000;
        for _ in 0..ticks {
            baud.tick();
        }
        // Starting from phase 0, the accumulated sum after N ticks is
        // N * incr, so the number of wraparounds is exactly its top bits.
        let expected = (ticks * TEST_INCR as u64) >> PHASE_WIDTH;
        assert_eq!(baud.pulse_debug_count, expected);
    }

    #[test]
    fn pulse_spacing_stays_within_one_tick_of_ideal() {
        let mut baud = BaudGen::new(TEST_INCR);
        let floor_period = (1u64 << PHASE_WIDTH) / TEST_INCR as u64;

        let mut gaps = Vec::new();
        let mut since_last = 0u64;
        for _ in 0..1_000_000u64 {
            since_last += 1;
            if baud.tick() {
                gaps.push(since_last);
                since_last = 0;
            }
        }

        assert!(gaps.len() > 300);
        for &gap in &gaps {
            assert!(
                gap == floor_period || gap == floor_period + 1,
                "pulse gap {} outside [{}, {}]",
                gap,
                floor_period,
                floor_period + 1
            );
        }

        // Long-run average within one tick of 2^26 / incr.
        let total: u64 = gaps.iter().sum();
        let average = total as f64 / gaps.len() as f64;
        let ideal = (1u64 << PHASE_WIDTH) as f64 / TEST_INCR as f64;
        assert!((average - ideal).abs() < 1.0);
    }

    #[test]
    fn reset_clears_phase_and_restarts_the_period() {
        let mut baud = BaudGen::new(TEST_INCR);
        // Park the accumulator just shy of a wraparound.
        while baud.phase < (1u32 << PHASE_WIDTH) - 2 * TEST_INCR {
            baud.tick();
        }
        baud.reset();
        assert_eq!(baud.phase, 0);

        // The next pulse takes a full period again rather than arriving
        // early from the parked phase.
        let mut ticks = 0u64;
        while !baud.tick() {
            ticks += 1;
        }
        let floor_period = (1u64 << PHASE_WIDTH) / TEST_INCR as u64;
        assert!(ticks + 1 >= floor_period);
    }

    #[test]
    fn max_increment_pulses_every_tick_after_the_first() {
        // Largest valid increment: wraps on every tick except the very
        // first, when the accumulator starts from zero.
        let mut baud = BaudGen::new(PHASE_MASK as u32);
        assert!(!baud.tick());
        for _ in 0..100 {
            assert!(baud.tick());
        }
    }
}
