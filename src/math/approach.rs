//! Frame-rate independent exponential approach.
//!
//! A fixed-fraction step `x += (target - x) * rate` taken once per tick leaves
//! `(1 - rate)^n` of the original gap after `n` ticks. To keep that curve when
//! frames are longer or shorter than one tick, a frame of `dt` ticks uses the
//! fraction `1 - (1 - rate)^dt` instead.

/// Fraction of the remaining gap to close over a frame lasting `dt` ticks.
///
/// `rate` is the per-tick fraction and must lie in (0, 1]. Non-positive `dt`
/// closes nothing.
pub fn step_fraction(rate: f64, dt: f64) -> f64 {
    if dt <= 0.0 {
        return 0.0;
    }
    if rate >= 1.0 {
        return 1.0;
    }
    1.0 - (1.0 - rate).powf(dt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_tick_is_rate() {
        approx::assert_relative_eq!(step_fraction(0.1, 1.0), 0.1, max_relative = 1e-12);
        approx::assert_relative_eq!(step_fraction(0.25, 1.0), 0.25, max_relative = 1e-12);
    }

    #[test]
    fn test_split_frames_compose() {
        // Two half-tick frames leave the same gap as one full tick
        let half = step_fraction(0.2, 0.5);
        let remaining = (1.0 - half) * (1.0 - half);
        approx::assert_relative_eq!(remaining, 1.0 - step_fraction(0.2, 1.0), max_relative = 1e-12);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(step_fraction(0.3, 0.0), 0.0);
        assert_eq!(step_fraction(0.3, -2.0), 0.0);
        assert_eq!(step_fraction(1.0, 0.5), 1.0);
    }
}
