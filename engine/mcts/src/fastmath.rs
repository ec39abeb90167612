//! Approximate logarithm for the selection and final-move scores.

/// Base-2 logarithm read off the float's bit pattern.
///
/// Accurate to about 0.09 for positive inputs. `fast_log2(0.0)` is about
/// -126.9, which keeps never-simulated children last in the final-move score.
#[inline]
pub fn fast_log2(x: f32) -> f32 {
    let bits = x.to_bits() as f32;
    bits * 1.192_092_9e-7 - 126.942_695
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_close_to_log2() {
        for x in [1.0f32, 2.0, 3.0, 10.0, 128.0, 1000.0, 123_456.0] {
            let exact = x.log2();
            assert!(
                (fast_log2(x) - exact).abs() < 0.1,
                "x = {}: {} vs {}",
                x,
                fast_log2(x),
                exact
            );
        }
    }

    #[test]
    fn test_monotonic_over_sim_counts() {
        let mut previous = fast_log2(0.0);
        assert!(previous < -126.0);
        for sims in 1..2000 {
            let value = fast_log2(sims as f32);
            assert!(value > previous);
            previous = value;
        }
    }
}
