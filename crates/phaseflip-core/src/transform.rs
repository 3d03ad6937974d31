//! Per-sample polarity inversion with linear scaling.

/// Invert the polarity of `samples` and scale them by `gain`, in place.
///
/// Each sample becomes `-sample * gain`. Negation is exact in IEEE 754, so
/// multiplying by `-gain` gives bit-identical results to negating first.
///
/// Real-time safe: no allocation, no branching on sample values.
#[inline]
pub fn invert_and_scale(samples: &mut [f32], gain: f32) {
    let factor = -gain;
    for sample in samples.iter_mut() {
        *sample *= factor;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaled_inversion() {
        let mut samples = [0.5];
        invert_and_scale(&mut samples, 0.8);
        assert_eq!(samples[0], -0.4);
    }

    #[test]
    fn test_unity_gain_is_exact_negation() {
        let mut samples = [0.2, -0.3, 0.0];
        invert_and_scale(&mut samples, 1.0);
        assert_eq!(samples, [-0.2, 0.3, 0.0]);
    }

    #[test]
    fn test_zero_gain_mutes() {
        let mut samples = [1.0, -1.0, 0.25, -0.75, f32::MIN_POSITIVE];
        invert_and_scale(&mut samples, 0.0);
        assert!(samples.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_matches_reference_formula() {
        let input: Vec<f32> = (0..64).map(|i| (i as f32 * 0.37).sin()).collect();
        for gain in [0.0, 0.1, 0.5, 0.75, 1.0] {
            let mut samples = input.clone();
            invert_and_scale(&mut samples, gain);
            for (out, x) in samples.iter().zip(&input) {
                assert_eq!(out.to_bits(), (-x * gain).to_bits());
            }
        }
    }

    #[test]
    fn test_empty_slice() {
        let mut samples: [f32; 0] = [];
        invert_and_scale(&mut samples, 0.5);
    }
}
