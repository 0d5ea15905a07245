//! Deterministic pseudo-random generator.
//!
//! All entropy in the simulation derives from a single scalar hash,
//! `frac(sin(seed * 12.9898 + 78.233) * 43758.5453)`, keyed on the
//! engine's monotone seed counter. The constants are load-bearing:
//! replaying the same seed sequence reproduces the same session, which
//! is the one numeric contract the rest of the crate builds on. Keep
//! them bit-for-bit.

/// Hashes a seed into the unit interval `[0, 1)`.
///
/// Pure and total: any finite seed produces a value in range, including
/// negative and fractional seeds.
pub fn unit_hash(seed: f64) -> f64 {
    let x = (seed * 12.9898 + 78.233).sin() * 43758.5453;
    x - x.floor()
}

/// Hashes a seed into an index in `[0, len)`.
///
/// `len` must be non-zero. The `min` guards the (theoretical) case of
/// the scaled draw rounding up to `len`.
pub fn index_hash(seed: f64, len: usize) -> usize {
    debug_assert!(len > 0, "index_hash requires a non-empty range");
    ((unit_hash(seed) * len as f64) as usize).min(len - 1)
}

/// Hashes a seed into the half-open range `[lo, hi)`.
pub fn range_hash(seed: f64, lo: f64, hi: f64) -> f64 {
    lo + unit_hash(seed) * (hi - lo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // Reference values computed once from the formula. These pin the
    // generator: if any of them drifts, every golden trajectory in the
    // engine tests drifts with it.
    #[test]
    fn test_unit_hash_golden_values() {
        assert_relative_eq!(unit_hash(0.0), 0.1829163520505972, max_relative = 1e-9);
        assert_relative_eq!(unit_hash(1.0), 0.740084824198675, max_relative = 1e-9);
        assert_relative_eq!(unit_hash(42.0), 0.6398349696901278, max_relative = 1e-9);
        assert_relative_eq!(unit_hash(43.0), 0.0799622470367467, max_relative = 1e-9);
        assert_relative_eq!(unit_hash(44.0), 0.4980347344026086, max_relative = 1e-9);
        assert_relative_eq!(unit_hash(45.0), 0.8086803083187988, max_relative = 1e-9);
    }

    #[test]
    fn test_unit_hash_in_range() {
        for i in -500..1500 {
            let v = unit_hash(i as f64);
            assert!((0.0..1.0).contains(&v), "seed {} escaped unit range: {}", i, v);
        }
        // Fractional seeds are equally valid inputs.
        for i in 0..100 {
            let v = unit_hash(i as f64 * 0.37 - 3.5);
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn test_unit_hash_deterministic() {
        for i in 0..64 {
            let seed = i as f64 * 17.0 + 3.0;
            assert_eq!(unit_hash(seed).to_bits(), unit_hash(seed).to_bits());
        }
    }

    #[test]
    fn test_index_hash_bounds() {
        for len in 1..12 {
            for i in 0..200 {
                let idx = index_hash(i as f64, len);
                assert!(idx < len, "index {} out of range for len {}", idx, len);
            }
        }
    }

    #[test]
    fn test_range_hash_bounds() {
        for i in 0..200 {
            let v = range_hash(i as f64, 20.0, 70.0);
            assert!((20.0..70.0).contains(&v));
        }
        let v = range_hash(7.0, 85.0, 99.0);
        assert!((85.0..99.0).contains(&v));
    }
}
