// This module implements the multiply-shift-mask hash search used by hashed switch
// dispatch. Given the distinct integer keys of a switch, IntHasher::for_keys looks
// for a (factor, shift, cardinality) triple under which every key maps to a unique
// slot of a power-of-two-sized table. The search prefers the smallest cardinality,
// starting at the next power of two above the key count and doubling a bounded
// number of times; per cardinality it crosses a short list of multiplier factors
// (1 plus a few primes) with shift amounts 0..=31. Only injective plans are
// accepted: a collision between two real keys would let the emitted dispatch route
// one of them to the default target, so near-misses are rejected and absence of a
// plan is reported as a plain None for callers to fall back on. Keys outside the
// original set may still collide with occupied slots; the emitted dispatch guards
// that with a stored-key comparison, not this search.

//! Perfect hashing of switch keys into small dense tables.

/// A multiply-shift-mask hash plan over a fixed key set.
///
/// `hash(key) = ((key * factor) >>> shift) & (cardinality - 1)`, injective
/// over the keys it was constructed for. `cardinality` is a power of two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntHasher {
    pub factor: u16,
    pub shift: u8,
    pub cardinality: usize,
}

/// Multiplier candidates: the identity plus a few primes that spread
/// clustered key sets. Small enough to keep the emitted multiply cheap.
const FACTORS: [u16; 6] = [1, 257, 3079, 6151, 12289, 24593];

/// How many table-size doublings to try past the minimum.
const CARDINALITY_DOUBLINGS: u32 = 3;

impl IntHasher {
    /// Search for a hash plan that is injective over `keys`.
    ///
    /// Smaller cardinalities are preferred; within one cardinality, earlier
    /// factors and smaller shifts win, making the result deterministic.
    /// Returns `None` when no tried combination is injective; that is a
    /// normal outcome and callers must fall back to another dispatch form.
    pub fn for_keys(keys: &[i32]) -> Option<IntHasher> {
        if keys.is_empty() {
            return None;
        }

        let mut cardinality = keys.len().next_power_of_two();
        for _ in 0..=CARDINALITY_DOUBLINGS {
            for factor in FACTORS {
                for shift in 0..32u8 {
                    let candidate = IntHasher {
                        factor,
                        shift,
                        cardinality,
                    };
                    if candidate.is_injective(keys) {
                        return Some(candidate);
                    }
                }
            }
            cardinality *= 2;
        }
        None
    }

    /// Map a key to its table slot.
    pub fn hash(&self, key: i32) -> usize {
        let mixed = key.wrapping_mul(self.factor as i32) as u32;
        (mixed >> self.shift) as usize & (self.cardinality - 1)
    }

    fn is_injective(&self, keys: &[i32]) -> bool {
        let mut seen = vec![false; self.cardinality];
        for &key in keys {
            let slot = self.hash(key);
            if seen[slot] {
                return false;
            }
            seen[slot] = true;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_keys_have_no_plan() {
        assert_eq!(IntHasher::for_keys(&[]), None);
    }

    #[test]
    fn test_single_key() {
        let hasher = IntHasher::for_keys(&[17]).unwrap();
        assert_eq!(hasher.cardinality, 1);
        assert_eq!(hasher.hash(17), 0);
    }

    #[test]
    fn test_sparse_keys_find_small_table() {
        // The spec scenario: three keys a thousand apart hash into four slots.
        let keys = [0, 1000, 2000];
        let hasher = IntHasher::for_keys(&keys).unwrap();
        assert_eq!(hasher.cardinality, 4);

        let mut slots: Vec<usize> = keys.iter().map(|&k| hasher.hash(k)).collect();
        slots.sort_unstable();
        slots.dedup();
        assert_eq!(slots.len(), keys.len(), "plan must be injective");
    }

    #[test]
    fn test_plan_is_injective_over_original_keys() {
        let keys = [3, 9, 27, 81, 243, 729, 2187];
        let hasher = IntHasher::for_keys(&keys).unwrap();
        assert!(hasher.cardinality.is_power_of_two());
        assert!(hasher.cardinality >= keys.len());

        let mut seen = vec![false; hasher.cardinality];
        for &key in &keys {
            let slot = hasher.hash(key);
            assert!(slot < hasher.cardinality);
            assert!(!seen[slot], "keys {:?} collide at slot {}", keys, slot);
            seen[slot] = true;
        }
    }

    #[test]
    fn test_negative_keys() {
        let keys = [-100, -1, 0, 55];
        let hasher = IntHasher::for_keys(&keys).unwrap();
        let mut slots: Vec<usize> = keys.iter().map(|&k| hasher.hash(k)).collect();
        slots.sort_unstable();
        slots.dedup();
        assert_eq!(slots.len(), keys.len());
    }

    #[test]
    fn test_contiguous_keys() {
        // Dense keys hash trivially with factor 1, shift 0.
        let keys: Vec<i32> = (0..8).collect();
        let hasher = IntHasher::for_keys(&keys).unwrap();
        assert_eq!(hasher.cardinality, 8);
        assert_eq!(hasher.factor, 1);
        assert_eq!(hasher.shift, 0);
        for &key in &keys {
            assert_eq!(hasher.hash(key), key as usize);
        }
    }

    #[test]
    fn test_determinism() {
        let keys = [5, 17, 98, 1024, 40000];
        assert_eq!(IntHasher::for_keys(&keys), IntHasher::for_keys(&keys));
    }
}
