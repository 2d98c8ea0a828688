// This module models multi-way branches and decides how each one is realized.
// SwitchCase holds the validated input: strictly ascending distinct keys with
// per-key probabilities and targets plus one default target. SwitchStrategy is the
// decision-tree side of the trade-off: a comparison ordering together with its
// average effort, the scalar cost estimate the selection heuristic consumes. The
// in-crate cost model orders comparisons by descending probability and charges the
// expected number of comparisons; embedders with their own model inject the scalar
// through with_effort. plan_switch implements the selection rule: a cheap decision
// tree (effort below 4) always wins; otherwise a table form is used only when its
// density clears 1/sqrt(effort), and between the two table forms the denser one
// wins, since density approximates both footprint and the cost of default-filled
// slots. The constructed decision carries the fully built target arrays so
// emission is a straight transcription.

//! Switch cases, strategy cost, and dispatch form selection.

use super::error::{LowerError, LowerResult};
use super::hashing::IntHasher;
use super::lir::Label;

/// Effort below which a decision tree is always preferred over any table.
const TABLE_SWITCH_MIN_EFFORT: f64 = 4.0;

/// A validated multi-way branch: ascending keys, aligned probabilities and
/// targets, one default target.
#[derive(Debug, Clone)]
pub struct SwitchCase {
    keys: Vec<i32>,
    probabilities: Vec<f64>,
    targets: Vec<Label>,
    default_target: Label,
}

impl SwitchCase {
    /// Validate and build a switch case.
    ///
    /// Keys must be strictly ascending (hence pairwise distinct) and the
    /// probability and target vectors must align with them by index.
    pub fn new(
        keys: Vec<i32>,
        probabilities: Vec<f64>,
        targets: Vec<Label>,
        default_target: Label,
    ) -> LowerResult<Self> {
        if keys.len() != probabilities.len() || keys.len() != targets.len() {
            return Err(LowerError::MalformedSwitch {
                reason: format!(
                    "{} keys, {} probabilities, {} targets",
                    keys.len(),
                    probabilities.len(),
                    targets.len()
                ),
            });
        }
        if let Some(window) = keys.windows(2).find(|w| w[0] >= w[1]) {
            return Err(LowerError::MalformedSwitch {
                reason: format!("keys not strictly ascending at {} .. {}", window[0], window[1]),
            });
        }
        if let Some(p) = probabilities.iter().find(|p| !(0.0..=1.0).contains(*p)) {
            return Err(LowerError::MalformedSwitch {
                reason: format!("probability {} outside [0, 1]", p),
            });
        }
        Ok(Self {
            keys,
            probabilities,
            targets,
            default_target,
        })
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[i32] {
        &self.keys
    }

    pub fn key(&self, index: usize) -> i32 {
        self.keys[index]
    }

    pub fn probability(&self, index: usize) -> f64 {
        self.probabilities[index]
    }

    pub fn target(&self, index: usize) -> Label {
        self.targets[index]
    }

    pub fn default_target(&self) -> Label {
        self.default_target
    }
}

/// A decision-tree realization candidate: a comparison ordering plus its
/// average effort.
///
/// The effort scalar is the only part of the cost model the selection rule
/// consumes. [`SwitchStrategy::best_for`] supplies a consistent in-crate
/// model; embedders with a richer one use [`SwitchStrategy::with_effort`].
#[derive(Debug, Clone)]
pub struct SwitchStrategy {
    order: Vec<usize>,
    average_effort: f64,
}

impl SwitchStrategy {
    /// Build the best in-crate strategy for a case: compare the most probable
    /// keys first, and charge the expected number of comparisons.
    ///
    /// Effort = sum over ordered comparisons of p * (position + 1), plus the
    /// residual default probability paying for the full sequence.
    pub fn best_for(case: &SwitchCase) -> Self {
        let n = case.len();
        let mut order: Vec<usize> = (0..n).collect();
        // Stable sort keeps key order on probability ties, so the ordering
        // (and the emitted LIR) is deterministic.
        order.sort_by(|&a, &b| {
            case.probability(b)
                .partial_cmp(&case.probability(a))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let covered: f64 = (0..n).map(|i| case.probability(i)).sum();
        let default_probability = (1.0 - covered).max(0.0);
        let mut average_effort = default_probability * n as f64;
        for (position, &index) in order.iter().enumerate() {
            average_effort += case.probability(index) * (position + 1) as f64;
        }

        Self {
            order,
            average_effort,
        }
    }

    /// Adopt an externally computed ordering and effort scalar.
    pub fn with_effort(order: Vec<usize>, average_effort: f64) -> Self {
        Self {
            order,
            average_effort,
        }
    }

    /// Case indices in comparison order.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// The scalar cost estimate for resolving the switch by comparisons.
    pub fn average_effort(&self) -> f64 {
        self.average_effort
    }
}

/// The chosen dispatch form, carrying the data needed to emit it.
#[derive(Debug, Clone, PartialEq)]
pub enum LoweringDecision {
    /// Ordered comparison sequence per the strategy.
    DecisionTree,
    /// Dense table indexed by `key - low_key`; out-of-range keys fall
    /// through to the default.
    RangeTable { low_key: i32, targets: Vec<Label> },
    /// Power-of-two table indexed by the hash; `keys[slot]` records which
    /// key owns a slot so false hits fall through to the default.
    HashTable {
        hasher: IntHasher,
        keys: Vec<i32>,
        targets: Vec<Label>,
    },
}

/// Decide how a switch is realized.
///
/// A cheap decision tree (effort < 4) is never worth replacing with a
/// table. Otherwise a table is used only if densely populated: the density
/// floor is `1/sqrt(effort)`, so more expensive trees tolerate sparser
/// tables. Between the two table forms the denser one wins.
pub fn plan_switch(case: &SwitchCase, strategy: &SwitchStrategy) -> LoweringDecision {
    let key_count = case.len();
    if key_count == 0 {
        // Degenerate switch: the decision tree is a bare jump to the default.
        return LoweringDecision::DecisionTree;
    }

    let hasher = IntHasher::for_keys(case.keys());
    let hash_density = hasher
        .map(|h| key_count as f64 / h.cardinality as f64)
        .unwrap_or(0.0);

    // The range computation may overflow i32, so widen.
    let value_range = case.key(key_count - 1) as i64 - case.key(0) as i64 + 1;
    let table_density = key_count as f64 / value_range as f64;

    let average_effort = strategy.average_effort();
    let min_density = 1.0 / average_effort.sqrt();
    if average_effort < TABLE_SWITCH_MIN_EFFORT
        || (table_density < min_density && hash_density < min_density)
    {
        return LoweringDecision::DecisionTree;
    }

    if hash_density > table_density {
        // hash_density > 0 implies a plan exists.
        let hasher = hasher.expect("hash density positive without a plan");
        let mut keys = vec![0i32; hasher.cardinality];
        let mut targets = vec![case.default_target(); hasher.cardinality];
        for i in 0..key_count {
            let slot = hasher.hash(case.key(i));
            keys[slot] = case.key(i);
            targets[slot] = case.target(i);
        }
        LoweringDecision::HashTable {
            hasher,
            keys,
            targets,
        }
    } else {
        let low_key = case.key(0);
        // The density floor keeps value_range within a few multiples of the
        // key count whenever this arm is reached.
        let mut targets = vec![case.default_target(); value_range as usize];
        for i in 0..key_count {
            targets[(case.key(i) as i64 - low_key as i64) as usize] = case.target(i);
        }
        LoweringDecision::RangeTable { low_key, targets }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::lir::BlockId;

    fn label(n: u32) -> Label {
        Label(BlockId(n))
    }

    fn uniform_case(keys: Vec<i32>) -> SwitchCase {
        let n = keys.len();
        let probabilities = vec![1.0 / (n as f64 + 1.0); n];
        let targets = (0..n as u32).map(|i| label(i + 1)).collect();
        SwitchCase::new(keys, probabilities, targets, label(0)).unwrap()
    }

    #[test]
    fn test_rejects_unsorted_keys() {
        let err = SwitchCase::new(
            vec![3, 1],
            vec![0.5, 0.5],
            vec![label(1), label(2)],
            label(0),
        )
        .unwrap_err();
        assert!(matches!(err, LowerError::MalformedSwitch { .. }));
    }

    #[test]
    fn test_rejects_duplicate_keys() {
        let err = SwitchCase::new(
            vec![1, 1],
            vec![0.5, 0.5],
            vec![label(1), label(2)],
            label(0),
        )
        .unwrap_err();
        assert!(matches!(err, LowerError::MalformedSwitch { .. }));
    }

    #[test]
    fn test_rejects_misaligned_lengths() {
        let err = SwitchCase::new(vec![1, 2], vec![0.5], vec![label(1), label(2)], label(0))
            .unwrap_err();
        assert!(matches!(err, LowerError::MalformedSwitch { .. }));
    }

    #[test]
    fn test_low_effort_always_decision_tree() {
        // Fully dense keys, but a cheap tree wins regardless of density.
        let case = uniform_case((0..1000).collect());
        let strategy = SwitchStrategy::with_effort((0..1000).collect(), 1.5);
        assert_eq!(plan_switch(&case, &strategy), LoweringDecision::DecisionTree);
    }

    #[test]
    fn test_dense_keys_pick_range_table() {
        let case = uniform_case((0..10).collect());
        let strategy = SwitchStrategy::with_effort((0..10).collect(), 5.0);
        match plan_switch(&case, &strategy) {
            LoweringDecision::RangeTable { low_key, targets } => {
                assert_eq!(low_key, 0);
                assert_eq!(targets.len(), 10);
                // Fully dense: no slot holds the default.
                for (k, target) in targets.iter().enumerate() {
                    assert_eq!(*target, label(k as u32 + 1));
                }
            }
            other => panic!("expected range table, got {:?}", other),
        }
    }

    #[test]
    fn test_sparse_keys_pick_hash_table() {
        let case = uniform_case(vec![0, 1000, 2000]);
        let strategy = SwitchStrategy::with_effort(vec![0, 1, 2], 5.0);
        match plan_switch(&case, &strategy) {
            LoweringDecision::HashTable {
                hasher,
                keys,
                targets,
            } => {
                assert_eq!(hasher.cardinality, 4);
                assert_eq!(targets.len(), 4);
                // Exactly three slots hold mapped targets, one the default.
                let default_slots = targets.iter().filter(|t| **t == label(0)).count();
                assert_eq!(default_slots, 1);
                for (i, &key) in [0, 1000, 2000].iter().enumerate() {
                    let slot = hasher.hash(key);
                    assert_eq!(keys[slot], key);
                    assert_eq!(targets[slot], label(i as u32 + 1));
                }
            }
            other => panic!("expected hash table, got {:?}", other),
        }
    }

    #[test]
    fn test_both_densities_low_fall_back_to_tree() {
        // Keys sparse enough that neither table form clears the floor when
        // no good hash exists is hard to force; instead push the effort just
        // past 4 with a moderately sparse range and verify the density rule.
        let case = uniform_case(vec![0, 100_000_000, 2_000_000_000]);
        let strategy = SwitchStrategy::with_effort(vec![0, 1, 2], 5.0);
        let decision = plan_switch(&case, &strategy);
        // A hash plan exists (density 0.75 >= 0.447), so table selection
        // proceeds and the hash form wins over the hopeless range table.
        assert!(matches!(decision, LoweringDecision::HashTable { .. }));
    }

    #[test]
    fn test_range_overflow_is_widened() {
        // Keys spanning almost the whole i32 range must not overflow the
        // range computation.
        let case = uniform_case(vec![i32::MIN, 0, i32::MAX]);
        let strategy = SwitchStrategy::with_effort(vec![0, 1, 2], 2.0);
        assert_eq!(plan_switch(&case, &strategy), LoweringDecision::DecisionTree);
    }

    #[test]
    fn test_best_for_orders_by_probability() {
        let case = SwitchCase::new(
            vec![1, 2, 3],
            vec![0.1, 0.6, 0.2],
            vec![label(1), label(2), label(3)],
            label(0),
        )
        .unwrap();
        let strategy = SwitchStrategy::best_for(&case);
        assert_eq!(strategy.order(), &[1, 2, 0]);

        // 0.6*1 + 0.2*2 + 0.1*3 + 0.1*3 (default) = 1.6
        assert!((strategy.average_effort() - 1.6).abs() < 1e-9);
    }

    #[test]
    fn test_best_for_is_deterministic_on_ties() {
        let case = uniform_case(vec![10, 20, 30]);
        let strategy = SwitchStrategy::best_for(&case);
        assert_eq!(strategy.order(), &[0, 1, 2]);
    }
}
