// This module provides arena-based lowering session management using the bumpalo
// crate to simplify lifetime management in lirgen. LoweringSession is the central
// hub that owns the arena allocator and accumulates statistics for one lowering
// pass: blocks lowered, instructions appended, per-mnemonic instruction counts,
// and how often each switch dispatch form (decision tree, range table, hash table)
// was selected. It also interns strings in the arena for diagnostic labels that
// must outlive their producers. All objects allocated through the session share
// its lifetime, eliminating complex lifetime annotations. SessionStats implements
// Display so a lowering pass can be summarized in trace output. The session is
// process-local mutable state behind RefCell; one session serves one
// single-threaded lowering pass, and independent passes share nothing.

//! Arena-based lowering session management.
//!
//! This module provides simplified lifetime management for LIR generation
//! using arena allocation. All lowering objects are tied to the session
//! lifetime, eliminating complex lifetime propagation.

use bumpalo::Bump;
use hashbrown::HashMap;
use std::cell::RefCell;
use std::fmt;

/// The three dispatch forms a switch may lower to, tracked in statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwitchKind {
    DecisionTree,
    RangeTable,
    HashTable,
}

/// Arena-based lowering session.
///
/// This manages the lifetime of lowering objects, using arena allocation to
/// simplify memory management, and accumulates statistics as blocks are
/// lowered.
pub struct LoweringSession<'arena> {
    /// Arena allocator for lowering objects.
    arena: &'arena Bump,

    /// Session statistics for debugging and tuning.
    stats: RefCell<SessionStats>,

    /// String interning for efficient storage of diagnostic labels.
    interned_strings: RefCell<HashMap<String, &'arena str>>,
}

impl<'arena> LoweringSession<'arena> {
    /// Create a new lowering session with the given arena.
    pub fn new(arena: &'arena Bump) -> Self {
        Self {
            arena,
            stats: RefCell::new(SessionStats::default()),
            interned_strings: RefCell::new(HashMap::new()),
        }
    }

    /// Get access to the arena allocator.
    pub fn arena(&self) -> &'arena Bump {
        self.arena
    }

    /// Allocate an object in the session arena.
    pub fn alloc<T>(&self, value: T) -> &'arena mut T {
        self.arena.alloc(value)
    }

    /// Allocate a slice in the session arena.
    pub fn alloc_slice<T>(&self, slice: &[T]) -> &'arena [T]
    where
        T: Clone,
    {
        self.arena.alloc_slice_clone(slice)
    }

    /// Intern a string in the arena.
    pub fn intern_str(&self, s: &str) -> &'arena str {
        let mut strings = self.interned_strings.borrow_mut();
        if let Some(&interned) = strings.get(s) {
            return interned;
        }

        let interned = self.arena.alloc_str(s);
        strings.insert(s.to_string(), interned);
        interned
    }

    /// Record that a block's lowering finished.
    pub fn record_block_lowered(&self) {
        self.stats.borrow_mut().blocks_lowered += 1;
    }

    /// Record an appended instruction.
    pub fn record_instruction_appended(&self, mnemonic: &str) {
        let mut stats = self.stats.borrow_mut();
        stats.instructions_appended += 1;
        *stats
            .instruction_counts
            .entry(mnemonic.to_string())
            .or_insert(0) += 1;
    }

    /// Record which dispatch form a switch lowered to.
    pub fn record_switch_lowered(&self, kind: SwitchKind) {
        let mut stats = self.stats.borrow_mut();
        match kind {
            SwitchKind::DecisionTree => stats.decision_tree_switches += 1,
            SwitchKind::RangeTable => stats.range_table_switches += 1,
            SwitchKind::HashTable => stats.hash_table_switches += 1,
        }
    }

    /// Get lowering statistics.
    pub fn stats(&self) -> SessionStats {
        self.stats.borrow().clone()
    }
}

/// Lowering session statistics.
#[derive(Debug, Default, Clone)]
pub struct SessionStats {
    /// Number of blocks lowered to completion.
    pub blocks_lowered: usize,

    /// Number of instructions appended.
    pub instructions_appended: usize,

    /// Count of each instruction mnemonic appended.
    pub instruction_counts: HashMap<String, usize>,

    /// Switches lowered as decision trees.
    pub decision_tree_switches: usize,

    /// Switches lowered as dense range tables.
    pub range_table_switches: usize,

    /// Switches lowered as hashed tables.
    pub hash_table_switches: usize,
}

impl fmt::Display for SessionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Lowering Session Statistics:")?;
        writeln!(f, "  Blocks lowered: {}", self.blocks_lowered)?;
        writeln!(f, "  Instructions appended: {}", self.instructions_appended)?;
        writeln!(
            f,
            "  Switches: {} decision tree, {} range table, {} hash table",
            self.decision_tree_switches, self.range_table_switches, self.hash_table_switches
        )?;

        if !self.instruction_counts.is_empty() {
            writeln!(f, "  Instruction breakdown:")?;
            let mut sorted: Vec<_> = self.instruction_counts.iter().collect();
            sorted.sort_by_key(|(_, count)| std::cmp::Reverse(*count));

            for (mnemonic, count) in sorted.into_iter().take(10) {
                writeln!(f, "    {}: {}", mnemonic, count)?;
            }
        }

        Ok(())
    }
}
