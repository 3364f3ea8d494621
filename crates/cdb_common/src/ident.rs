//! Interned command-line flags for cheap storage and O(1) equality.

use std::cmp::Ordering;

use lasso::ThreadedRodeo;
use serde::{Deserialize, Serialize};

/// A single interned command-line flag.
///
/// Compilation databases repeat the same handful of flags across thousands of
/// entries. Each distinct flag string is stored once in a [`FlagInterner`] and
/// records hold `Flag` keys instead, so equality between two flag sequences is
/// a comparison of `u32` slices.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Flag(u32);

impl Flag {
    /// Creates a `Flag` from a raw `u32` index.
    ///
    /// This is primarily intended for deserialization and testing.
    /// In normal use, flags should be created through [`FlagInterner::get_or_intern`].
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw `u32` index of this flag.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}

// SAFETY: `Flag` wraps a `u32` which is always a valid `usize` on 32-bit and
// 64-bit platforms. `try_from_usize` rejects values that don't fit in `u32`.
unsafe impl lasso::Key for Flag {
    fn into_usize(self) -> usize {
        self.0 as usize
    }

    fn try_from_usize(int: usize) -> Option<Self> {
        u32::try_from(int).ok().map(Flag)
    }
}

/// Thread-safe flag interner backed by [`lasso::ThreadedRodeo`].
///
/// One interner lives for one parse pass and travels with the resulting
/// database contents, since the records' [`Flag`] keys are meaningless without
/// it.
pub struct FlagInterner {
    rodeo: ThreadedRodeo<Flag>,
}

impl FlagInterner {
    /// Creates a new empty interner.
    pub fn new() -> Self {
        Self {
            rodeo: ThreadedRodeo::new(),
        }
    }

    /// Interns a flag, returning its key. If the string was already interned,
    /// returns the existing key without allocating.
    pub fn get_or_intern(&self, s: &str) -> Flag {
        self.rodeo.get_or_intern(s)
    }

    /// Resolves a [`Flag`] back to its string value.
    ///
    /// # Panics
    ///
    /// Panics if the `Flag` was not created by this interner.
    pub fn resolve(&self, flag: Flag) -> &str {
        self.rodeo.resolve(&flag)
    }

    /// Resolves a whole flag sequence to owned strings.
    pub fn resolve_all(&self, flags: &[Flag]) -> Vec<String> {
        flags.iter().map(|&f| self.resolve(f).to_string()).collect()
    }

    /// Returns the number of distinct flags interned so far.
    pub fn len(&self) -> usize {
        self.rodeo.len()
    }

    /// Returns `true` if no flags have been interned.
    pub fn is_empty(&self) -> bool {
        self.rodeo.is_empty()
    }

    /// Compares two flag sequences lexicographically by their string values.
    ///
    /// Keys are assigned in first-seen order, so comparing raw keys would not
    /// give a string ordering; this resolves each pair instead.
    pub fn compare(&self, lhs: &[Flag], rhs: &[Flag]) -> Ordering {
        for (&a, &b) in lhs.iter().zip(rhs) {
            if a == b {
                continue;
            }
            match self.resolve(a).cmp(self.resolve(b)) {
                Ordering::Equal => {}
                other => return other,
            }
        }
        lhs.len().cmp(&rhs.len())
    }
}

impl Default for FlagInterner {
    fn default() -> Self {
        Self::new()
    }
}
