//! History window assembly.

use chatrelay_types::turn::{HistoryEntry, TurnRecord};

/// Expand turn records into role-tagged history entries.
///
/// Each record yields a `user` entry followed by an `assistant` entry, in the
/// order the records are given, so `n` records always yield `2n` entries.
pub fn expand_history(records: &[TurnRecord]) -> Vec<HistoryEntry> {
    records.iter().flat_map(TurnRecord::to_history_pair).collect()
}
