//! Human readable summaries of context entries, used in logs and test diffs.

use serde::{Deserialize, Serialize};

use crate::context::StylingContext;
use crate::error::{Result, StylingError};
use crate::flags::{EntryFlags, MasterFlags};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagSummary {
    pub dirty: bool,
    pub class: bool,
    pub sanitize: bool,
    pub player_builders_dirty: bool,
    pub only_process_single_classes: bool,
    pub binding_allocation_locked: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntrySummary {
    pub name: String,
    pub initial_index: Option<usize>,
    /// Counterpart entry, or the multi region start for the master summary.
    pub linked_index: Option<usize>,
    pub raw_flags: u8,
    pub flags: FlagSummary,
}

impl StylingContext {
    /// Summary of entry `index`, or of the context-wide flags when `index` is `None`.
    pub fn config_summary(&self, index: Option<usize>) -> Result<EntrySummary> {
        let Some(index) = index else {
            let m = self.master;
            return Ok(EntrySummary {
                name: "master config".to_string(),
                initial_index: None,
                linked_index: Some(self.multi_start),
                raw_flags: m.bits(),
                flags: FlagSummary {
                    dirty: m.contains(MasterFlags::DIRTY),
                    player_builders_dirty: m.contains(MasterFlags::PLAYER_BUILDERS_DIRTY),
                    only_process_single_classes: m
                        .contains(MasterFlags::ONLY_PROCESS_SINGLE_CLASSES),
                    binding_allocation_locked: m
                        .contains(MasterFlags::BINDING_ALLOCATION_LOCKED),
                    ..FlagSummary::default()
                },
            });
        };
        let entry = self.entries.get(index).ok_or(StylingError::IndexOutOfRange {
            index,
            len: self.entries.len(),
        })?;
        let f = entry.flags;
        Ok(EntrySummary {
            name: entry.prop.clone(),
            initial_index: entry.initial_index,
            linked_index: entry.counterpart,
            raw_flags: f.bits(),
            flags: FlagSummary {
                dirty: f.contains(EntryFlags::DIRTY),
                class: f.contains(EntryFlags::CLASS),
                sanitize: f.contains(EntryFlags::SANITIZE),
                ..FlagSummary::default()
            },
        })
    }

    pub fn summaries(&self) -> Vec<EntrySummary> {
        (0..self.entries.len())
            .filter_map(|i| self.config_summary(Some(i)).ok())
            .collect()
    }
}

/// One line per differing field, prefixed with the entry name. Flags are
/// compared through their decoded booleans.
pub fn compare_summaries(a: &EntrySummary, b: &EntrySummary) -> Vec<String> {
    let mut diffs = Vec::new();
    let mut check = |field: &str, lhs: String, rhs: String| {
        if lhs != rhs {
            diffs.push(format!("{}.{field}: {lhs} != {rhs}", a.name));
        }
    };
    check("name", a.name.clone(), b.name.clone());
    check(
        "initial_index",
        format!("{:?}", a.initial_index),
        format!("{:?}", b.initial_index),
    );
    check(
        "linked_index",
        format!("{:?}", a.linked_index),
        format!("{:?}", b.linked_index),
    );
    let (fa, fb) = (&a.flags, &b.flags);
    for (field, lhs, rhs) in [
        ("dirty", fa.dirty, fb.dirty),
        ("class", fa.class, fb.class),
        ("sanitize", fa.sanitize, fb.sanitize),
        ("player_builders_dirty", fa.player_builders_dirty, fb.player_builders_dirty),
        (
            "only_process_single_classes",
            fa.only_process_single_classes,
            fb.only_process_single_classes,
        ),
        (
            "binding_allocation_locked",
            fa.binding_allocation_locked,
            fb.binding_allocation_locked,
        ),
    ] {
        check(field, lhs.to_string(), rhs.to_string());
    }
    diffs
}
