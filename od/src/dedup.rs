//! Content-digest duplicate suppression
//!
//! Offsets are processed in ascending order, so dropping a unit whose digest
//! was already seen keeps exactly the occurrence at the smallest offset.

use std::collections::HashSet;

use log::debug;
use sha2::{Digest, Sha256};

use crate::spec::Unit;

pub struct Deduplicator {
    enabled: bool,
    seen: HashSet<String>,
}

impl Deduplicator {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            seen: HashSet::new(),
        }
    }

    /// Pass the unit through, or drop it when its content digest was already
    /// emitted for a smaller offset. When disabled, no hashing occurs.
    pub fn filter(&mut self, unit: Unit) -> Option<Unit> {
        if !self.enabled {
            return Some(unit);
        }
        let digest = format!("{:x}", Sha256::digest(&unit.bytes));
        if self.seen.insert(digest) {
            Some(unit)
        } else {
            debug!("dropping duplicate unit at offset {:#x}", unit.offset);
            None
        }
    }
}
