//! End-to-end extraction drive
//!
//! Iterates the parsed offsets in ascending order against a single open
//! handle: extract, dedup-filter, emit. Per-offset failures are reported and
//! skipped; extraction is best-effort.

use std::io::{Read, Seek};

use log::{info, warn};

use crate::dedup::Deduplicator;
use crate::scanner::WindowedScanner;
use crate::sink::OutputSink;
use crate::spec::{ExtractionSpec, SpecError};

/// Counters for one run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub extracted: usize,
    pub written: usize,
    pub duplicates: usize,
    pub failed: usize,
}

pub struct Pipeline {
    spec: ExtractionSpec,
    dedup: Deduplicator,
}

impl Pipeline {
    pub fn new(spec: ExtractionSpec) -> Result<Self, SpecError> {
        spec.validate()?;
        let dedup = Deduplicator::new(spec.dedup);
        Ok(Self { spec, dedup })
    }

    /// Process every offset in order. Units are emitted strictly in
    /// ascending offset order; no unit is retried or re-ordered.
    pub fn run<R: Read + Seek>(
        &mut self,
        src: &mut R,
        offsets: &[u64],
        sink: &mut OutputSink,
    ) -> RunSummary {
        let scanner = WindowedScanner::new(&self.spec);
        let mut summary = RunSummary::default();

        for &offset in offsets {
            let unit = match scanner.extract(src, offset) {
                Ok(unit) => unit,
                Err(err) => {
                    warn!("skipping offset {:#x}: {}", offset, err);
                    summary.failed += 1;
                    continue;
                }
            };
            summary.extracted += 1;

            let Some(unit) = self.dedup.filter(unit) else {
                summary.duplicates += 1;
                continue;
            };

            match sink.write(&unit) {
                Ok(()) => summary.written += 1,
                Err(err) => {
                    warn!("failed to emit offset {:#x}: {}", offset, err);
                    summary.failed += 1;
                }
            }
        }

        info!(
            "run complete: {} extracted, {} written, {} duplicates, {} failed",
            summary.extracted, summary.written, summary.duplicates, summary.failed
        );
        summary
    }
}
