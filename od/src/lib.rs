//! OffsetDump - recover lines or storage blocks by matcher-reported offsets
//!
//! A forensic triage helper: given byte offsets reported by an external
//! matcher (YARA output or strings output), extract the surrounding textual
//! line or the surrounding aligned storage block from an arbitrarily large
//! file or image, without loading the whole file into memory.
//!
//! # Architecture
//!
//! ```text
//! matcher report ──> offsets::parse_offsets ──> sorted unique offsets
//!                                                      │
//!                       target file (read-only) ───────┤
//!                                                      ▼
//!              scanner::WindowedScanner (chunked boundary search)
//!                                                      │
//!                             dedup::Deduplicator (optional, SHA-256)
//!                                                      │
//!                                                      ▼
//!                  sink::OutputSink (stdout stream or per-offset files)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use offsetdump::{ExtractionSpec, LineSep, Mode, OffsetBase, OutputSink, Pipeline};
//!
//! let spec = ExtractionSpec {
//!     mode: Mode::Line(LineSep::Unix),
//!     size: 512,
//!     before: 0,
//!     after: 0,
//!     dedup: false,
//!     base: OffsetBase::Hex,
//!     strict: false,
//! };
//! let mut pipeline = Pipeline::new(spec)?;
//! let mut sink = OutputSink::stdout();
//! let summary = pipeline.run(&mut infile, &offsets, &mut sink);
//! ```

pub mod cli;
pub mod config;
pub mod dedup;
pub mod offsets;
pub mod pipeline;
pub mod scanner;
pub mod sink;
pub mod spec;

pub use dedup::Deduplicator;
pub use offsets::{OffsetError, OffsetFormat, parse_offsets};
pub use pipeline::{Pipeline, RunSummary};
pub use scanner::{ScanError, WindowedScanner};
pub use sink::{OutputSink, SinkError};
pub use spec::{ExtractionSpec, LineSep, Mode, OffsetBase, SpecError, Unit, UnitKind};

/// Default block size for block mode and scan buffer size for line mode
pub const DEFAULT_BLOCKSIZE: u64 = 512;
