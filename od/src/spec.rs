//! Extraction configuration and the extracted-unit type

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors detected at spec construction, before any I/O
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpecError {
    #[error("block/buffer size must be positive")]
    ZeroSize,
}

/// Line separator byte patterns, selected by OS convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LineSep {
    Unix,
    Windows,
    Macos,
}

impl LineSep {
    pub fn as_bytes(self) -> &'static [u8] {
        match self {
            LineSep::Unix => b"\n",
            LineSep::Windows => b"\r\n",
            LineSep::Macos => b"\r",
        }
    }
}

/// Numeral base offsets were reported in; controls output file naming
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OffsetBase {
    Hex,
    Dec,
}

impl OffsetBase {
    /// Render an offset the way it will appear in an output file name
    pub fn render(self, offset: u64) -> String {
        match self {
            OffsetBase::Hex => format!("{:#x}", offset),
            OffsetBase::Dec => offset.to_string(),
        }
    }
}

/// Extraction mode, resolved once at spec construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Delimiter-bounded lines
    Line(LineSep),
    /// Fixed-size aligned storage blocks
    Block,
}

/// Immutable configuration bundle for one run
#[derive(Debug, Clone, Copy)]
pub struct ExtractionSpec {
    pub mode: Mode,
    /// Block size in block mode, scan buffer size in line mode
    pub size: u64,
    /// Extra units to include before the matching one
    pub before: u64,
    /// Extra units to include after the matching one
    pub after: u64,
    /// Suppress units whose content was already emitted for a smaller offset
    pub dedup: bool,
    /// Numeral base for output file naming
    pub base: OffsetBase,
    /// Treat end-of-file as a line terminator when the final delimiter is missing
    pub strict: bool,
}

impl ExtractionSpec {
    pub fn validate(&self) -> Result<(), SpecError> {
        if self.size == 0 {
            return Err(SpecError::ZeroSize);
        }
        Ok(())
    }
}

/// What kind of unit a buffer holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    Line,
    Block,
}

/// One extracted line or block, tied to the offset it was derived from
#[derive(Debug, Clone)]
pub struct Unit {
    pub offset: u64,
    pub kind: UnitKind,
    pub bytes: Vec<u8>,
}

impl Unit {
    /// File name for per-offset output, e.g. `line_0x14e.txt` or `block_122.bin`
    pub fn file_name(&self, base: OffsetBase) -> String {
        let (stem, ext) = match self.kind {
            UnitKind::Line => ("line", "txt"),
            UnitKind::Block => ("block", "bin"),
        };
        format!("{}_{}.{}", stem, base.render(self.offset), ext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_size_rejected() {
        let spec = ExtractionSpec {
            mode: Mode::Block,
            size: 0,
            before: 0,
            after: 0,
            dedup: false,
            base: OffsetBase::Hex,
            strict: false,
        };
        assert_eq!(spec.validate(), Err(SpecError::ZeroSize));
    }

    #[test]
    fn test_file_names() {
        let line = Unit {
            offset: 0x14e,
            kind: UnitKind::Line,
            bytes: vec![],
        };
        assert_eq!(line.file_name(OffsetBase::Hex), "line_0x14e.txt");

        let block = Unit {
            offset: 122,
            kind: UnitKind::Block,
            bytes: vec![],
        };
        assert_eq!(block.file_name(OffsetBase::Dec), "block_122.bin");
        assert_eq!(block.file_name(OffsetBase::Hex), "block_0x7a.bin");
    }

    #[test]
    fn test_linesep_bytes() {
        assert_eq!(LineSep::Unix.as_bytes(), b"\n");
        assert_eq!(LineSep::Windows.as_bytes(), b"\r\n");
        assert_eq!(LineSep::Macos.as_bytes(), b"\r");
    }
}
