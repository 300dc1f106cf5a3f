//! Windowed boundary scanner
//!
//! Locates line or block boundaries around an arbitrary byte position using
//! bounded-memory chunked reads, then extracts the unit together with the
//! configured number of preceding/following units. The scan position is an
//! explicit parameter to every step; the handle's implicit cursor is never
//! relied on.

use std::io::{self, Read, Seek, SeekFrom};

use log::trace;
use thiserror::Error;

use crate::spec::{ExtractionSpec, Mode, Unit, UnitKind};

/// Per-offset extraction failures
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("read failed at offset {offset:#x}: {source}")]
    Io {
        offset: u64,
        #[source]
        source: io::Error,
    },

    #[error("offset {offset:#x}: {before} context blocks reach before start of file")]
    BeforeStart { offset: u64, before: u64 },
}

/// Seek to `start` and read up to `len` bytes, tolerating short reads.
/// The window is transient and owned by the scan step that requested it.
fn read_window<R: Read + Seek>(src: &mut R, start: u64, len: u64) -> io::Result<Vec<u8>> {
    src.seek(SeekFrom::Start(start))?;
    let mut buf = vec![0u8; len as usize];
    let mut filled = 0;
    while filled < buf.len() {
        let n = src.read(&mut buf[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    buf.truncate(filled);
    Ok(buf)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn rfind(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).rposition(|w| w == needle)
}

pub struct WindowedScanner<'a> {
    spec: &'a ExtractionSpec,
}

impl<'a> WindowedScanner<'a> {
    pub fn new(spec: &'a ExtractionSpec) -> Self {
        Self { spec }
    }

    /// Absolute offset of the last delimiter at or before `position`, or
    /// `None` when the file start is reached without a match. Chunks end
    /// exactly at the current scan pointer and shrink near position 0 so no
    /// read goes negative. A delimiter straddling two chunks is not matched;
    /// chunks are searched independently.
    fn find_backward<R: Read + Seek>(
        &self,
        src: &mut R,
        position: u64,
        delim: &[u8],
    ) -> io::Result<Option<u64>> {
        let mut p = position;
        loop {
            let sz = self.spec.size.min(p);
            p -= sz;
            let buf = read_window(src, p, sz)?;
            if let Some(i) = rfind(&buf, delim) {
                trace!("backward hit at {:#x} (scan pointer {:#x})", p + i as u64, p);
                return Ok(Some(p + i as u64));
            }
            if p == 0 {
                return Ok(None);
            }
        }
    }

    /// Absolute offset of the first delimiter at or after `position`, or
    /// `None` when end-of-file is reached without a match.
    fn find_forward<R: Read + Seek>(
        &self,
        src: &mut R,
        position: u64,
        delim: &[u8],
    ) -> io::Result<Option<u64>> {
        let end = src.seek(SeekFrom::End(0))?;
        let mut p = position;
        while p < end {
            let sz = self.spec.size.min(end - p);
            let buf = read_window(src, p, sz)?;
            if let Some(i) = find(&buf, delim) {
                trace!("forward hit at {:#x} (scan pointer {:#x})", p + i as u64, p);
                return Ok(Some(p + i as u64));
            }
            p += sz;
        }
        Ok(None)
    }

    /// Backward boundary search. Returns the absolute offset of the
    /// delimiter's first byte, or 0 when the file start acts as the boundary.
    pub fn locate_backward<R: Read + Seek>(
        &self,
        src: &mut R,
        position: u64,
        delim: &[u8],
    ) -> io::Result<u64> {
        Ok(self.find_backward(src, position, delim)?.unwrap_or(0))
    }

    /// Forward boundary search. Returns the absolute offset of the
    /// delimiter's first byte, or the 0 sentinel when no delimiter exists
    /// before end-of-file.
    pub fn locate_forward<R: Read + Seek>(
        &self,
        src: &mut R,
        position: u64,
        delim: &[u8],
    ) -> io::Result<u64> {
        Ok(self.find_forward(src, position, delim)?.unwrap_or(0))
    }

    /// Extract the line containing `position` plus `before`/`after` context
    /// lines. Boundary delimiters never appear in the output; interior
    /// delimiters of a multi-line window do.
    pub fn extract_line<R: Read + Seek>(
        &self,
        src: &mut R,
        position: u64,
        delim: &[u8],
    ) -> Result<Vec<u8>, ScanError> {
        self.line_range(src, position, delim)
            .map_err(|source| ScanError::Io {
                offset: position,
                source,
            })
    }

    fn line_range<R: Read + Seek>(
        &self,
        src: &mut R,
        position: u64,
        delim: &[u8],
    ) -> io::Result<Vec<u8>> {
        let mut start = self.find_backward(src, position, delim)?;
        for _ in 0..self.spec.before {
            // Each step searches strictly before the previous boundary;
            // context clips at file start without error.
            let Some(bound) = start else { break };
            start = self.find_backward(src, bound.saturating_sub(1), delim)?;
        }
        let content_start = match start {
            Some(i) => i + delim.len() as u64,
            None => 0,
        };

        let file_end = src.seek(SeekFrom::End(0))?;
        let mut end = self.find_forward(src, position, delim)?;
        for _ in 0..self.spec.after {
            let Some(bound) = end else { break };
            match self.find_forward(src, bound + 1, delim)? {
                Some(next) => end = Some(next),
                None => {
                    // Fewer than `after` lines remain: clip at the last
                    // found boundary. Strict mode takes any trailing
                    // unterminated content through end-of-file.
                    if self.spec.strict && bound + (delim.len() as u64) < file_end {
                        end = None;
                    }
                    break;
                }
            }
        }
        let content_end = match end {
            Some(i) => i,
            // No delimiter before end-of-file: historically the unit
            // collapses to empty. Strict mode treats EOF as the terminator.
            None if self.spec.strict => file_end,
            None => 0,
        };

        if content_end <= content_start {
            return Ok(Vec::new());
        }
        read_window(src, content_start, content_end - content_start)
    }

    /// Extract the aligned block containing `position` plus context blocks.
    /// The returned region always starts at a multiple of the block size.
    pub fn extract_block<R: Read + Seek>(
        &self,
        src: &mut R,
        position: u64,
    ) -> Result<Vec<u8>, ScanError> {
        let bs = self.spec.size;
        let aligned = (position / bs) * bs;
        let region_start =
            aligned
                .checked_sub(self.spec.before * bs)
                .ok_or(ScanError::BeforeStart {
                    offset: position,
                    before: self.spec.before,
                })?;
        let region_len = bs * (1 + self.spec.before + self.spec.after);
        read_window(src, region_start, region_len).map_err(|source| ScanError::Io {
            offset: position,
            source,
        })
    }

    /// Extract one unit at `position` according to the spec's mode
    pub fn extract<R: Read + Seek>(&self, src: &mut R, position: u64) -> Result<Unit, ScanError> {
        let (kind, bytes) = match self.spec.mode {
            Mode::Line(sep) => (
                UnitKind::Line,
                self.extract_line(src, position, sep.as_bytes())?,
            ),
            Mode::Block => (UnitKind::Block, self.extract_block(src, position)?),
        };
        Ok(Unit {
            offset: position,
            kind,
            bytes,
        })
    }
}
