//! Offset parsing from matcher output
//!
//! Matcher tools freely intermix match lines and other text, so lines that
//! do not carry a leading offset are skipped silently. Matching lines are
//! collected into an ascending, duplicate-free sequence.

use std::collections::BTreeSet;
use std::io::BufRead;
use std::sync::LazyLock;

use log::{debug, warn};
use regex::Regex;
use thiserror::Error;

use crate::spec::OffsetBase;

#[derive(Debug, Error)]
pub enum OffsetError {
    #[error("no line of the offset input could be decoded as UTF-8")]
    Undecodable,

    #[error("failed to read offset input: {0}")]
    Io(#[from] std::io::Error),
}

/// Textual shape of the matcher report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffsetFormat {
    /// YARA-style: `0x14e:$rule: match` — hex offsets with a `0x` prefix
    HexPrefixed,
    /// strings-style: `    122 match` — leading digits followed by a space
    LeadingNumeric(OffsetBase),
}

static HEX_PREFIXED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^0x([0-9a-f]+)").expect("valid regex"));
static LEADING_NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ *([0-9a-f]+) ").expect("valid regex"));

/// Parse matcher output into a sorted, deduplicated sequence of byte offsets.
///
/// Undecodable lines are skipped with a warning; only total decode failure
/// of a non-empty input is an error.
pub fn parse_offsets<R: BufRead>(mut input: R, format: OffsetFormat) -> Result<Vec<u64>, OffsetError> {
    let (regex, radix): (&Regex, u32) = match format {
        OffsetFormat::HexPrefixed => (&HEX_PREFIXED, 16),
        OffsetFormat::LeadingNumeric(OffsetBase::Hex) => (&LEADING_NUMERIC, 16),
        OffsetFormat::LeadingNumeric(OffsetBase::Dec) => (&LEADING_NUMERIC, 10),
    };

    let mut offsets = BTreeSet::new();
    let mut total = 0usize;
    let mut undecodable = 0usize;
    let mut raw = Vec::new();
    loop {
        raw.clear();
        if input.read_until(b'\n', &mut raw)? == 0 {
            break;
        }
        total += 1;
        let line = match std::str::from_utf8(&raw) {
            Ok(line) => line,
            Err(_) => {
                undecodable += 1;
                warn!("skipping undecodable offset line {}", total);
                continue;
            }
        };
        let Some(captures) = regex.captures(line) else {
            continue;
        };
        match u64::from_str_radix(&captures[1], radix) {
            Ok(offset) => {
                offsets.insert(offset);
            }
            Err(err) => warn!("skipping offset line {}: {}", total, err),
        }
    }

    if total > 0 && undecodable == total {
        return Err(OffsetError::Undecodable);
    }
    debug!("parsed {} unique offsets from {} lines", offsets.len(), total);
    Ok(offsets.into_iter().collect())
}
