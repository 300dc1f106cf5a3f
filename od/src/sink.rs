//! Output routing for extracted units
//!
//! Either a single concatenated byte stream (stdout) or one file per unit in
//! a target directory. The directory must not pre-exist; it is validated at
//! sink construction, before any extraction begins, and created lazily on
//! the first write.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use log::debug;
use thiserror::Error;

use crate::spec::{OffsetBase, Unit};

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("output directory already exists: {0}")]
    DirExists(PathBuf),

    #[error("failed to write unit for offset {offset:#x}: {source}")]
    Write {
        offset: u64,
        #[source]
        source: io::Error,
    },

    #[error("output stream error: {0}")]
    Io(#[from] io::Error),
}

pub enum OutputSink {
    /// Concatenated raw bytes, no separators
    Stream(Box<dyn Write>),
    /// One file per unit, named `line_<offset>.txt` / `block_<offset>.bin`
    Directory {
        dir: PathBuf,
        base: OffsetBase,
        created: bool,
    },
}

impl OutputSink {
    pub fn stdout() -> Self {
        OutputSink::Stream(Box::new(io::stdout()))
    }

    pub fn stream(writer: impl Write + 'static) -> Self {
        OutputSink::Stream(Box::new(writer))
    }

    /// Per-offset file output. Fails when the directory already exists.
    pub fn directory(dir: PathBuf, base: OffsetBase) -> Result<Self, SinkError> {
        if dir.exists() {
            return Err(SinkError::DirExists(dir));
        }
        Ok(OutputSink::Directory {
            dir,
            base,
            created: false,
        })
    }

    pub fn write(&mut self, unit: &Unit) -> Result<(), SinkError> {
        match self {
            OutputSink::Stream(writer) => {
                writer.write_all(&unit.bytes).map_err(|source| SinkError::Write {
                    offset: unit.offset,
                    source,
                })
            }
            OutputSink::Directory { dir, base, created } => {
                if !*created {
                    fs::create_dir_all(&*dir).map_err(|source| SinkError::Write {
                        offset: unit.offset,
                        source,
                    })?;
                    *created = true;
                }
                let path = dir.join(unit.file_name(*base));
                debug!("writing {} bytes to {}", unit.bytes.len(), path.display());
                fs::write(&path, &unit.bytes).map_err(|source| SinkError::Write {
                    offset: unit.offset,
                    source,
                })
            }
        }
    }

    pub fn flush(&mut self) -> Result<(), SinkError> {
        if let OutputSink::Stream(writer) = self {
            writer.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::UnitKind;
    use tempfile::TempDir;

    fn unit(offset: u64, kind: UnitKind, bytes: &[u8]) -> Unit {
        Unit {
            offset,
            kind,
            bytes: bytes.to_vec(),
        }
    }

    #[test]
    fn test_existing_directory_is_rejected() {
        let temp = TempDir::new().unwrap();
        let Err(err) = OutputSink::directory(temp.path().to_path_buf(), OffsetBase::Hex) else {
            panic!("expected existing directory to be rejected");
        };
        assert!(matches!(err, SinkError::DirExists(_)));
    }

    #[test]
    fn test_directory_created_lazily_with_named_files() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("out");

        let mut sink = OutputSink::directory(dir.clone(), OffsetBase::Hex).unwrap();
        assert!(!dir.exists());

        sink.write(&unit(0x14e, UnitKind::Line, b"yes")).unwrap();
        sink.write(&unit(122, UnitKind::Block, b"\x00\x01")).unwrap();

        assert_eq!(fs::read(dir.join("line_0x14e.txt")).unwrap(), b"yes");
        assert_eq!(fs::read(dir.join("block_0x7a.bin")).unwrap(), b"\x00\x01");
    }

    #[test]
    fn test_decimal_file_names() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("out");

        let mut sink = OutputSink::directory(dir.clone(), OffsetBase::Dec).unwrap();
        sink.write(&unit(122, UnitKind::Block, b"x")).unwrap();

        assert!(dir.join("block_122.bin").exists());
    }

    #[test]
    fn test_stream_concatenates_without_separators() {
        use std::cell::RefCell;
        use std::rc::Rc;

        #[derive(Clone)]
        struct SharedBuf(Rc<RefCell<Vec<u8>>>);

        impl Write for SharedBuf {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                self.0.borrow_mut().extend_from_slice(buf);
                Ok(buf.len())
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let buf = SharedBuf(Rc::new(RefCell::new(Vec::new())));
        let mut sink = OutputSink::stream(buf.clone());
        sink.write(&unit(0, UnitKind::Line, b"ab")).unwrap();
        sink.write(&unit(9, UnitKind::Line, b"cd")).unwrap();
        sink.flush().unwrap();

        assert_eq!(*buf.0.borrow(), b"abcd");
    }
}
