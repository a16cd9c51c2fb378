//! Append-only destinations for fingerprint records.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

/// A line-oriented, append-only destination.
///
/// Implementations must write each line atomically with respect to other
/// callers: two concurrent `write_line` calls never interleave.
pub trait LogSink: Send + Sync {
    /// Append `line` followed by a newline.
    fn write_line(&self, line: &str) -> io::Result<()>;
}

/// Startup policy for an existing log file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpenMode {
    /// Keep existing records and append.
    #[default]
    Append,
    /// Discard existing records, then append.
    Truncate,
}

/// Fingerprint log backed by a file opened in append mode.
#[derive(Debug)]
pub struct FileSink {
    file: Mutex<File>,
}

impl FileSink {
    /// Open (creating if absent) the log file.
    ///
    /// With [`OpenMode::Truncate`] the file is emptied and a single blank
    /// line is written, so a reader that drops the first line of a tail
    /// never loses a real record.
    pub fn open(path: impl AsRef<Path>, mode: OpenMode) -> io::Result<Self> {
        let path = path.as_ref();
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;

        if mode == OpenMode::Truncate {
            file.set_len(0)?;
            file.write_all(b"\n")?;
        }

        tracing::info!(path = %path.display(), ?mode, "Fingerprint log opened");
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl LogSink for FileSink {
    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut buf = Vec::with_capacity(line.len() + 1);
        buf.extend_from_slice(line.as_bytes());
        buf.push(b'\n');

        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        file.write_all(&buf)?;
        file.flush()
    }
}

/// In-memory sink, mostly for tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every line written so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl LogSink for MemorySink {
    fn write_line(&self, line: &str) -> io::Result<()> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_sink_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("beacon.log");
        std::fs::write(&path, "old\n").unwrap();

        let sink = FileSink::open(&path, OpenMode::Append).unwrap();
        sink.write_line("one").unwrap();
        sink.write_line("two").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "old\none\ntwo\n");
    }

    #[test]
    fn test_file_sink_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("beacon.log");
        std::fs::write(&path, "old\n").unwrap();

        let sink = FileSink::open(&path, OpenMode::Truncate).unwrap();
        sink.write_line("fresh").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "\nfresh\n");
    }

    #[test]
    fn test_open_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("beacon.log");
        assert!(FileSink::open(&path, OpenMode::Append).is_err());
    }

    #[test]
    fn test_concurrent_lines_do_not_interleave() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("beacon.log");
        let sink = Arc::new(FileSink::open(&path, OpenMode::Append).unwrap());

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let sink = Arc::clone(&sink);
                std::thread::spawn(move || {
                    let line = format!("{}", t).repeat(512);
                    for _ in 0..50 {
                        sink.write_line(&line).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 400);
        for line in lines {
            assert_eq!(line.len(), 512);
            let first = line.as_bytes()[0];
            assert!(line.bytes().all(|b| b == first));
        }
    }
}
