//! Persisted event log.
//!
//! Events are persisted as text, one per line:
//!
//! ```text
//! page_or_count,kind,uid,pid,command
//! ```
//!
//! The command bytes are written verbatim up to the first NUL and are read back
//! as the remainder of the line, so a command containing commas or non-UTF-8
//! bytes survives a round trip. Lines that
//! do not parse are reported as [`SimError::MalformedRecord`] and reading continues
//! with the next line.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use super::{Event, EventKind};
use crate::common::{COMMAND_LEN, Command, SimError, SimResult, TaskIdentity};

/// Appends events to a persisted log.
#[derive(Debug)]
pub struct LogWriter<W: Write> {
    inner: W,
    written: u64,
}

impl<W: Write> LogWriter<W> {
    /// Wraps a writer. Callers should hand in a buffered writer.
    pub const fn new(inner: W) -> Self {
        Self { inner, written: 0 }
    }

    /// Appends one event line.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::LogWrite`] if the underlying writer fails.
    pub fn append(&mut self, event: &Event) -> SimResult<()> {
        let s = &event.subject;
        write!(
            self.inner,
            "{},{},{},{},",
            event.value,
            event.kind.tag(),
            s.uid,
            s.pid
        )
        .and_then(|()| self.inner.write_all(s.command.name_bytes()))
        .and_then(|()| self.inner.write_all(b"\n"))
        .map_err(SimError::LogWrite)?;
        self.written += 1;
        Ok(())
    }

    /// Number of events appended so far.
    pub const fn written(&self) -> u64 {
        self.written
    }

    /// Flushes buffered lines.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::LogWrite`] if flushing fails.
    pub fn flush(&mut self) -> SimResult<()> {
        self.inner.flush().map_err(SimError::LogWrite)
    }

    /// Flushes and returns the wrapped writer.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::LogWrite`] if flushing fails.
    pub fn into_inner(mut self) -> SimResult<W> {
        self.flush()?;
        Ok(self.inner)
    }
}

/// Reads events back from a persisted log.
///
/// Iterates over `SimResult<Event>`: malformed lines yield an error item and the
/// iterator moves on; an I/O failure yields [`SimError::LogUnreadable`] and ends
/// iteration.
#[derive(Debug)]
pub struct LogReader<R: BufRead> {
    inner: R,
    origin: PathBuf,
    line_no: u64,
    buf: Vec<u8>,
    done: bool,
}

impl LogReader<BufReader<File>> {
    /// Opens a log file for replay.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::LogUnreadable`] if the file cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> SimResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| SimError::LogUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::with_origin(BufReader::new(file), path))
    }
}

impl<R: BufRead> LogReader<R> {
    /// Reads from an already opened stream.
    pub fn new(inner: R) -> Self {
        Self::with_origin(inner, Path::new("<stream>"))
    }

    fn with_origin(inner: R, origin: &Path) -> Self {
        Self {
            inner,
            origin: origin.to_path_buf(),
            line_no: 0,
            buf: Vec::with_capacity(64),
            done: false,
        }
    }

    /// Line number of the most recently read line (1-based).
    pub const fn line_no(&self) -> u64 {
        self.line_no
    }

    fn read_line(&mut self) -> io::Result<bool> {
        self.buf.clear();
        let n = self.inner.read_until(b'\n', &mut self.buf)?;
        if n == 0 {
            return Ok(false);
        }
        self.line_no += 1;
        while matches!(self.buf.last(), Some(b'\n' | b'\r')) {
            let _ = self.buf.pop();
        }
        Ok(true)
    }
}

impl<R: BufRead> Iterator for LogReader<R> {
    type Item = SimResult<Event>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            match self.read_line() {
                Ok(false) => self.done = true,
                Ok(true) if self.buf.is_empty() => {}
                Ok(true) => {
                    return Some(parse_line(&self.buf).map_err(|e| match e {
                        SimError::MalformedRecord { reason } => {
                            SimError::malformed(format!("line {}: {reason}", self.line_no))
                        }
                        other => other,
                    }));
                }
                Err(source) => {
                    self.done = true;
                    return Some(Err(SimError::LogUnreadable {
                        path: self.origin.clone(),
                        source,
                    }));
                }
            }
        }
        None
    }
}

fn parse_field<T: std::str::FromStr>(field: Option<&[u8]>, name: &str) -> SimResult<T> {
    let field = field.ok_or_else(|| SimError::malformed(format!("missing {name} field")))?;
    std::str::from_utf8(field)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .ok_or_else(|| {
            SimError::malformed(format!(
                "bad {name} field '{}'",
                String::from_utf8_lossy(field)
            ))
        })
}

/// Parses one log line (without its terminator).
///
/// # Errors
///
/// Returns [`SimError::MalformedRecord`] if a numeric field is missing or invalid
/// or the kind tag is out of range.
pub fn parse_line(line: &[u8]) -> SimResult<Event> {
    let mut fields = line.splitn(5, |&b| b == b',');
    let value: u64 = parse_field(fields.next(), "value")?;
    let tag: u32 = parse_field(fields.next(), "kind")?;
    let uid: u32 = parse_field(fields.next(), "uid")?;
    let pid: u32 = parse_field(fields.next(), "pid")?;
    let name = fields
        .next()
        .ok_or_else(|| SimError::malformed("missing command field"))?;

    let kind = EventKind::from_tag(tag)
        .ok_or_else(|| SimError::malformed(format!("unknown event kind tag {tag}")))?;

    let mut command = [0u8; COMMAND_LEN];
    let len = name.len().min(COMMAND_LEN);
    command[..len].copy_from_slice(&name[..len]);

    Ok(Event::new(
        kind,
        TaskIdentity::new(uid, pid, Command::from_raw(command)),
        value,
    ))
}
