//! Event sources and the drain loop.
//!
//! This module is the user-space end of the event channel. It provides:
//! 1. **Record framing:** [`RecordStream`] cuts a byte stream into fixed-size records.
//! 2. **Bounded channel:** [`ChannelSource`] moves records from a reader thread to the
//!    consumer through a bounded queue and supports polling with a timeout.
//! 3. **Draining:** [`drain`] polls until the source closes or a stop flag is raised,
//!    decoding each record and skipping malformed ones.
//!
//! Arrival order is the only ordering relied on. Records from different CPUs may be
//! interleaved arbitrarily by the producer; they are processed as they arrive.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::thread;
use std::time::Duration;

use tracing::{info, warn};

use crate::common::{SimError, SimResult};
use crate::event::Event;
use crate::event::decode::decode;

/// Result of one poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Poll {
    /// This many raw records were handed to the sink.
    Ready(usize),
    /// Nothing arrived within the timeout.
    Timeout,
    /// The producer is gone and every record has been consumed.
    Closed,
}

/// A producer of raw event records.
pub trait EventSource {
    /// Waits at most `timeout` for records and hands each one to `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::ChannelRead`] if the underlying channel fails, or
    /// [`SimError::ChannelUnavailable`] if it could not be opened.
    fn poll(&mut self, timeout: Duration, sink: &mut dyn FnMut(&[u8])) -> SimResult<Poll>;
}

/// Splits a byte stream into fixed-size records.
#[derive(Debug)]
pub struct RecordStream<R: Read> {
    inner: R,
    record_size: usize,
    finished: bool,
}

impl<R: Read> RecordStream<R> {
    /// Wraps a reader producing records of `record_size` bytes.
    pub const fn new(inner: R, record_size: usize) -> Self {
        Self {
            inner,
            record_size,
            finished: false,
        }
    }

    /// Reads the next record.
    ///
    /// A truncated record at the end of the stream is returned as-is (shorter than
    /// `record_size`) so the decoder can report it; after that `None` is returned.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error, other than interruption.
    pub fn next_record(&mut self) -> io::Result<Option<Vec<u8>>> {
        if self.finished {
            return Ok(None);
        }
        let mut buf = vec![0u8; self.record_size];
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
        if filled < buf.len() {
            self.finished = true;
            if filled == 0 {
                return Ok(None);
            }
            buf.truncate(filled);
        }
        Ok(Some(buf))
    }
}

impl<R: Read> EventSource for RecordStream<R> {
    /// Reads one record per poll; the timeout is irrelevant for a plain stream.
    fn poll(&mut self, _timeout: Duration, sink: &mut dyn FnMut(&[u8])) -> SimResult<Poll> {
        match self.next_record().map_err(SimError::ChannelRead)? {
            Some(raw) => {
                sink(&raw);
                Ok(Poll::Ready(1))
            }
            None => Ok(Poll::Closed),
        }
    }
}

/// Bounded channel fed by a reader thread.
///
/// The reader thread opens and then blocks on the underlying stream (typically a
/// FIFO exported by the instrumentation loader) and pushes records into a queue of
/// `capacity` entries; a full queue applies back-pressure to the reader. Opening a
/// FIFO blocks until a producer attaches, so it happens on the reader thread too and
/// the consumer keeps polling, and checking its stop flag, in the meantime.
#[derive(Debug)]
pub struct ChannelSource {
    rx: Receiver<SimResult<Vec<u8>>>,
}

impl ChannelSource {
    /// Default number of records buffered between the reader thread and the consumer.
    pub const DEFAULT_CAPACITY: usize = 4096;

    /// Starts a reader thread that opens the channel at `path`.
    ///
    /// The open itself happens on the reader thread; an open failure is delivered
    /// by the first [`EventSource::poll`] as [`SimError::ChannelUnavailable`].
    ///
    /// # Errors
    ///
    /// Returns [`SimError::ChannelUnavailable`] if the reader thread cannot be started.
    pub fn open(path: impl AsRef<Path>, record_size: usize) -> SimResult<Self> {
        let path = path.as_ref().to_path_buf();
        let target = path.clone();
        let opener = move || {
            File::open(&target).map_err(|source| SimError::ChannelUnavailable {
                path: target,
                source,
            })
        };
        Self::with_opener(opener, record_size, Self::DEFAULT_CAPACITY)
            .map_err(|source| SimError::ChannelUnavailable { path, source })
    }

    /// Starts a reader thread over an already opened byte stream.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the thread cannot be spawned.
    pub fn spawn<R: Read + Send + 'static>(
        reader: R,
        record_size: usize,
        capacity: usize,
    ) -> io::Result<Self> {
        Self::with_opener(move || Ok(reader), record_size, capacity)
    }

    /// Starts a reader thread that first calls `opener` to obtain its stream.
    ///
    /// An error from `opener` is queued as the only item; the channel then closes.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the thread cannot be spawned.
    pub fn with_opener<R, F>(opener: F, record_size: usize, capacity: usize) -> io::Result<Self>
    where
        R: Read + 'static,
        F: FnOnce() -> SimResult<R> + Send + 'static,
    {
        let (tx, rx) = mpsc::sync_channel(capacity.max(1));
        let _handle = thread::Builder::new()
            .name("pagesim-channel".into())
            .spawn(move || {
                let reader = match opener() {
                    Ok(reader) => reader,
                    Err(e) => {
                        let _ = tx.send(Err(e));
                        return;
                    }
                };
                let mut stream = RecordStream::new(reader, record_size);
                loop {
                    let item = match stream.next_record() {
                        Ok(Some(raw)) => Ok(raw),
                        Ok(None) => break,
                        Err(e) => Err(SimError::ChannelRead(e)),
                    };
                    let failed = item.is_err();
                    if tx.send(item).is_err() || failed {
                        break;
                    }
                }
            })?;
        Ok(Self { rx })
    }

    fn deliver(item: SimResult<Vec<u8>>, sink: &mut dyn FnMut(&[u8])) -> SimResult<()> {
        let raw = item?;
        sink(&raw);
        Ok(())
    }
}

impl EventSource for ChannelSource {
    /// Blocks for the first record up to `timeout`, then drains whatever else is
    /// already queued without blocking.
    fn poll(&mut self, timeout: Duration, sink: &mut dyn FnMut(&[u8])) -> SimResult<Poll> {
        let first = match self.rx.recv_timeout(timeout) {
            Ok(item) => item,
            Err(RecvTimeoutError::Timeout) => return Ok(Poll::Timeout),
            Err(RecvTimeoutError::Disconnected) => return Ok(Poll::Closed),
        };
        Self::deliver(first, sink)?;
        let mut count = 1;
        loop {
            match self.rx.try_recv() {
                Ok(item) => {
                    Self::deliver(item, sink)?;
                    count += 1;
                }
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        Ok(Poll::Ready(count))
    }
}

/// Totals of one drain run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainStats {
    /// Records decoded and handed to the handler.
    pub records: u64,
    /// Records skipped because they failed to decode.
    pub malformed: u64,
    /// Polls that timed out with nothing to read.
    pub idle_polls: u64,
}

/// Polls `source` until it closes or `stop` is raised.
///
/// The stop flag is checked between polls only, so every record of the current
/// poll is fully handled before the loop exits. Malformed records are logged and
/// skipped.
///
/// # Errors
///
/// Propagates channel read failures from the source.
pub fn drain<S, F>(
    source: &mut S,
    stop: &AtomicBool,
    timeout: Duration,
    mut handler: F,
) -> SimResult<DrainStats>
where
    S: EventSource + ?Sized,
    F: FnMut(&Event),
{
    let mut stats = DrainStats::default();
    while !stop.load(Ordering::Relaxed) {
        let poll = source.poll(timeout, &mut |raw: &[u8]| match decode(raw) {
            Ok(event) => {
                stats.records += 1;
                handler(&event);
            }
            Err(e) => {
                stats.malformed += 1;
                warn!(error = %e, "skipping record");
            }
        })?;
        match poll {
            Poll::Ready(_) => {}
            Poll::Timeout => stats.idle_polls += 1,
            Poll::Closed => break,
        }
    }
    info!(
        records = stats.records,
        malformed = stats.malformed,
        "drain finished"
    );
    Ok(stats)
}
