//! Persisted Log Tests.
//!
//! Writer line format, reader recovery from malformed lines, and file handling.

use std::io::{BufWriter, Cursor, Write};

use pagesim_core::SimError;
use pagesim_core::common::{COMMAND_LEN, Command, TaskIdentity};
use pagesim_core::event::log::{LogReader, LogWriter, parse_line};
use pagesim_core::event::{Event, EventKind};
use pretty_assertions::assert_eq;

use crate::common::builder::{access, added, evict, task};

fn write_all(events: &[Event]) -> String {
    let mut writer = LogWriter::new(Vec::new());
    for event in events {
        writer.append(event).expect("append");
    }
    assert_eq!(writer.written(), events.len() as u64);
    String::from_utf8(writer.into_inner().expect("flush")).expect("utf8")
}

#[test]
fn writer_emits_one_line_per_event() {
    let text = write_all(&[access(10, task(5, "cat")), evict(4)]);
    assert_eq!(text, "10,0,1000,5,cat\n4,4,1000,0,kswapd0\n");
}

#[test]
fn reader_returns_events_in_order() {
    let events = vec![access(10, task(5, "cat")), added(11, task(6, "ls")), evict(2)];
    let text = write_all(&events);

    let read: Vec<Event> = LogReader::new(Cursor::new(text))
        .collect::<Result<_, _>>()
        .expect("read");
    assert_eq!(read, events);
}

#[test]
fn command_with_commas_survives() {
    let event = access(1, task(9, "a,b,c"));
    let text = write_all(&[event]);
    let read = parse_line(text.trim_end().as_bytes()).expect("parse");
    assert_eq!(read.command().display_name(), "a,b,c");
}

#[test]
fn non_utf8_command_bytes_are_written_verbatim() {
    let mut raw = [0u8; COMMAND_LEN];
    raw[..4].copy_from_slice(&[b'a', 0xff, 0xfe, b'z']);
    raw[5..8].copy_from_slice(b"old");
    let event = Event::page(
        EventKind::AccessHit,
        3,
        TaskIdentity::new(0, 1, Command::from_raw(raw)),
    );

    let mut writer = LogWriter::new(Vec::new());
    writer.append(&event).expect("append");
    let bytes = writer.into_inner().expect("flush");
    assert_eq!(bytes, b"3,0,0,1,a\xff\xfez\n".to_vec());

    let read = parse_line(&bytes[..bytes.len() - 1]).expect("parse");
    assert_eq!(read.command().name_bytes(), &[b'a', 0xff, 0xfe, b'z']);
    let mut kept = [0u8; COMMAND_LEN];
    kept[..4].copy_from_slice(&raw[..4]);
    assert_eq!(read.command(), &Command::from_raw(kept));
}

#[test]
fn long_command_is_truncated_on_read() {
    let read = parse_line(b"1,0,0,0,abcdefghijklmnopqrstuvwxyz").expect("parse");
    assert_eq!(read.command(), &Command::from_name("abcdefghijklmnop"));
}

#[test]
fn empty_command_is_allowed() {
    let read = parse_line(b"1,1,0,0,").expect("parse");
    assert_eq!(read.kind, EventKind::CacheMiss);
    assert_eq!(read.command().display_name(), "");
}

#[test]
fn malformed_lines_are_reported_and_skipped() {
    let text = "1,0,0,0,ok\nnot a record\n2,9,0,0,badtag\n\n3,0,0,0,ok\n1,2,3\n";
    let items: Vec<_> = LogReader::new(Cursor::new(text)).collect();
    assert_eq!(items.len(), 5);

    let good: Vec<u64> = items
        .iter()
        .filter_map(|r| r.as_ref().ok())
        .map(|e| e.value)
        .collect();
    assert_eq!(good, vec![1, 3]);

    let errors: Vec<String> = items
        .iter()
        .filter_map(|r| r.as_ref().err())
        .map(|e| {
            assert!(e.is_recoverable());
            e.to_string()
        })
        .collect();
    assert!(errors[0].contains("line 2"), "{}", errors[0]);
    assert!(errors[1].contains("line 3"), "{}", errors[1]);
    assert!(errors[2].contains("line 6"), "{}", errors[2]);
}

#[test]
fn crlf_terminators_are_accepted() {
    let read: Vec<Event> = LogReader::new(Cursor::new("5,0,1,2,x\r\n"))
        .collect::<Result<_, _>>()
        .expect("read");
    assert_eq!(read.len(), 1);
    assert_eq!(read[0].command().display_name(), "x");
}

#[test]
fn file_round_trip() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("page.log");
    {
        let file = std::fs::File::create(&path).expect("create");
        let mut writer = LogWriter::new(BufWriter::new(file));
        writer.append(&access(42, task(1, "init"))).expect("append");
        writer.flush().expect("flush");
    }

    let mut reader = LogReader::open(&path).expect("open");
    let event = reader.next().expect("one line").expect("valid");
    assert_eq!(event.value, 42);
    assert_eq!(reader.line_no(), 1);
    assert!(reader.next().is_none());
}

#[test]
fn open_missing_log_is_unreadable() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = LogReader::open(dir.path().join("nope.log")).expect_err("missing");
    assert!(matches!(err, SimError::LogUnreadable { .. }));
    assert!(!err.is_recoverable());
}

#[test]
fn write_failure_is_reported() {
    struct Broken;
    impl Write for Broken {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("broken pipe"))
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    let mut writer = LogWriter::new(Broken);
    let err = writer.append(&evict(1)).expect_err("broken");
    assert!(matches!(err, SimError::LogWrite(_)));
    assert_eq!(writer.written(), 0);
}
