//! Raw channel record decoding.
//!
//! The instrumentation layer reserves one record per event with the layout below
//! (native endianness, C struct alignment):
//!
//! | Offset | Size | Field                                   |
//! |--------|------|-----------------------------------------|
//! | 0      | 8    | page handle or eviction count           |
//! | 8      | 4    | kind tag (0..=4)                        |
//! | 12     | 4    | uid                                     |
//! | 16     | 4    | pid                                     |
//! | 20     | 16   | command name, not necessarily NUL-free  |
//! | 36     | 4    | alignment padding                       |

use super::{Event, EventKind};
use crate::common::{COMMAND_LEN, Command, SimError, SimResult, TaskIdentity};

const VALUE_OFFSET: usize = 0;
const KIND_OFFSET: usize = 8;
const UID_OFFSET: usize = 12;
const PID_OFFSET: usize = 16;
const COMMAND_OFFSET: usize = 20;

/// Minimum number of bytes a record must carry to be decodable.
pub const HEADER_LEN: usize = COMMAND_OFFSET + COMMAND_LEN;

/// Size of one record reservation, including trailing padding to 8-byte alignment.
pub const RECORD_SIZE: usize = HEADER_LEN.next_multiple_of(8);

fn read_u32(raw: &[u8], offset: usize) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&raw[offset..offset + 4]);
    u32::from_ne_bytes(buf)
}

fn read_u64(raw: &[u8], offset: usize) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&raw[offset..offset + 8]);
    u64::from_ne_bytes(buf)
}

/// Decodes one raw record into an [`Event`].
///
/// Bytes past [`HEADER_LEN`] are ignored. The command name is copied as exactly
/// 16 bytes, embedded NULs included.
///
/// # Errors
///
/// Returns [`SimError::MalformedRecord`] if the record is shorter than
/// [`HEADER_LEN`] or its kind tag is out of range.
pub fn decode(raw: &[u8]) -> SimResult<Event> {
    if raw.len() < HEADER_LEN {
        return Err(SimError::malformed(format!(
            "record is {} bytes, header needs {HEADER_LEN}",
            raw.len()
        )));
    }

    let tag = read_u32(raw, KIND_OFFSET);
    let kind = EventKind::from_tag(tag)
        .ok_or_else(|| SimError::malformed(format!("unknown event kind tag {tag}")))?;

    let mut command = [0u8; COMMAND_LEN];
    command.copy_from_slice(&raw[COMMAND_OFFSET..HEADER_LEN]);

    let subject = TaskIdentity::new(
        read_u32(raw, UID_OFFSET),
        read_u32(raw, PID_OFFSET),
        Command::from_raw(command),
    );
    Ok(Event::new(kind, subject, read_u64(raw, VALUE_OFFSET)))
}

/// Encodes an event into the raw record layout, padding included.
///
/// This is the inverse of [`decode`]; it is what a channel producer writes.
pub fn encode(event: &Event) -> [u8; RECORD_SIZE] {
    let mut raw = [0u8; RECORD_SIZE];
    raw[VALUE_OFFSET..VALUE_OFFSET + 8].copy_from_slice(&event.value.to_ne_bytes());
    raw[KIND_OFFSET..KIND_OFFSET + 4].copy_from_slice(&event.kind.tag().to_ne_bytes());
    raw[UID_OFFSET..UID_OFFSET + 4].copy_from_slice(&event.subject.uid.to_ne_bytes());
    raw[PID_OFFSET..PID_OFFSET + 4].copy_from_slice(&event.subject.pid.to_ne_bytes());
    raw[COMMAND_OFFSET..HEADER_LEN].copy_from_slice(event.subject.command.as_bytes());
    raw
}
