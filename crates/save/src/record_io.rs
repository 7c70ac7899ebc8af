// ---------------------------------------------------------------------------
// record_io – Typed encode/decode of one record file
// ---------------------------------------------------------------------------

use std::path::Path;

use bitcode::{DecodeOwned, Encode};

use crate::atomic_write::atomic_write;
use crate::file_header::{decompress_payload, unwrap_header, wrap_with_header};
use crate::save_error::SaveError;

/// What a `.dat` file holds. Stored in the header so a file copied to the
/// wrong name is rejected instead of misread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum RecordKind {
    Core = 1,
    Player = 2,
    Inventory = 3,
    Level = 4,
    Options = 5,
}

impl RecordKind {
    pub fn code(self) -> u32 {
        self as u32
    }

    pub fn label(self) -> &'static str {
        match self {
            RecordKind::Core => "core",
            RecordKind::Player => "player",
            RecordKind::Inventory => "inventory",
            RecordKind::Level => "level",
            RecordKind::Options => "options",
        }
    }
}

/// A top-level value that owns a file of its own.
pub trait SaveRecord: Encode + DecodeOwned {
    const KIND: RecordKind;
    /// Bump when the field layout changes. Readers refuse anything newer.
    const SCHEMA_VERSION: u32;
}

pub fn encode_record<R: SaveRecord>(record: &R, compress: bool) -> Vec<u8> {
    let payload = bitcode::encode(record);
    wrap_with_header(&payload, R::KIND.code(), R::SCHEMA_VERSION, compress)
}

pub fn decode_record<R: SaveRecord>(bytes: &[u8]) -> Result<R, SaveError> {
    let (header, payload) = unwrap_header(bytes).map_err(SaveError::Header)?;

    if header.record_kind != R::KIND.code() {
        return Err(SaveError::WrongRecord {
            expected: R::KIND,
            found: header.record_kind,
        });
    }
    if header.schema_version > R::SCHEMA_VERSION {
        return Err(SaveError::VersionMismatch {
            kind: R::KIND,
            expected_max: R::SCHEMA_VERSION,
            found: header.schema_version,
        });
    }

    let data = decompress_payload(&header, payload).map_err(SaveError::Decode)?;
    Ok(bitcode::decode(&data)?)
}

/// Encodes `record` and atomically replaces `path` with it.
pub fn write_record<R: SaveRecord>(path: &Path, record: &R, compress: bool) -> Result<(), SaveError> {
    let bytes = encode_record(record, compress);
    atomic_write(path, &bytes)?;
    Ok(())
}

pub fn read_record<R: SaveRecord>(path: &Path) -> Result<R, SaveError> {
    let bytes = std::fs::read(path)?;
    decode_record(&bytes)
}
