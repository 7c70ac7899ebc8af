// ---------------------------------------------------------------------------
// SaveError: typed errors for every persistence operation
// ---------------------------------------------------------------------------

use std::fmt;

use crate::record_io::RecordKind;

/// Errors that can occur while reading or writing world state.
///
/// None of these are fatal to the coordinator: they are logged, reported in
/// the operation outcome, and the state machine still returns to idle.
#[derive(Debug)]
pub enum SaveError {
    /// I/O error (missing directory, permission denied, disk full, etc.)
    Io(std::io::Error),
    /// Bitcode decoding failed (corrupt or truncated payload).
    Decode(String),
    /// The file envelope is damaged or from an unsupported header format.
    Header(String),
    /// The file holds a different record than the one asked for, e.g. a
    /// player file copied over a level file.
    WrongRecord { expected: RecordKind, found: u32 },
    /// The record schema is newer than this build understands.
    VersionMismatch {
        kind: RecordKind,
        expected_max: u32,
        found: u32,
    },
    /// The core record holds the "no save" sentinel.
    NoSavedGame,
    /// An operation needed the current context but none is loaded.
    NoActiveContext,
    /// Another operation is still in flight.
    Busy { in_flight: &'static str },
}

impl SaveError {
    /// True when the underlying cause is simply a file that does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, SaveError::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}

impl fmt::Display for SaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveError::Io(e) => write!(f, "I/O error: {e}"),
            SaveError::Decode(msg) => write!(f, "Decoding error: {msg}"),
            SaveError::Header(msg) => write!(f, "Invalid file header: {msg}"),
            SaveError::WrongRecord { expected, found } => write!(
                f,
                "Wrong record: expected a {} file, found record kind {found}",
                expected.label()
            ),
            SaveError::VersionMismatch {
                kind,
                expected_max,
                found,
            } => write!(
                f,
                "Version mismatch: {} file is v{found}, but this build only supports up to v{expected_max}",
                kind.label()
            ),
            SaveError::NoSavedGame => write!(f, "No saved game exists"),
            SaveError::NoActiveContext => write!(f, "No context is currently loaded"),
            SaveError::Busy { in_flight } => {
                write!(f, "Another operation is in flight ({in_flight})")
            }
        }
    }
}

impl std::error::Error for SaveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SaveError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SaveError {
    fn from(e: std::io::Error) -> Self {
        SaveError::Io(e)
    }
}

impl From<bitcode::Error> for SaveError {
    fn from(e: bitcode::Error) -> Self {
        SaveError::Decode(e.to_string())
    }
}
