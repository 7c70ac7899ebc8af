// ---------------------------------------------------------------------------
// file_header – Record envelope with magic bytes, versions, and checksum
// ---------------------------------------------------------------------------
//
// Header format (36 bytes, fixed-size, little-endian):
//   [0..4]   Magic bytes: "WSAV" (0x57534156)
//   [4..8]   Header format version (u32)
//   [8..12]  Flags (u32: bit 0 = payload is LZ4-compressed)
//   [12..16] Record kind (u32, see `RecordKind`)
//   [16..20] Record schema version (u32)
//   [20..28] Timestamp (Unix epoch, u64)
//   [28..32] Uncompressed payload size (u32)
//   [32..36] xxHash32 checksum of the stored payload (everything after the header)
//
// On write: encode record -> optionally compress -> prepend header
// On read:  check magic -> check header version -> validate checksum ->
//           strip header -> decompress if flagged -> decode record

use xxhash_rust::xxh32::xxh32;

/// Magic bytes identifying a world-state record file.
pub const MAGIC: [u8; 4] = *b"WSAV";

/// Size of the file header in bytes.
pub const HEADER_SIZE: usize = 36;

/// Layout version of the header itself. Record schemas are versioned
/// separately, per record kind.
pub const HEADER_FORMAT_VERSION: u32 = 1;

/// Payload is LZ4-compressed (size-prepended block format).
pub const FLAG_COMPRESSED: u32 = 1 << 0;

const XXHASH_SEED: u32 = 0;

/// Parsed file header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    pub format_version: u32,
    pub flags: u32,
    pub record_kind: u32,
    pub schema_version: u32,
    pub timestamp: u64,
    pub uncompressed_size: u32,
    pub checksum: u32,
}

impl FileHeader {
    pub fn is_compressed(&self) -> bool {
        self.flags & FLAG_COMPRESSED != 0
    }

    fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&MAGIC);
        out.extend_from_slice(&self.format_version.to_le_bytes());
        out.extend_from_slice(&self.flags.to_le_bytes());
        out.extend_from_slice(&self.record_kind.to_le_bytes());
        out.extend_from_slice(&self.schema_version.to_le_bytes());
        out.extend_from_slice(&self.timestamp.to_le_bytes());
        out.extend_from_slice(&self.uncompressed_size.to_le_bytes());
        out.extend_from_slice(&self.checksum.to_le_bytes());
    }
}

fn now_unix_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn le_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

fn le_u64(bytes: &[u8], at: usize) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&bytes[at..at + 8]);
    u64::from_le_bytes(buf)
}

/// Wrap an encoded record with a file header, compressing it first when
/// `compress` is set.
///
/// Returns bytes: [header (36 bytes)] ++ [stored payload].
pub fn wrap_with_header(payload: &[u8], record_kind: u32, schema_version: u32, compress: bool) -> Vec<u8> {
    let (stored, flags) = if compress {
        (lz4_flex::compress_prepend_size(payload), FLAG_COMPRESSED)
    } else {
        (payload.to_vec(), 0)
    };

    let header = FileHeader {
        format_version: HEADER_FORMAT_VERSION,
        flags,
        record_kind,
        schema_version,
        timestamp: now_unix_secs(),
        uncompressed_size: payload.len() as u32,
        checksum: xxh32(&stored, XXHASH_SEED),
    };

    let mut out = Vec::with_capacity(HEADER_SIZE + stored.len());
    header.write_to(&mut out);
    out.extend_from_slice(&stored);
    out
}

/// Parse and validate the header, returning it with the stored payload.
///
/// # Errors
///
/// Returns an error if:
/// - The magic bytes are missing (not a record file)
/// - The file is shorter than a header
/// - The header format version is from a newer build
/// - The checksum does not match (data corruption)
pub fn unwrap_header(bytes: &[u8]) -> Result<(FileHeader, &[u8]), String> {
    if bytes.len() < 4 || bytes[..4] != MAGIC {
        return Err("not a world-state record (missing WSAV magic bytes)".to_string());
    }

    if bytes.len() < HEADER_SIZE {
        return Err(format!(
            "file has WSAV magic bytes but is too short ({} bytes, \
             need at least {} for header)",
            bytes.len(),
            HEADER_SIZE
        ));
    }

    let header = FileHeader {
        format_version: le_u32(bytes, 4),
        flags: le_u32(bytes, 8),
        record_kind: le_u32(bytes, 12),
        schema_version: le_u32(bytes, 16),
        timestamp: le_u64(bytes, 20),
        uncompressed_size: le_u32(bytes, 28),
        checksum: le_u32(bytes, 32),
    };

    if header.format_version > HEADER_FORMAT_VERSION {
        return Err(format!(
            "file uses header format version {}, but this build only supports \
             up to version {}",
            header.format_version, HEADER_FORMAT_VERSION,
        ));
    }

    let payload = &bytes[HEADER_SIZE..];

    let computed = xxh32(payload, XXHASH_SEED);
    if computed != header.checksum {
        return Err(format!(
            "file is corrupted: checksum mismatch \
             (expected {:#010X}, got {:#010X})",
            header.checksum, computed,
        ));
    }

    Ok((header, payload))
}

/// Undo the compression recorded in `header`, if any.
pub fn decompress_payload(header: &FileHeader, payload: &[u8]) -> Result<Vec<u8>, String> {
    if !header.is_compressed() {
        return Ok(payload.to_vec());
    }
    let data = lz4_flex::decompress_size_prepended(payload)
        .map_err(|e| format!("LZ4 decompression failed: {e}"))?;
    if data.len() != header.uncompressed_size as usize {
        return Err(format!(
            "decompressed size {} does not match header ({})",
            data.len(),
            header.uncompressed_size
        ));
    }
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_and_unwrap_uncompressed() {
        let data = b"trigger T1 armed";
        let wrapped = wrap_with_header(data, 4, 1, false);

        assert_eq!(&wrapped[..4], &MAGIC);
        assert_eq!(wrapped.len(), HEADER_SIZE + data.len());

        let (header, payload) = unwrap_header(&wrapped).expect("unwrap should succeed");
        assert_eq!(header.format_version, HEADER_FORMAT_VERSION);
        assert_eq!(header.record_kind, 4);
        assert_eq!(header.schema_version, 1);
        assert!(!header.is_compressed());
        assert_eq!(header.uncompressed_size, data.len() as u32);
        assert_eq!(payload, data);
    }

    #[test]
    fn test_compressed_payload_restores() {
        let data: Vec<u8> = b"door D1 open ".iter().copied().cycle().take(2048).collect();
        let wrapped = wrap_with_header(&data, 4, 1, true);
        assert!(wrapped.len() < HEADER_SIZE + data.len());

        let (header, payload) = unwrap_header(&wrapped).unwrap();
        assert!(header.is_compressed());
        assert_eq!(decompress_payload(&header, payload).unwrap(), data);
    }

    #[test]
    fn test_missing_magic_rejected() {
        let err = unwrap_header(b"\x00\x01\x02\x03not a save").unwrap_err();
        assert!(err.contains("magic"), "got: {err}");
        assert!(unwrap_header(b"").is_err());
    }

    #[test]
    fn test_corrupted_checksum_detected() {
        let mut wrapped = wrap_with_header(b"player at spawn", 2, 1, false);
        let last = wrapped.len() - 1;
        wrapped[last] ^= 0xFF;

        let err = unwrap_header(&wrapped).unwrap_err();
        assert!(err.contains("corrupted"), "got: {err}");
        assert!(err.contains("checksum mismatch"), "got: {err}");
    }

    #[test]
    fn test_future_header_version_rejected() {
        let mut wrapped = wrap_with_header(b"payload", 1, 1, false);
        wrapped[4..8].copy_from_slice(&999u32.to_le_bytes());

        let err = unwrap_header(&wrapped).unwrap_err();
        assert!(err.contains("header format version 999"), "got: {err}");
    }

    #[test]
    fn test_truncated_header_detected() {
        let mut short = MAGIC.to_vec();
        short.extend_from_slice(&[0u8; 10]);

        let err = unwrap_header(&short).unwrap_err();
        assert!(err.contains("too short"), "got: {err}");
    }

    #[test]
    fn test_size_mismatch_after_decompression() {
        let data = vec![7u8; 512];
        let wrapped = wrap_with_header(&data, 4, 1, true);
        let (mut header, payload) = unwrap_header(&wrapped).unwrap();
        header.uncompressed_size = 100;

        let err = decompress_payload(&header, payload).unwrap_err();
        assert!(err.contains("does not match"), "got: {err}");
    }
}
