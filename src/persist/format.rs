//! Chunk encoding helpers shared by the snapshot reader and writer.

use std::io::{self, Read, Write};

use crate::error::{KvError, Result};

use super::CHUNK_LEN_SIZE;

/// Length prefix for a chunk, or `ChunkTooLarge`
pub(crate) fn chunk_len(bytes: &[u8]) -> Result<u32> {
    u32::try_from(bytes.len()).map_err(|_| KvError::ChunkTooLarge { len: bytes.len() })
}

/// Write `[len (4)][bytes]`. Returns the number of bytes written.
pub(crate) fn write_chunk<W: Write>(writer: &mut W, len: u32, bytes: &[u8]) -> Result<u64> {
    writer.write_all(&len.to_le_bytes())?;
    writer.write_all(bytes)?;
    Ok(CHUNK_LEN_SIZE as u64 + bytes.len() as u64)
}

/// Read a 4-byte length prefix at a record boundary.
///
/// Returns `Ok(None)` only when zero bytes are available. A partial prefix
/// is malformed.
pub(crate) fn read_record_len<R: Read>(reader: &mut R) -> Result<Option<u32>> {
    let mut buf = [0u8; CHUNK_LEN_SIZE];
    let mut filled = 0;

    while filled < CHUNK_LEN_SIZE {
        match reader.read(&mut buf[filled..]) {
            Ok(0) if filled == 0 => return Ok(None),
            Ok(0) => {
                return Err(KvError::Malformed(format!(
                    "truncated key length: expected {} bytes, got {}",
                    CHUNK_LEN_SIZE, filled
                )))
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(Some(u32::from_le_bytes(buf)))
}

/// Read a 4-byte length prefix that must be present.
pub(crate) fn read_len<R: Read>(reader: &mut R, what: &str) -> Result<u32> {
    let mut buf = [0u8; CHUNK_LEN_SIZE];
    reader
        .read_exact(&mut buf)
        .map_err(|e| truncated(e, what))?;
    Ok(u32::from_le_bytes(buf))
}

/// Read exactly `len` bytes.
///
/// Grows the buffer as data arrives instead of trusting `len` up front, so
/// a corrupt prefix cannot force a huge allocation.
pub(crate) fn read_bytes<R: Read>(reader: &mut R, len: usize, what: &str) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    reader.take(len as u64).read_to_end(&mut buf)?;

    if buf.len() != len {
        return Err(KvError::Malformed(format!(
            "truncated {}: expected {} bytes, got {}",
            what,
            len,
            buf.len()
        )));
    }

    Ok(buf)
}

/// Decode UTF-8 text read from the file
pub(crate) fn into_string(bytes: Vec<u8>, what: &str) -> Result<String> {
    String::from_utf8(bytes)
        .map_err(|e| KvError::Malformed(format!("{} is not valid UTF-8: {}", what, e)))
}

/// Map an unexpected EOF to a format error, keep other I/O errors as-is
pub(crate) fn truncated(err: io::Error, what: &str) -> KvError {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        KvError::Malformed(format!("truncated {}", what))
    } else {
        KvError::Io(err)
    }
}
