//! Binary codec for the settings file.
//!
//! The whole settings map is stored as one framed document:
//! - Magic bytes to reject foreign files
//! - Version byte for forward compatibility
//! - Length-prefixed JSON body
//! - CRC32 checksum for corruption detection

use crc32fast::Hasher;
use serde::{de::DeserializeOwned, Serialize};

use crate::storage::traits::StorageError;

/// Current codec version.
const CODEC_VERSION: u8 = 1;

/// Magic bytes that start every settings file.
pub const MAGIC: [u8; 4] = *b"HAMN";

const HEADER_LEN: usize = MAGIC.len() + 1 + 4;
const TRAILER_LEN: usize = 4;

/// Settings files are small; anything above this is not ours.
const MAX_BODY_SIZE: usize = 16 * 1024 * 1024;

fn checksum(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Serializes a value into a framed document.
///
/// Format:
/// ```text
/// [magic: 4 bytes][version: 1 byte][length: 4 bytes LE][data: N bytes JSON][crc32: 4 bytes LE]
/// ```
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, StorageError> {
    let data = serde_json::to_vec(value)
        .map_err(|e| StorageError::SerializationError(e.to_string()))?;

    let len = u32::try_from(data.len()).map_err(|_| {
        StorageError::SerializationError(format!("settings body too large: {} bytes", data.len()))
    })?;

    let mut out = Vec::with_capacity(HEADER_LEN + data.len() + TRAILER_LEN);
    out.extend_from_slice(&MAGIC);
    out.push(CODEC_VERSION);
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(&data);
    out.extend_from_slice(&checksum(&data).to_le_bytes());
    Ok(out)
}

/// Deserializes a framed document, verifying magic, version and checksum.
///
/// # Errors
/// - [`StorageError::Corrupted`] on a bad header, truncation or CRC mismatch
/// - [`StorageError::SerializationError`] if the JSON body does not decode
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, StorageError> {
    if bytes.len() < HEADER_LEN + TRAILER_LEN {
        return Err(StorageError::Corrupted(format!(
            "file too short: {} bytes",
            bytes.len()
        )));
    }

    let (magic, rest) = bytes.split_at(MAGIC.len());
    if magic != MAGIC {
        return Err(StorageError::Corrupted(format!(
            "invalid magic bytes: expected {MAGIC:?}, got {magic:?}"
        )));
    }

    let version = rest[0];
    if version != CODEC_VERSION {
        return Err(StorageError::Corrupted(format!(
            "unsupported codec version: {version} (expected {CODEC_VERSION})"
        )));
    }

    let mut len_bytes = [0u8; 4];
    len_bytes.copy_from_slice(&rest[1..5]);
    let len = u32::from_le_bytes(len_bytes) as usize;
    if len > MAX_BODY_SIZE {
        return Err(StorageError::Corrupted(format!(
            "body size {len} exceeds maximum {MAX_BODY_SIZE}"
        )));
    }

    let body = &rest[5..];
    if body.len() != len + TRAILER_LEN {
        return Err(StorageError::Corrupted(format!(
            "length mismatch: header says {len} bytes, found {}",
            body.len().saturating_sub(TRAILER_LEN)
        )));
    }

    let (data, crc_bytes) = body.split_at(len);
    let mut stored = [0u8; 4];
    stored.copy_from_slice(crc_bytes);
    let stored_crc = u32::from_le_bytes(stored);
    let computed_crc = checksum(data);
    if stored_crc != computed_crc {
        return Err(StorageError::Corrupted(format!(
            "CRC mismatch: stored={stored_crc:08x}, computed={computed_crc:08x}"
        )));
    }

    serde_json::from_slice(data).map_err(|e| StorageError::SerializationError(e.to_string()))
}
