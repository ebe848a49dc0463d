//! Courier wire format — the two datagram layouts the server sends.
//!
//! These layouts ARE the protocol. All integer fields are ASCII-encoded
//! (decimal or hex), a holdover from the server's text formatting, so
//! parsing goes through str rather than byte-order conversions.
//!
//! Handshake datagram:
//!   bytes 0-3   declared payload size, ASCII decimal
//!   bytes 4-7   expected checksum, ASCII hex
//!   bytes 8..   filename, NUL- or boundary-terminated
//!
//! Segment datagram:
//!   bytes 0-1   sequence index, ASCII decimal (two digits)
//!   bytes 2-5   reserved
//!   bytes 6..   payload, at most SEGMENT_PAYLOAD bytes

use bytes::Bytes;

// ── Layout constants ──────────────────────────────────────────────────────────

/// Fixed header length of the handshake datagram (size + checksum fields).
pub const HANDSHAKE_HEADER_LEN: usize = 8;

/// Fixed header length of a segment datagram (index + reserved fields).
pub const SEGMENT_HEADER_LEN: usize = 6;

/// Maximum payload bytes carried by one segment.
pub const SEGMENT_PAYLOAD: usize = 100;

/// Highest representable segment count. The two-digit index field cannot
/// address more; larger files are outside the protocol.
pub const MAX_SEGMENTS: usize = 100;

// ── Handshake ─────────────────────────────────────────────────────────────────

/// The first datagram of a transfer: what the server is about to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handshake {
    /// Total payload size in bytes across all segments.
    pub declared_size: usize,
    /// Internet checksum the assembled payload must fold to.
    /// The wire encoding is hex; there is no decimal interpretation.
    pub expected_checksum: u16,
    /// Bare output filename. Path components are rejected at parse time
    /// so output can never escape the storage directory.
    pub filename: String,
}

impl Handshake {
    pub fn parse(datagram: &[u8]) -> Result<Self, WireError> {
        if datagram.len() < HANDSHAKE_HEADER_LEN {
            return Err(WireError::TruncatedHandshake(datagram.len()));
        }

        let size_field = ascii_field(&datagram[0..4])?;
        let declared_size = size_field
            .parse::<usize>()
            .map_err(|_| WireError::BadSizeField(size_field.to_string()))?;

        let checksum_field = ascii_field(&datagram[4..8])?;
        let expected_checksum = u16::from_str_radix(checksum_field, 16)
            .map_err(|_| WireError::BadChecksumField(checksum_field.to_string()))?;

        let name_bytes = &datagram[HANDSHAKE_HEADER_LEN..];
        let name_bytes = match name_bytes.iter().position(|&b| b == 0) {
            Some(nul) => &name_bytes[..nul],
            None => name_bytes,
        };
        let filename = std::str::from_utf8(name_bytes)
            .map_err(|_| WireError::BadFilename)?
            .to_string();
        if !is_safe_filename(&filename) {
            return Err(WireError::UnsafeFilename(filename));
        }

        Ok(Handshake {
            declared_size,
            expected_checksum,
            filename,
        })
    }
}

/// A filename is safe when it is a single non-empty path component.
fn is_safe_filename(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\')
}

// ── Segment ───────────────────────────────────────────────────────────────────

/// One data-bearing datagram: a sequence index and a payload chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub index: usize,
    pub payload: Bytes,
}

impl Segment {
    pub fn parse(datagram: &[u8]) -> Result<Self, WireError> {
        if datagram.len() < SEGMENT_HEADER_LEN {
            return Err(WireError::TruncatedSegment(datagram.len()));
        }

        let index_field = ascii_field(&datagram[0..2])?;
        let index = index_field
            .parse::<usize>()
            .map_err(|_| WireError::BadSequenceIndex(index_field.to_string()))?;

        let payload = &datagram[SEGMENT_HEADER_LEN..];
        if payload.len() > SEGMENT_PAYLOAD {
            return Err(WireError::OversizedPayload(payload.len()));
        }

        Ok(Segment {
            index,
            payload: Bytes::copy_from_slice(payload),
        })
    }
}

/// Decode an ASCII integer field, tolerating the NUL and space padding
/// the server's text formatting leaves behind.
fn ascii_field(bytes: &[u8]) -> Result<&str, WireError> {
    let text = std::str::from_utf8(bytes).map_err(|_| WireError::NonAsciiField)?;
    Ok(text.trim_matches(|c: char| c == '\0' || c.is_ascii_whitespace()))
}

// ── Errors ────────────────────────────────────────────────────────────────────

/// Errors that can arise when interpreting wire-format data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WireError {
    #[error("handshake datagram is {0} bytes, header needs {}", HANDSHAKE_HEADER_LEN)]
    TruncatedHandshake(usize),

    #[error("segment datagram is {0} bytes, header needs {}", SEGMENT_HEADER_LEN)]
    TruncatedSegment(usize),

    #[error("integer field is not ASCII")]
    NonAsciiField,

    #[error("unparseable size field: {0:?}")]
    BadSizeField(String),

    #[error("unparseable checksum field: {0:?}")]
    BadChecksumField(String),

    #[error("unparseable sequence index: {0:?}")]
    BadSequenceIndex(String),

    #[error("filename is not valid UTF-8")]
    BadFilename,

    #[error("unsafe filename: {0:?}")]
    UnsafeFilename(String),

    #[error("segment payload is {0} bytes, capacity is {}", SEGMENT_PAYLOAD)]
    OversizedPayload(usize),
}

// ── Tests ─────────────────────────────────────────────────────────────────────
