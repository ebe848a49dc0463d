//! Internet checksum — 16-bit one's-complement fold over 16-bit words.
//!
//! The server computes this value over the whole payload and declares it
//! in the handshake; the client recomputes it over the reassembled buffer
//! and compares. Words are formed little-endian; both ends must group
//! bytes the same way, and the wire value was produced under the
//! little-endian host convention.

/// Fold a buffer into its 16-bit Internet checksum.
///
/// `data.len()` must be even; callers pad odd-length buffers with one
/// trailing zero byte first (see `ReassemblyBuffer::checksum_input`).
/// An empty buffer folds to `0xFFFF`.
pub fn fold(data: &[u8]) -> u16 {
    debug_assert!(data.len() % 2 == 0, "checksum input must be word-aligned");

    let mut sum: u32 = 0;
    for pair in data.chunks_exact(2) {
        sum += u16::from_le_bytes([pair[0], pair[1]]) as u32;
        // End-around carry: fold overflow back into the low 16 bits.
        if sum & 0xFFFF_0000 != 0 {
            sum &= 0xFFFF;
            sum += 1;
        }
    }
    !(sum as u16)
}
