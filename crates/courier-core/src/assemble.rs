//! Segment reassembly — index-addressed placement into a fixed set of
//! slots, sized from the handshake's declared payload size.
//!
//! Arrival order is irrelevant: each segment lands in the slot named by
//! its sequence index, never at the next free position. The index is
//! attacker-controlled input, so placement is bounds-checked; an index
//! outside the expected range is a protocol violation, not a write.

use bytes::Bytes;

use crate::wire::SEGMENT_PAYLOAD;

/// Number of segments needed to carry `declared_size` payload bytes.
pub fn segment_count(declared_size: usize) -> usize {
    declared_size.div_ceil(SEGMENT_PAYLOAD)
}

/// Reassembly state for one transfer attempt.
///
/// Slot lengths are recorded independently so the output writer can emit
/// exactly the bytes each segment carried, in index order. A slot left
/// unfilled (a lost or duplicated datagram) contributes nothing; the
/// checksum mismatch downstream is the protocol's only loss signal.
#[derive(Debug)]
pub struct ReassemblyBuffer {
    slots: Vec<Option<Bytes>>,
}

impl ReassemblyBuffer {
    pub fn new(segment_count: usize) -> Self {
        Self {
            slots: vec![None; segment_count],
        }
    }

    pub fn segment_count(&self) -> usize {
        self.slots.len()
    }

    /// Place one segment payload into its slot. A duplicate index
    /// overwrites the earlier payload, matching the wire protocol's
    /// last-writer semantics.
    pub fn place(&mut self, index: usize, payload: Bytes) -> Result<(), AssembleError> {
        let count = self.slots.len();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(AssembleError::IndexOutOfRange { index, count })?;
        *slot = Some(payload);
        Ok(())
    }

    /// Slots still waiting for their segment.
    pub fn missing(&self) -> usize {
        self.slots.iter().filter(|s| s.is_none()).count()
    }

    /// Total payload bytes placed so far.
    pub fn total_len(&self) -> usize {
        self.segments().map(Bytes::len).sum()
    }

    /// Filled payloads in index order, for output.
    pub fn segments(&self) -> impl Iterator<Item = &Bytes> {
        self.slots.iter().flatten()
    }

    /// The buffer the checksum is folded over: every placed payload
    /// concatenated in index order, padded with exactly one zero byte
    /// when the total length is odd (the fold works on 16-bit words).
    pub fn checksum_input(&self) -> Vec<u8> {
        let mut input = Vec::with_capacity(self.total_len() + 1);
        for payload in self.segments() {
            input.extend_from_slice(payload);
        }
        if input.len() % 2 != 0 {
            input.push(0);
        }
        input
    }
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssembleError {
    #[error("segment index {index} outside expected range 0..{count}")]
    IndexOutOfRange { index: usize, count: usize },
}

// ── Tests ─────────────────────────────────────────────────────────────────────
