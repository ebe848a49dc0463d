//! One full transfer attempt: handshake → segments → verify → deliver.
//!
//! The attempt owns its reassembly buffer; nothing survives into the
//! next attempt except the operator's replacement identifier. Wire and
//! placement errors abort the attempt. Only a checksum mismatch is
//! recoverable, and recovery means redoing the entire exchange — there
//! is no per-segment retransmission anywhere in this protocol.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use courier_core::{checksum, segment_count, Handshake, ReassemblyBuffer, Segment};

use crate::net::ServerLink;
use crate::output;

/// How an attempt ended, short of a fatal error.
#[derive(Debug)]
pub enum Outcome {
    /// Checksum verified; the file is on disk.
    Delivered { path: PathBuf, bytes: usize },
    /// Checksum did not verify; nothing was written.
    ChecksumMismatch { expected: u16, computed: u16 },
}

/// Run one attempt against an already-opened link. The identifier
/// datagram must have been sent first.
pub async fn run_attempt(link: &ServerLink, storage_dir: &Path) -> Result<Outcome> {
    // AWAIT_HANDSHAKE
    let datagram = link
        .recv_datagram()
        .await
        .context("waiting for handshake")?;
    let handshake = Handshake::parse(&datagram).context("malformed handshake")?;
    tracing::info!(
        size = handshake.declared_size,
        checksum = %format!("{:#06x}", handshake.expected_checksum),
        filename = %handshake.filename,
        "handshake received"
    );

    // AWAIT_SEGMENTS
    let count = segment_count(handshake.declared_size);
    let mut buffer = ReassemblyBuffer::new(count);
    for received in 0..count {
        let datagram = link
            .recv_datagram()
            .await
            .with_context(|| format!("waiting for segment {} of {count}", received + 1))?;
        let segment = Segment::parse(&datagram).context("malformed segment")?;
        tracing::debug!(
            index = segment.index,
            bytes = segment.payload.len(),
            "segment received"
        );
        buffer.place(segment.index, segment.payload)?;
    }
    if buffer.missing() > 0 {
        // Duplicate indices left slots unfilled. The fold below will
        // almost certainly disagree with the declared checksum.
        tracing::warn!(missing = buffer.missing(), "segments unaccounted for");
    }

    // VERIFY
    let computed = checksum::fold(&buffer.checksum_input());
    if computed != handshake.expected_checksum {
        tracing::warn!(
            expected = %format!("{:#06x}", handshake.expected_checksum),
            computed = %format!("{computed:#06x}"),
            "checksum mismatch"
        );
        return Ok(Outcome::ChecksumMismatch {
            expected: handshake.expected_checksum,
            computed,
        });
    }

    // SUCCESS
    let path = output::write_segments(storage_dir, &handshake.filename, &buffer)?;
    let bytes = buffer.total_len();
    tracing::info!(
        path = %path.display(),
        bytes,
        segments = count,
        "file verified and written"
    );
    Ok(Outcome::Delivered { path, bytes })
}
