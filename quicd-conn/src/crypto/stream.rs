//! # CRYPTO Stream Reassembly (RFC 9000 Section 7.5, 19.6)
//!
//! Default [`CryptoStream`] implementation. CRYPTO frames may arrive out of
//! order, duplicated, or overlapping; the stream reorders them and hands out
//! whole TLS handshake messages.
//!
//! ## Buffering
//!
//! ```text
//! fragments (by offset) ──► contiguous unread bytes ──► one message at a time
//!   [20..30] [40..50]         msg_buf [read_offset..]     type(1) len(3) body
//! ```
//!
//! Nothing beyond `max_crypto_stream_offset` is accepted, which bounds the
//! memory a peer can pin per encryption level.

#![forbid(unsafe_code)]

extern crate alloc;
use super::stream_manager::CryptoStream;
use super::EncryptionLevel;
use crate::config::CryptoStreamConfig;
use crate::error::{Error, Result};
use crate::frames::CryptoFrame;
use alloc::collections::BTreeMap;
use bytes::{Bytes, BytesMut};

/// TLS handshake message header: msg_type(1) + length(3)
const HANDSHAKE_HEADER_LEN: usize = 4;

/// Reassembling CRYPTO stream for one encryption level
#[derive(Debug)]
pub struct ReassemblyCryptoStream {
    level: EncryptionLevel,
    max_offset: u64,

    /// Out-of-order fragments keyed by offset
    fragments: BTreeMap<u64, Bytes>,

    /// Contiguous bytes received but not yet returned as a message
    msg_buf: BytesMut,

    /// Offset one past the last contiguous byte
    contiguous_end: u64,

    /// Highest offset seen in any frame
    highest_offset: u64,

    finished: bool,
}

impl ReassemblyCryptoStream {
    pub fn new(level: EncryptionLevel, config: &CryptoStreamConfig) -> Self {
        Self {
            level,
            max_offset: config.max_crypto_stream_offset,
            fragments: BTreeMap::new(),
            msg_buf: BytesMut::new(),
            contiguous_end: 0,
            highest_offset: 0,
            finished: false,
        }
    }

    pub fn level(&self) -> EncryptionLevel {
        self.level
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Whether contiguous data is waiting to be read
    pub fn has_unread_data(&self) -> bool {
        !self.msg_buf.is_empty()
    }

    /// Number of fragments waiting for a gap to fill
    pub fn pending_fragments(&self) -> usize {
        self.fragments.len()
    }

    fn insert_fragment(&mut self, offset: u64, data: Bytes) {
        // Keep the longer fragment when two start at the same offset.
        match self.fragments.get(&offset) {
            Some(existing) if existing.len() >= data.len() => {}
            _ => {
                self.fragments.insert(offset, data);
            }
        }
    }

    /// Move every fragment that now touches the contiguous prefix into msg_buf.
    fn pull_contiguous(&mut self) {
        while let Some((&offset, _)) = self.fragments.first_key_value() {
            if offset > self.contiguous_end {
                break;
            }
            let Some(data) = self.fragments.remove(&offset) else {
                break;
            };

            let end = offset + data.len() as u64;
            if end <= self.contiguous_end {
                continue;
            }

            let skip = (self.contiguous_end - offset) as usize;
            self.msg_buf.extend_from_slice(&data[skip..]);
            self.contiguous_end = end;
        }
    }
}

impl CryptoStream for ReassemblyCryptoStream {
    fn handle_frame(&mut self, frame: &CryptoFrame) -> Result<()> {
        let end = frame.end();
        if end > self.max_offset {
            tracing::warn!(
                level = %self.level,
                offset = end,
                limit = self.max_offset,
                "CRYPTO data exceeds buffer limit"
            );
            return Err(Error::CryptoBufferExceeded {
                level: self.level,
                offset: end,
            });
        }

        if self.finished {
            if end > self.highest_offset {
                return Err(Error::CryptoDataAfterFinish(self.level));
            }
            // Retransmission of data already consumed.
            return Ok(());
        }

        self.highest_offset = self.highest_offset.max(end);

        if frame.data.is_empty() || end <= self.contiguous_end {
            return Ok(());
        }

        self.insert_fragment(frame.offset, frame.data.clone());
        self.pull_contiguous();
        Ok(())
    }

    fn next_reassembled_chunk(&mut self) -> Bytes {
        if self.msg_buf.len() < HANDSHAKE_HEADER_LEN {
            return Bytes::new();
        }

        let body_len = u32::from_be_bytes([0, self.msg_buf[1], self.msg_buf[2], self.msg_buf[3]])
            as usize;
        let msg_len = HANDSHAKE_HEADER_LEN + body_len;
        if self.msg_buf.len() < msg_len {
            return Bytes::new();
        }

        self.msg_buf.split_to(msg_len).freeze()
    }

    fn finish(&mut self) -> Result<()> {
        if self.has_unread_data() || !self.fragments.is_empty() {
            tracing::warn!(
                level = %self.level,
                buffered = self.msg_buf.len(),
                fragments = self.fragments.len(),
                "crypto stream finished with unread data"
            );
            return Err(Error::UnreadCryptoData(self.level));
        }
        self.finished = true;
        Ok(())
    }
}
