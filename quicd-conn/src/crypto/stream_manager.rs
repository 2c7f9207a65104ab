//! # CRYPTO Stream Manager (RFC 9001 Section 4.1.3)
//!
//! Routes CRYPTO frames to the reassembly stream of their encryption level
//! and feeds every complete handshake message to the TLS stack.
//!
//! ## Per-level state
//!
//! ```text
//! Active ──(handler reports level complete)──► Finished
//! ```
//!
//! Frames arriving at a finished level are still forwarded to the stream;
//! accepting or rejecting them is the stream's decision.

#![forbid(unsafe_code)]

use super::EncryptionLevel;
use crate::error::{Error, Result};
use crate::frames::CryptoFrame;
use bytes::Bytes;

#[cfg(test)]
use mockall::automock;

/// Reassembly stream for one encryption level.
#[cfg_attr(test, automock)]
pub trait CryptoStream {
    /// Buffer the frame's data.
    fn handle_frame(&mut self, frame: &CryptoFrame) -> Result<()>;

    /// Next chunk of in-order data, empty when nothing is available.
    fn next_reassembled_chunk(&mut self) -> Bytes;

    /// Signal end of data at this level.
    fn finish(&mut self) -> Result<()>;
}

/// TLS handshake driver.
#[cfg_attr(test, automock)]
pub trait CryptoDataHandler {
    /// Process one handshake message received at `level`.
    ///
    /// Returns true once the handshake is done with `level`.
    fn handle_message(&mut self, data: &[u8], level: EncryptionLevel) -> bool;
}

/// CRYPTO Stream Manager
///
/// Owns the Initial and Handshake streams and the message handler of a
/// single connection.
#[derive(Debug)]
pub struct CryptoStreamManager<S: CryptoStream, H: CryptoDataHandler> {
    handler: H,

    initial_stream: S,
    handshake_stream: S,

    initial_finished: bool,
    handshake_finished: bool,
}

impl<S: CryptoStream, H: CryptoDataHandler> CryptoStreamManager<S, H> {
    pub fn new(handler: H, initial_stream: S, handshake_stream: S) -> Self {
        Self {
            handler,
            initial_stream,
            handshake_stream,
            initial_finished: false,
            handshake_finished: false,
        }
    }

    /// Handle a CRYPTO frame received at `level`.
    ///
    /// Drains every message the frame made available. Stops after the
    /// handler completes the level, even if more data is buffered.
    pub fn handle_crypto_frame(&mut self, frame: &CryptoFrame, level: EncryptionLevel) -> Result<()> {
        let (stream, finished) = match level {
            EncryptionLevel::Initial => (&mut self.initial_stream, &mut self.initial_finished),
            EncryptionLevel::Handshake => {
                (&mut self.handshake_stream, &mut self.handshake_finished)
            }
            EncryptionLevel::ZeroRtt | EncryptionLevel::OneRtt => {
                tracing::warn!(level = %level, "CRYPTO frame at unexpected encryption level");
                return Err(Error::UnexpectedEncryptionLevel(level));
            }
        };

        stream.handle_frame(frame)?;

        loop {
            let data = stream.next_reassembled_chunk();
            if data.is_empty() {
                return Ok(());
            }

            tracing::trace!(level = %level, len = data.len(), "handshake message");
            if self.handler.handle_message(&data, level) {
                tracing::debug!(level = %level, "handshake done with encryption level, finishing stream");
                *finished = true;
                return stream.finish();
            }
        }
    }

    /// Whether the handler has completed `level`
    pub fn is_finished(&self, level: EncryptionLevel) -> bool {
        match level {
            EncryptionLevel::Initial => self.initial_finished,
            EncryptionLevel::Handshake => self.handshake_finished,
            EncryptionLevel::ZeroRtt | EncryptionLevel::OneRtt => false,
        }
    }

    /// Stream bound to `level`, if CRYPTO frames are accepted there
    pub fn stream(&self, level: EncryptionLevel) -> Option<&S> {
        match level {
            EncryptionLevel::Initial => Some(&self.initial_stream),
            EncryptionLevel::Handshake => Some(&self.handshake_stream),
            EncryptionLevel::ZeroRtt | EncryptionLevel::OneRtt => None,
        }
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }
}
