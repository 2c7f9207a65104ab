//! # Frame Types (RFC 9000 Section 19)
//!
//! In-memory form of the frames this crate consumes and produces. Parsing
//! and serialization belong to the frame codec of the outer connection.

#![forbid(unsafe_code)]

use crate::types::{ConnectionId, StatelessResetToken, VarInt};
use bytes::Bytes;

/// CRYPTO Frame (RFC 9000 Section 19.6)
///
/// Carries a fragment of the handshake byte stream. `data` is a cheap
/// reference-counted slice of the received datagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CryptoFrame {
    /// Byte offset in the crypto stream
    pub offset: VarInt,

    /// Crypto data
    pub data: Bytes,
}

impl CryptoFrame {
    pub fn new(offset: VarInt, data: impl Into<Bytes>) -> Self {
        Self {
            offset,
            data: data.into(),
        }
    }

    /// Offset one past the last byte carried by this frame
    ///
    /// Saturates at `u64::MAX`; any offset past 2^62 - 1 is invalid anyway.
    pub fn end(&self) -> u64 {
        self.offset.saturating_add(self.data.len() as u64)
    }
}

/// NEW_CONNECTION_ID Frame (RFC 9000 Section 19.15)
///
/// Provides peer with alternative Connection IDs for migration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewConnectionIdFrame {
    /// Sequence number for this Connection ID
    pub sequence_number: VarInt,

    /// Retire prior to this sequence number
    pub retire_prior_to: VarInt,

    /// Connection ID
    pub connection_id: ConnectionId,

    /// Stateless reset token (16 bytes)
    pub stateless_reset_token: Option<StatelessResetToken>,
}

/// RETIRE_CONNECTION_ID Frame (RFC 9000 Section 19.16)
///
/// Indicates Connection ID will no longer be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetireConnectionIdFrame {
    /// Sequence number of Connection ID being retired
    pub sequence_number: VarInt,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crypto_frame_end() {
        assert_eq!(CryptoFrame::new(10, b"abcd".to_vec()).end(), 14);
        assert_eq!(CryptoFrame::new(10, Bytes::new()).end(), 10);
        assert_eq!(CryptoFrame::new(u64::MAX - 1, b"abcd".to_vec()).end(), u64::MAX);
    }
}
