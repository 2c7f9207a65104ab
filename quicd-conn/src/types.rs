//! # Core Types (RFC 8999, RFC 9000)
//!
//! Identifier types shared by the connection ID manager and the CRYPTO
//! stream manager. Connection IDs are `bytes::Bytes`-backed so frames can
//! hand them over without copying.

#![forbid(unsafe_code)]

use bytes::Bytes;

/// Variable-Length Integer (RFC 9000 Section 16)
///
/// Wire encoding is handled by the frame codec; here a VarInt is a plain
/// `u64` no larger than 2^62 - 1.
pub type VarInt = u64;

// ============================================================================
// Connection ID (RFC 9000 Section 5.1, RFC 8999 Section 5.3)
// ============================================================================

/// Maximum length of a Connection ID (20 bytes per RFC 9000)
pub const MAX_CID_LENGTH: usize = 20;

/// Connection ID - Version-independent identifier (RFC 8999 Section 5.3)
///
/// Connection IDs are opaque byte sequences chosen by endpoints.
/// Zero-length CIDs are permitted by the protocol; whether this endpoint
/// accepts them from the peer is a [`ConnectionIdConfig`] decision.
///
/// [`ConnectionIdConfig`]: crate::config::ConnectionIdConfig
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId {
    bytes: Bytes,
}

impl ConnectionId {
    /// Create a new ConnectionId from bytes
    ///
    /// Returns None if length exceeds MAX_CID_LENGTH
    pub fn new(bytes: Bytes) -> Option<Self> {
        if bytes.len() > MAX_CID_LENGTH {
            return None;
        }
        Some(Self { bytes })
    }

    /// Create from a borrowed slice (copies data)
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        if slice.len() > MAX_CID_LENGTH {
            return None;
        }
        Some(Self {
            bytes: Bytes::copy_from_slice(slice),
        })
    }

    /// Create an empty (zero-length) connection ID
    pub fn empty() -> Self {
        Self { bytes: Bytes::new() }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl core::fmt::Debug for ConnectionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "ConnectionId({:02x?})", &self.bytes[..])
    }
}

impl core::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for byte in &self.bytes[..] {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

/// Stateless Reset Token (RFC 9000 Section 10.3)
///
/// 16 bytes bound to a connection ID by the peer that issued it.
pub type StatelessResetToken = [u8; 16];
