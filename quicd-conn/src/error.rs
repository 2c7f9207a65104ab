//! QUIC Error Types
//!
//! Every error produced here is terminal for the connection. The outer
//! connection loop maps it to a CONNECTION_CLOSE frame of type 0x1c using
//! [`Error::transport_error`].

#![forbid(unsafe_code)]

use crate::crypto::EncryptionLevel;
use thiserror::Error;

/// Transport Error Codes as defined in RFC 9000 Section 20.1
///
/// Only the codes this crate and its collaborators produce are listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u64)]
pub enum TransportError {
    /// Frame Encoding Error (0x07) - Frame encoding error
    FrameEncodingError = 0x07,

    /// Protocol Violation (0x0a) - Generic protocol violation
    ProtocolViolation = 0x0a,

    /// Crypto Buffer Exceeded (0x0d) - CRYPTO data buffer overflowed
    CryptoBufferExceeded = 0x0d,
}

impl TransportError {
    /// Wire value carried in CONNECTION_CLOSE
    pub fn code(self) -> u64 {
        self as u64
    }
}

/// Generic Result Type for connection core operations
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for the connection ID and CRYPTO stream managers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Peer re-sent a sequence number with a different connection ID
    #[error("received conflicting connection IDs for sequence number {0}")]
    ConflictingConnectionId(u64),

    /// Peer re-sent a sequence number with a different stateless reset token
    #[error("received conflicting stateless reset tokens for sequence number {0}")]
    ConflictingResetToken(u64),

    /// NEW_CONNECTION_ID carried a zero-length connection ID
    #[error("received zero-length connection ID for sequence number {0}")]
    ZeroLengthConnectionId(u64),

    #[error("received CRYPTO frame with unexpected encryption level: {0}")]
    UnexpectedEncryptionLevel(EncryptionLevel),

    /// CRYPTO data would be buffered past the configured limit
    #[error("CRYPTO data at {level} exceeds maximum buffered offset (offset {offset})")]
    CryptoBufferExceeded { level: EncryptionLevel, offset: u64 },

    #[error("received crypto data after change of encryption level")]
    CryptoDataAfterFinish(EncryptionLevel),

    #[error("encryption level changed, but crypto stream has more data to read")]
    UnreadCryptoData(EncryptionLevel),

    /// Transport error raised by an external collaborator
    #[error("{reason}")]
    Transport {
        code: TransportError,
        reason: String,
    },
}

impl Error {
    /// Build a [`Error::Transport`] from a collaborator's code and reason.
    pub fn transport(code: TransportError, reason: impl Into<String>) -> Self {
        Error::Transport {
            code,
            reason: reason.into(),
        }
    }

    /// Transport error code to close the connection with.
    pub fn transport_error(&self) -> TransportError {
        match self {
            Error::ConflictingConnectionId(_)
            | Error::ConflictingResetToken(_)
            | Error::UnexpectedEncryptionLevel(_)
            | Error::CryptoDataAfterFinish(_)
            | Error::UnreadCryptoData(_) => TransportError::ProtocolViolation,
            Error::ZeroLengthConnectionId(_) => TransportError::FrameEncodingError,
            Error::CryptoBufferExceeded { .. } => TransportError::CryptoBufferExceeded,
            Error::Transport { code, .. } => *code,
        }
    }
}
