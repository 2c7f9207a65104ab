//! quicd-conn: Connection ID lifecycle and CRYPTO stream management
//!
//! Two per-connection state machines used by the quicd QUIC transport.
//!
//! # Components
//!
//! - **[`ConnectionIdManager`]** (RFC 9000 Section 5.1): stores the
//!   connection IDs issued by the peer, enforces `retire_prior_to` and the
//!   local limit, and rotates the destination connection ID once enough
//!   packets were sent on the current one.
//! - **[`CryptoStreamManager`]** (RFC 9001 Section 4): feeds CRYPTO frames to
//!   the reassembly stream of their encryption level and hands every
//!   complete handshake message to TLS.
//!
//! # Architecture
//!
//! - **Single owner**: both managers belong to one connection and are driven
//!   from its processing loop; nothing here locks, blocks or spawns
//! - **Injected collaborators**: retirement notifications, reassembly and the
//!   TLS stack are traits ([`RetirementSink`], [`CryptoStream`],
//!   [`CryptoDataHandler`])
//! - **Fatal errors**: every [`Error`] closes the connection with
//!   [`Error::transport_error`]
//!
//! # Module Organization
//!
//! - `connection`: Connection ID manager
//! - `crypto`: Encryption levels, CRYPTO stream reassembly and manager
//! - `frames`: Frames consumed and produced by the managers
//! - `config`: Tunables
//! - `types`: Connection ID and reset token types
//! - `error`: Error taxonomy

pub mod config;
pub mod connection;
pub mod crypto;
pub mod error;
pub mod frames;
pub mod types;

// Re-export key types
pub use config::{ConnectionCoreConfig, ConnectionIdConfig, CryptoStreamConfig};
pub use connection::{ConnectionIdEntry, ConnectionIdManager, RetirementSink};
pub use crypto::{
    CryptoDataHandler, CryptoStream, CryptoStreamManager, EncryptionLevel, ReassemblyCryptoStream,
};
pub use error::{Error, Result, TransportError};
pub use frames::{CryptoFrame, NewConnectionIdFrame, RetireConnectionIdFrame};
pub use types::{ConnectionId, StatelessResetToken, MAX_CID_LENGTH};
