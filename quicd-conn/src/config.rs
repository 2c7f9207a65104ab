//! Connection core configuration.
//!
//! Tunables for connection ID rotation and CRYPTO stream buffering. All
//! structs deserialize with `#[serde(default)]`, so a partial section such as
//!
//! ```toml
//! [connection_ids]
//! packets_per_connection_id = 5000
//! ```
//!
//! keeps defaults for everything not mentioned.

use serde::{Deserialize, Serialize};

/// Peer-issued connection IDs kept ready for rotation.
pub const DEFAULT_MAX_ACTIVE_CONNECTION_IDS: usize = 4;

/// Packets sent on one connection ID before the next rotation is allowed.
pub const DEFAULT_PACKETS_PER_CONNECTION_ID: u64 = 10_000;

/// Largest CRYPTO stream offset buffered per encryption level (16 KB).
pub const DEFAULT_MAX_CRYPTO_STREAM_OFFSET: u64 = 16 * 1024;

/// Minimum active_connection_id_limit (RFC 9000 Section 18.2)
const MIN_ACTIVE_CONNECTION_IDS: usize = 2;

/// Configuration for the components owned by one connection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionCoreConfig {
    /// Peer connection ID bookkeeping and rotation
    pub connection_ids: ConnectionIdConfig,

    /// CRYPTO stream reassembly limits
    pub crypto: CryptoStreamConfig,
}

impl ConnectionCoreConfig {
    /// Validate both sections, collecting every problem found.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if let Err(e) = self.connection_ids.validate() {
            errors.extend(e);
        }
        if let Err(e) = self.crypto.validate() {
            errors.extend(e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Connection ID manager configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionIdConfig {
    /// Maximum number of unused peer connection IDs held at once.
    ///
    /// When the peer sends more, the lowest sequence number is retired.
    pub max_active_connection_ids: usize,

    /// Rotation gate: a new connection ID is adopted only after strictly
    /// more than this many packets were sent on the current one.
    pub packets_per_connection_id: u64,

    /// Accept zero-length connection IDs in NEW_CONNECTION_ID frames.
    pub accept_zero_length_ids: bool,
}

impl Default for ConnectionIdConfig {
    fn default() -> Self {
        Self {
            max_active_connection_ids: DEFAULT_MAX_ACTIVE_CONNECTION_IDS,
            packets_per_connection_id: DEFAULT_PACKETS_PER_CONNECTION_ID,
            accept_zero_length_ids: false,
        }
    }
}

impl ConnectionIdConfig {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.max_active_connection_ids < MIN_ACTIVE_CONNECTION_IDS {
            errors.push(format!(
                "max_active_connection_ids must be >= {} (got {})",
                MIN_ACTIVE_CONNECTION_IDS, self.max_active_connection_ids
            ));
        }

        if self.packets_per_connection_id == 0 {
            errors.push("packets_per_connection_id must be > 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// CRYPTO stream configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CryptoStreamConfig {
    /// Highest offset of CRYPTO data buffered at one encryption level.
    ///
    /// RFC 9000 Section 7.5: endpoints MAY close with CRYPTO_BUFFER_EXCEEDED
    /// once more data than this is outstanding.
    pub max_crypto_stream_offset: u64,
}

impl Default for CryptoStreamConfig {
    fn default() -> Self {
        Self {
            max_crypto_stream_offset: DEFAULT_MAX_CRYPTO_STREAM_OFFSET,
        }
    }
}

impl CryptoStreamConfig {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        if self.max_crypto_stream_offset == 0 {
            return Err(vec!["max_crypto_stream_offset must be > 0".to_string()]);
        }
        Ok(())
    }
}
