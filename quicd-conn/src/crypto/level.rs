//! Encryption levels (RFC 9001 Section 4).

#![forbid(unsafe_code)]

use core::fmt;

/// Encryption Level (RFC 9001 Section 4)
///
/// Corresponds to TLS encryption levels. Only Initial and Handshake carry
/// CRYPTO data through [`CryptoStreamManager`](super::CryptoStreamManager);
/// post-handshake messages at 1-RTT take a different path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncryptionLevel {
    /// Initial packets (uses Initial Secret derived from DCID)
    Initial,

    /// Handshake packets (uses Handshake Secret from TLS)
    Handshake,

    /// 0-RTT packets (uses Early Data Secret from TLS)
    ZeroRtt,

    /// 1-RTT packets (uses Application Secret from TLS)
    OneRtt,
}

impl fmt::Display for EncryptionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EncryptionLevel::Initial => "Initial",
            EncryptionLevel::Handshake => "Handshake",
            EncryptionLevel::ZeroRtt => "0-RTT",
            EncryptionLevel::OneRtt => "1-RTT",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_display() {
        assert_eq!(EncryptionLevel::Initial.to_string(), "Initial");
        assert_eq!(EncryptionLevel::Handshake.to_string(), "Handshake");
        assert_eq!(EncryptionLevel::ZeroRtt.to_string(), "0-RTT");
        assert_eq!(EncryptionLevel::OneRtt.to_string(), "1-RTT");
    }
}
