//! # Handshake Data Delivery (RFC 9001 Section 4)
//!
//! Encryption levels, CRYPTO stream reassembly and the manager feeding
//! handshake messages to TLS.

mod level;
pub mod stream;
pub mod stream_manager;


pub use level::EncryptionLevel;
pub use stream::ReassemblyCryptoStream;
pub use stream_manager::{CryptoDataHandler, CryptoStream, CryptoStreamManager};
