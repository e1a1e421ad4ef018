#![deny(missing_docs)]

//! Order-0 static arithmetic coding for byte streams.
//!
//! The compressed format is a fixed 1024-byte frequency header (256
//! big-endian 32-bit counts, one per byte value) followed by an
//! arithmetic-coded bit stream that gets within a fraction of a bit of the
//! input's order-0 entropy. See [`entropy::ari`] for the coder and
//! [`entropy::ari::stream`] for the container format.
//!
//! ```rust
//! use order0::entropy::ari;
//!
//! let compressed = ari::compress(b"banana", Vec::new()).unwrap();
//! let restored = ari::decompress(&compressed[..], Vec::new()).unwrap();
//! assert_eq!(&restored[..], b"banana");
//! ```

/// Public exports
pub use self::error::{Error, Result};

pub mod bitio;
pub mod error;

/// Entropy coder family
// http://en.wikipedia.org/wiki/Entropy_encoding
pub mod entropy {
    pub mod ari;
}
