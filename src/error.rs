//! Crate-wide error and result types.

use std::error;
use std::fmt;
use std::io;
use std::result;

/// `Error` enumerates every failure the coder family can report. All of
/// them are fatal to the current coding session; nothing is recovered
/// locally.
#[derive(Debug)]
pub enum Error {
    /// An I/O error occured on the underlying byte stream.
    Io(io::Error),
    /// A coder was constructed with a state width outside the supported
    /// range of 1 to 32 bits.
    InvalidStateWidth(u32),
    /// A bit writer was handed a value other than 0 or 1.
    InvalidBit(u32),
    /// A strict bit read hit the physical end of the stream.
    UnexpectedEnd,
    /// A frequency table was queried with a symbol beyond its limit.
    SymbolOutOfRange(usize),
    /// A frequency table was constructed over zero symbols.
    EmptyModel,
    /// A coder was asked to code a symbol whose frequency is zero.
    ZeroFrequency(usize),
    /// The model's frequency total exceeds what the coder's state width
    /// can represent without overflow.
    ModelTooLarge(u64),
    /// The decoder's code register fell outside the current interval,
    /// meaning the input does not match the model.
    StateCorrupt,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Error::Io(ref err) => err.fmt(f),
            Error::InvalidStateWidth(bits) => {
                write!(f, "state width of {} bits is out of range", bits)
            }
            Error::InvalidBit(value) => {
                write!(f, "bit value must be 0 or 1, got {}", value)
            }
            Error::UnexpectedEnd => f.write_str("unexpected end of bit stream"),
            Error::SymbolOutOfRange(symbol) => {
                write!(f, "symbol {} is out of range for the model", symbol)
            }
            Error::EmptyModel => f.write_str("frequency table needs at least one symbol"),
            Error::ZeroFrequency(symbol) => {
                write!(f, "symbol {} has zero frequency", symbol)
            }
            Error::ModelTooLarge(total) => {
                write!(f, "frequency total {} is too large to code", total)
            }
            Error::StateCorrupt => f.write_str("decoder state diverged from the bit stream"),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::Io(ref err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = result::Result<T, Error>;
