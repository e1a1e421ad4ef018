/*!

Bit-granular I/O on top of byte streams.

`BitWriter` packs individual bits into bytes MSB-first and zero-pads the
final partial byte when finished. `BitReader` unpacks bits MSB-first and
reports the physical end of the byte stream as `None`; the EOF condition is
sticky, so every read past the last byte keeps returning `None`.

Fixed-width integers travel through the same bit path with `write_int` and
`read_int`, most significant bit first, so a 32-bit integer written at a
byte boundary occupies exactly four big-endian bytes.

# Example

```rust
use order0::bitio::{BitReader, BitWriter};

let mut writer = BitWriter::new(Vec::new());
for &bit in &[1, 0, 1, 1] {
    writer.write(bit).unwrap();
}
let (bytes, result) = writer.finish();
result.unwrap();

let mut reader = BitReader::new(&bytes[..]);
assert_eq!(reader.read().unwrap(), Some(1));
assert_eq!(reader.read().unwrap(), Some(0));
```

*/

use std::io::{Bytes, Read, Write};

use crate::error::{Error, Result};

/// Packs single bits into whole bytes and hands them to the wrapped
/// writer. Bits fill each byte from the most significant position down.
pub struct BitWriter<W> {
    w: W,
    current: u8,
    filled: u32,
}

impl<W: Write> BitWriter<W> {
    /// Creates a bit writer emitting into the given byte stream.
    pub fn new(w: W) -> BitWriter<W> {
        BitWriter {
            w,
            current: 0,
            filled: 0,
        }
    }

    /// Appends a single bit, which must be 0 or 1.
    pub fn write(&mut self, bit: u32) -> Result<()> {
        if bit > 1 {
            return Err(Error::InvalidBit(bit));
        }
        self.current = (self.current << 1) | bit as u8;
        self.filled += 1;
        if self.filled == 8 {
            self.w.write_all(&[self.current])?;
            self.current = 0;
            self.filled = 0;
        }
        Ok(())
    }

    /// Appends the low `num_bits` bits of `value`, most significant first.
    pub fn write_int(&mut self, num_bits: u32, value: u32) -> Result<()> {
        debug_assert!(num_bits <= 32);
        for i in (0..num_bits).rev() {
            self.write((value >> i) & 1)?;
        }
        Ok(())
    }

    /// Pads the trailing partial byte with zero bits, flushes, and returns
    /// the wrapped writer.
    pub fn finish(mut self) -> (W, Result<()>) {
        let mut result = Ok(());
        while self.filled != 0 {
            if let Err(e) = self.write(0) {
                result = Err(e);
                break;
            }
        }
        let flushed = self.w.flush().map_err(Error::from);
        (self.w, result.and(flushed))
    }
}

/// Unpacks bits from the wrapped byte stream, most significant bit of each
/// byte first.
pub struct BitReader<R: Read> {
    input: Bytes<R>,
    current: u8,
    remaining: u32,
    eof: bool,
}

impl<R: Read> BitReader<R> {
    /// Creates a bit reader draining the given byte stream.
    pub fn new(r: R) -> BitReader<R> {
        BitReader {
            input: r.bytes(),
            current: 0,
            remaining: 0,
            eof: false,
        }
    }

    /// Returns the next bit, or `None` once the byte stream is exhausted.
    pub fn read(&mut self) -> Result<Option<u32>> {
        if self.eof {
            return Ok(None);
        }
        if self.remaining == 0 {
            match self.input.next() {
                Some(byte) => {
                    self.current = byte?;
                    self.remaining = 8;
                }
                None => {
                    self.eof = true;
                    return Ok(None);
                }
            }
        }
        self.remaining -= 1;
        Ok(Some(((self.current >> self.remaining) & 1) as u32))
    }

    /// Returns the next bit, failing on the physical end of the stream.
    pub fn read_strict(&mut self) -> Result<u32> {
        self.read()?.ok_or(Error::UnexpectedEnd)
    }

    /// Reads a `num_bits`-wide integer, most significant bit first. The
    /// stream must physically contain all the bits.
    pub fn read_int(&mut self, num_bits: u32) -> Result<u32> {
        debug_assert!(num_bits <= 32);
        let mut value = 0;
        for _ in 0..num_bits {
            value = (value << 1) | self.read_strict()?;
        }
        Ok(value)
    }
}
