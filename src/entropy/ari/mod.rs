/*!

Order-0 static arithmetic coder.

The encoder and decoder share one finite-precision interval algorithm: each
coded symbol narrows `[low, high]` to the sub-interval the model assigns to
it, identical top bits are shifted out (E1/E2 renormalization), and an
interval straddling the midpoint inside the middle half defers bits until
the next renormalization resolves their value (E3 underflow). The decoder
mirrors every shift on a `code` register holding the most recent state-width
bits of input, so both sides walk the exact same interval sequence.

Models plug in through the [`Model`] trait; [`table::FrequencyTable`] is
the concrete count-vector implementation and [`stream`] layers the on-disk
container (frequency header plus bit stream) over the coder.

# Links

http://en.wikipedia.org/wiki/Arithmetic_coding

# Example

```rust
use order0::entropy::ari;

let input = b"abracadabra";
let compressed = ari::compress(input, Vec::new()).unwrap();
let restored = ari::decompress(&compressed[..], Vec::new()).unwrap();
assert_eq!(&restored[..], input);
```

*/

use std::io::{Read, Write};

use log::trace;

use crate::bitio::{BitReader, BitWriter};
use crate::error::{Error, Result};

pub use self::stream::{compress, decompress};
pub use self::table::{Checked, FrequencyTable};

pub mod stream;
pub mod table;
#[cfg(test)]
mod test;

/// A value the coder can code, in `[0, symbol_count)`.
pub type Symbol = usize;
/// A single symbol's occurrence count.
pub type Frequency = u32;
/// An interval bound or cumulative frequency. Wide enough to hold the
/// products of a frequency total and a full-width range without overflow.
pub type Border = u64;

/// A source of cumulative probability ranges for the coder.
///
/// The cumulative bounds partition `[0, total)`: symbol `s` owns
/// `[low(s), high(s))` and `high(s) - low(s)` is its frequency. A model is
/// conceptually immutable while a coding session runs; mutating it between
/// symbols desynchronizes encoder and decoder.
pub trait Model {
    /// Returns the number of symbols the model covers.
    fn symbol_count(&self) -> usize;
    /// Returns the frequency of a symbol.
    fn get(&self, symbol: Symbol) -> Result<Frequency>;
    /// Replaces the frequency of a symbol.
    fn set(&mut self, symbol: Symbol, freq: Frequency) -> Result<()>;
    /// Adds one to the frequency of a symbol.
    fn increment(&mut self, symbol: Symbol) -> Result<()>;
    /// Returns the sum of all frequencies.
    fn total(&self) -> Border;
    /// Returns the cumulative frequency below `symbol`.
    fn low(&self, symbol: Symbol) -> Result<Border>;
    /// Returns the cumulative frequency up to and including `symbol`.
    fn high(&self, symbol: Symbol) -> Result<Border>;
    /// Returns the symbol owning `value`, which must be below `total()`:
    /// the unique `s` with `low(s) <= value < high(s)`.
    fn symbol_for(&self, value: Border) -> Symbol;
}

/// The finite-precision interval shared by encoder and decoder.
///
/// Parameterized over the state width in bits; the file format pins the
/// width to 32, which is also the widest the `u64` interval arithmetic
/// admits without overflow.
pub struct CoderState {
    num_bits: u32,
    full: Border,
    half: Border,
    quarter: Border,
    min_range: Border,
    max_total: Border,
    mask: Border,
    low: Border,
    high: Border,
}

impl CoderState {
    /// Creates the initial full-width interval for a `num_bits`-bit coder.
    pub fn new(num_bits: u32) -> Result<CoderState> {
        if !(1..=32).contains(&num_bits) {
            return Err(Error::InvalidStateWidth(num_bits));
        }
        let full: Border = 1 << num_bits;
        let half = full >> 1;
        let quarter = half >> 1;
        let mask = full - 1;
        Ok(CoderState {
            num_bits,
            full,
            half,
            quarter,
            min_range: quarter + 2,
            max_total: quarter + 2,
            mask,
            low: 0,
            high: mask,
        })
    }

    /// Narrows the interval to the sub-range the model assigns to `symbol`.
    fn narrow<M: Model>(&mut self, model: &M, symbol: Symbol) -> Result<()> {
        debug_assert!(self.low < self.high);
        debug_assert!(self.low & self.mask == self.low);
        debug_assert!(self.high & self.mask == self.high);
        let range = self.high - self.low + 1;
        debug_assert!(self.min_range <= range && range <= self.full);

        let total = model.total();
        if total > self.max_total {
            return Err(Error::ModelTooLarge(total));
        }
        let sym_low = model.low(symbol)?;
        let sym_high = model.high(symbol)?;
        if sym_low == sym_high {
            return Err(Error::ZeroFrequency(symbol));
        }

        // total <= quarter + 2 and range <= full, so the products stay
        // below 2^63 for every admissible width
        let new_low = self.low + sym_low * range / total;
        let new_high = self.low + sym_high * range / total - 1;
        self.low = new_low;
        self.high = new_high;
        Ok(())
    }

    /// True while `low` and `high` agree in their top bit.
    fn half_matched(&self) -> bool {
        (self.low ^ self.high) & self.half == 0
    }

    /// The bit shifted out by the next renormalization step.
    fn top_bit(&self) -> u32 {
        (self.low >> (self.num_bits - 1)) as u32
    }

    /// One E1/E2 renormalization shift.
    fn shift_out(&mut self) {
        self.low = (self.low << 1) & self.mask;
        self.high = ((self.high << 1) & self.mask) | 1;
    }

    /// True while the interval straddles the midpoint within the middle
    /// half: `low` has the quarter bit set and `high` has it clear.
    fn middle_straddled(&self) -> bool {
        self.low & !self.high & self.quarter != 0
    }

    /// One E3 straddle shift.
    fn shift_middle(&mut self) {
        self.low = (self.low << 1) ^ self.half;
        self.high = ((self.high ^ self.half) << 1) | self.half | 1;
    }
}

/// Codes a stream of symbols into a bit stream.
pub struct Encoder<W: Write> {
    state: CoderState,
    output: BitWriter<W>,
    /// Bits deferred by the straddle rule, emitted inverted after the next
    /// renormalized bit.
    pending: u64,
}

impl<W: Write> Encoder<W> {
    /// Creates an encoder of the given state width emitting into `output`.
    pub fn new(num_bits: u32, output: BitWriter<W>) -> Result<Encoder<W>> {
        Ok(Encoder {
            state: CoderState::new(num_bits)?,
            output,
            pending: 0,
        })
    }

    /// Codes one symbol under the model.
    pub fn write<M: Model>(&mut self, model: &M, symbol: Symbol) -> Result<()> {
        trace!("encoding symbol {}", symbol);
        self.state.narrow(model, symbol)?;
        while self.state.half_matched() {
            let bit = self.state.top_bit();
            self.output.write(bit)?;
            for _ in 0..self.pending {
                self.output.write(bit ^ 1)?;
            }
            self.pending = 0;
            self.state.shift_out();
        }
        while self.state.middle_straddled() {
            self.pending += 1;
            self.state.shift_middle();
        }
        Ok(())
    }

    /// Terminates the stream with a single 1 bit and returns the bit
    /// writer. The bit disambiguates the final code bits from the zero
    /// padding the writer adds on close; the caller must have coded its
    /// end-of-stream symbol last, or decoding will never terminate.
    pub fn finish(mut self) -> (BitWriter<W>, Result<()>) {
        let result = self.output.write(1);
        (self.output, result)
    }
}

/// Decodes a stream of symbols from a bit stream.
pub struct Decoder<R: Read> {
    state: CoderState,
    input: BitReader<R>,
    /// The most recent `num_bits` input bits.
    code: Border,
}

impl<R: Read> Decoder<R> {
    /// Creates a decoder of the given state width, priming the code
    /// register with `num_bits` bits from `input`.
    pub fn new(num_bits: u32, input: BitReader<R>) -> Result<Decoder<R>> {
        let mut decoder = Decoder {
            state: CoderState::new(num_bits)?,
            input,
            code: 0,
        };
        for _ in 0..num_bits {
            decoder.code = (decoder.code << 1) | decoder.next_bit()?;
        }
        Ok(decoder)
    }

    /// Reads a code bit, treating the physical end of the stream as an
    /// endless run of zero bits.
    fn next_bit(&mut self) -> Result<Border> {
        Ok(self.input.read()?.unwrap_or(0) as Border)
    }

    /// Decodes the next symbol under the model.
    pub fn read<M: Model>(&mut self, model: &M) -> Result<Symbol> {
        let total = model.total();
        if total > self.state.max_total {
            return Err(Error::ModelTooLarge(total));
        }
        let range = self.state.high - self.state.low + 1;
        let offset = self.code - self.state.low;
        // the saturation only fires for an all-zero table, which narrow()
        // rejects below as a zero-frequency symbol
        let value = ((offset + 1) * total).saturating_sub(1) / range;
        debug_assert!(value * range / total.max(1) <= offset);
        debug_assert!(total == 0 || value < total);

        let symbol = model.symbol_for(value);
        trace!("decoding value {} as symbol {}", value, symbol);
        self.state.narrow(model, symbol)?;
        while self.state.half_matched() {
            let bit = self.next_bit()?;
            self.code = ((self.code << 1) & self.state.mask) | bit;
            self.state.shift_out();
        }
        while self.state.middle_straddled() {
            let bit = self.next_bit()?;
            self.code = (self.code & self.state.half)
                | ((self.code << 1) & (self.state.mask >> 1))
                | bit;
            self.state.shift_middle();
        }
        if self.code < self.state.low || self.code > self.state.high {
            return Err(Error::StateCorrupt);
        }
        Ok(symbol)
    }
}
