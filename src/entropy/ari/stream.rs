/*!

The on-disk container for order-0 arithmetic coded streams.

A compressed stream is a fixed 1024-byte header followed by the coder's bit
stream. The header holds 256 big-endian 32-bit counts, one per byte value,
exactly as observed in the input. Symbol 256 is the reserved end-of-stream
sentinel; it is never serialized and is reconstructed with a count of one
on decode, so both sides derive the same cumulative ordering.

The payload codes every input byte, then the sentinel, then a single 1 bit
that keeps the trailing zero padding unambiguous. The coder state width is
32 bits; that is a constant of the format, not a parameter.

The header path reads strictly and fails on a truncated stream, while the
coder path deliberately treats bits past the physical end as zeros. Both
behaviors are required for the format to round-trip.

*/

use std::io::{Read, Write};

use log::{debug, info};

use crate::bitio::{BitReader, BitWriter};
use crate::error::Result;

use super::{Decoder, Encoder, Frequency, FrequencyTable, Model, Symbol};

/// 256 byte values plus the end-of-stream sentinel.
const SYMBOL_LIMIT: usize = 257;
/// The reserved end-of-stream symbol.
const EOF_SYMBOL: Symbol = 256;
/// Coder state width used by the format.
const STATE_BITS: u32 = 32;
/// Width of one serialized header count.
const COUNT_BITS: u32 = 32;

fn count_frequencies(input: &[u8]) -> Result<FrequencyTable> {
    let mut counts = vec![0 as Frequency; SYMBOL_LIMIT];
    for &byte in input {
        counts[byte as usize] += 1;
    }
    counts[EOF_SYMBOL] = 1;
    FrequencyTable::new(counts)
}

fn write_frequencies<W: Write>(output: &mut BitWriter<W>, freqs: &FrequencyTable) -> Result<()> {
    for symbol in 0..SYMBOL_LIMIT - 1 {
        output.write_int(COUNT_BITS, freqs.get(symbol)?)?;
    }
    Ok(())
}

fn read_frequencies<R: Read>(input: &mut BitReader<R>) -> Result<FrequencyTable> {
    let mut counts = Vec::with_capacity(SYMBOL_LIMIT);
    for _ in 0..SYMBOL_LIMIT - 1 {
        counts.push(input.read_int(COUNT_BITS)?);
    }
    counts.push(1);
    FrequencyTable::new(counts)
}

/// Compresses `input` into the container format, returning the output
/// stream once the bit stream is finished and flushed.
///
/// The input is scanned twice, once to build the frequency header and once
/// to code the bytes, which is why it arrives as a slice rather than a
/// reader.
pub fn compress<W: Write>(input: &[u8], output: W) -> Result<W> {
    let freqs = count_frequencies(input)?;
    debug!(
        "counted {} input bytes, frequency total {}",
        input.len(),
        freqs.total()
    );

    let mut writer = BitWriter::new(output);
    write_frequencies(&mut writer, &freqs)?;

    let mut encoder = Encoder::new(STATE_BITS, writer)?;
    for &byte in input {
        encoder.write(&freqs, byte as Symbol)?;
    }
    encoder.write(&freqs, EOF_SYMBOL)?;
    let (writer, result) = encoder.finish();
    result?;
    let (output, result) = writer.finish();
    result?;

    info!("compressed {} bytes", input.len());
    Ok(output)
}

/// Decompresses a container stream, writing the restored bytes into
/// `output` and returning it. Nothing is written if the header or the
/// payload is rejected.
pub fn decompress<R: Read, W: Write>(input: R, mut output: W) -> Result<W> {
    let mut reader = BitReader::new(input);
    let freqs = read_frequencies(&mut reader)?;
    debug!("header declares frequency total {}", freqs.total());

    let mut decoder = Decoder::new(STATE_BITS, reader)?;
    let mut written: u64 = 0;
    loop {
        let symbol = decoder.read(&freqs)?;
        if symbol == EOF_SYMBOL {
            break;
        }
        output.write_all(&[symbol as u8])?;
        written += 1;
    }

    info!("decompressed {} bytes", written);
    Ok(output)
}
