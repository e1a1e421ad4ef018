use byteorder::{BigEndian, ByteOrder};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::bitio::{BitReader, BitWriter};
use crate::error::Error;

use super::{compress, decompress, Checked, CoderState, Decoder, Encoder, FrequencyTable, Model, Symbol};

static TEXT_INPUT: &[u8] = include_bytes!("../../../data/test.txt");

fn roundtrip(bytes: &[u8]) -> Vec<u8> {
    let compressed = compress(bytes, Vec::new()).unwrap();
    // 1024 header bytes plus at least the terminating 1 bit
    assert!(compressed.len() >= 1025);
    let decoded = decompress(&compressed[..], Vec::new()).unwrap();
    assert_eq!(bytes, &decoded[..]);
    compressed
}

fn header_count(compressed: &[u8], byte: u8) -> u32 {
    let offset = byte as usize * 4;
    BigEndian::read_u32(&compressed[offset..offset + 4])
}

fn raw_roundtrip(num_bits: u32, model: &impl Model, symbols: &[Symbol]) {
    let sentinel = model.symbol_count() - 1;
    let mut encoder = Encoder::new(num_bits, BitWriter::new(Vec::new())).unwrap();
    for &symbol in symbols {
        encoder.write(model, symbol).unwrap();
    }
    encoder.write(model, sentinel).unwrap();
    let (writer, result) = encoder.finish();
    result.unwrap();
    let (bytes, result) = writer.finish();
    result.unwrap();

    let mut decoder = Decoder::new(num_bits, BitReader::new(&bytes[..])).unwrap();
    for &symbol in symbols {
        assert_eq!(decoder.read(model).unwrap(), symbol);
    }
    assert_eq!(decoder.read(model).unwrap(), sentinel);
}

#[test]
fn roundtrips() {
    roundtrip(b"");
    roundtrip(b"A");
    roundtrip(b"AAAA");
    roundtrip(b"abracadabra");
    roundtrip(TEXT_INPUT);
}

#[test]
fn roundtrips_random_data() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..10 {
        let len = rng.gen_range(0..4096);
        let mut bytes = vec![0u8; len];
        rng.fill(&mut bytes[..]);
        roundtrip(&bytes);
    }
}

#[test]
fn roundtrips_biased_data() {
    let mut rng = StdRng::seed_from_u64(1337);
    let bytes: Vec<u8> = (0..65536)
        .map(|_| if rng.gen_bool(0.99) { 0x00 } else { rng.gen() })
        .collect();
    let compressed = roundtrip(&bytes);
    // entropy of the 99% bias is well under one bit per byte
    assert!(compressed.len() < 1024 + 65536 / 8);
}

#[test]
fn roundtrips_all_byte_values() {
    let bytes: Vec<u8> = (0..=255).collect();
    let compressed = roundtrip(&bytes);
    for byte in 0..=255u8 {
        assert_eq!(header_count(&compressed, byte), 1);
    }
    // a uniform distribution costs eight bits per symbol, less the few
    // trailing bits the coder keeps in its state at finish
    assert!(compressed.len() >= 1024 + 250);
    assert!(compressed.len() <= 1024 + 300);
}

#[test]
fn empty_input_layout() {
    let compressed = roundtrip(b"");
    assert_eq!(compressed.len(), 1025);
    assert!(compressed[..1024].iter().all(|&b| b == 0));
    // only the sentinel is coded, emitting no bits; the payload is the
    // terminating 1 bit plus padding
    assert_eq!(compressed[1024], 0x80);
}

#[test]
fn single_byte_header() {
    let compressed = roundtrip(b"A");
    for byte in 0..=255u8 {
        let expected = if byte == 0x41 { 1 } else { 0 };
        assert_eq!(header_count(&compressed, byte), expected);
    }
}

#[test]
fn repeated_byte_header() {
    let compressed = roundtrip(b"AAAA");
    assert_eq!(header_count(&compressed, 0x41), 4);
    assert!(compressed.len() <= 1024 + 4);
}

#[test]
fn text_header_counts() {
    let compressed = roundtrip(b"abracadabra");
    assert_eq!(header_count(&compressed, b'a'), 5);
    assert_eq!(header_count(&compressed, b'b'), 2);
    assert_eq!(header_count(&compressed, b'r'), 2);
    assert_eq!(header_count(&compressed, b'c'), 1);
    assert_eq!(header_count(&compressed, b'd'), 1);
    assert_eq!(header_count(&compressed, b'e'), 0);
}

#[test]
fn skewed_run_stays_tiny() {
    let bytes = vec![0x41u8; 100_000];
    let compressed = roundtrip(&bytes);
    assert!(compressed.len() < 1024 + 64);
}

#[test]
fn corrupt_header_total_rejected() {
    let mut file = vec![0u8; 1024];
    BigEndian::write_u32(&mut file[..4], 0x7fff_ffff);
    file.extend_from_slice(&[0x80, 0x00, 0x00, 0x00, 0x00]);

    let mut out = Vec::new();
    let result = decompress(&file[..], &mut out);
    assert!(matches!(result, Err(Error::ModelTooLarge(_))));
    assert!(out.is_empty());
}

#[test]
fn truncated_header_rejected() {
    let file = vec![0u8; 100];
    let mut out = Vec::new();
    let result = decompress(&file[..], &mut out);
    assert!(matches!(result, Err(Error::UnexpectedEnd)));
    assert!(out.is_empty());
}

#[test]
fn state_width_bounds() {
    assert!(CoderState::new(1).is_ok());
    assert!(CoderState::new(32).is_ok());
    assert!(matches!(CoderState::new(0), Err(Error::InvalidStateWidth(0))));
    assert!(matches!(
        CoderState::new(33),
        Err(Error::InvalidStateWidth(33))
    ));
    assert!(Encoder::new(0, BitWriter::new(Vec::new())).is_err());
    assert!(Decoder::new(33, BitReader::new(&b""[..])).is_err());
}

#[test]
fn zero_frequency_rejected_on_encode() {
    let model = FrequencyTable::new(vec![1, 0, 3]).unwrap();
    let mut encoder = Encoder::new(32, BitWriter::new(Vec::new())).unwrap();
    encoder.write(&model, 0).unwrap();
    assert!(matches!(
        encoder.write(&model, 1),
        Err(Error::ZeroFrequency(1))
    ));
}

#[test]
fn oversized_total_rejected_on_encode() {
    // MAX_TOTAL for a 16-bit state is 2^14 + 2
    let model = FrequencyTable::new(vec![20_000, 1]).unwrap();
    let mut encoder = Encoder::new(16, BitWriter::new(Vec::new())).unwrap();
    assert!(matches!(
        encoder.write(&model, 0),
        Err(Error::ModelTooLarge(20_001))
    ));
}

#[test]
fn narrow_widths_roundtrip() {
    let model = FrequencyTable::flat(17).unwrap();
    let mut rng = StdRng::seed_from_u64(11);
    let symbols: Vec<Symbol> = (0..2000).map(|_| rng.gen_range(0..16)).collect();
    raw_roundtrip(8, &model, &symbols);
    raw_roundtrip(16, &model, &symbols);
    raw_roundtrip(32, &model, &symbols);
}

#[test]
fn checked_model_codes_cleanly() {
    let model = Checked::new(FrequencyTable::new(vec![5, 1, 0, 2, 1]).unwrap());
    let mut rng = StdRng::seed_from_u64(23);
    let symbols: Vec<Symbol> = (0..500).map(|_| [0, 1, 3][rng.gen_range(0..3)]).collect();
    raw_roundtrip(32, &model, &symbols);
}
