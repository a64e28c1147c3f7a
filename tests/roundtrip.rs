use std::fs;
use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use huffpress::header::{Header, Payload};
use huffpress::{CodeTable, FrequencyTable, HuffError, decode_bytes, decode_file, encode_bytes, encode_file};

fn scratch(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("huffpress-it-{}-{name}", std::process::id()))
}

fn header_line(encoded: &[u8]) -> &str {
    let end = encoded.iter().position(|&b| b == b'\n').unwrap() + 1;
    std::str::from_utf8(&encoded[..end]).unwrap()
}

#[test]
fn random_inputs_round_trip() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..50 {
        let len = rng.gen_range(0..4096);
        let alphabet = rng.gen_range(1..=256usize);
        let data: Vec<u8> = (0..len).map(|_| rng.gen_range(0..alphabet) as u8).collect();
        let encoded = encode_bytes(&data).unwrap();
        assert_eq!(decode_bytes(&encoded).unwrap(), data);
    }
}

#[test]
fn skewed_input_compresses() {
    let mut rng = StdRng::seed_from_u64(7);
    let data: Vec<u8> = (0..20_000)
        .map(|_| if rng.gen_bool(0.9) { b'e' } else { rng.gen_range(b'a'..=b'z') })
        .collect();
    let encoded = encode_bytes(&data).unwrap();
    assert!(encoded.len() < data.len() / 2);
    assert_eq!(decode_bytes(&encoded).unwrap(), data);
}

#[test]
fn empty_input_header_field_count() {
    let encoded = encode_bytes(b"").unwrap();
    let header = Header::parse(header_line(&encoded)).unwrap();
    assert!(header.field_count() <= 3);
    assert!(decode_bytes(&encoded).unwrap().is_empty());
}

#[test]
fn repeated_input_header_field_count() {
    let encoded = encode_bytes(b"!!!!!").unwrap();
    assert_eq!(header_line(&encoded).len(), encoded.len());
    let header = Header::parse(header_line(&encoded)).unwrap();
    assert_eq!(header.field_count(), 5);
    assert_eq!(decode_bytes(&encoded).unwrap(), b"!!!!!");
}

#[test]
fn single_byte_input_round_trips() {
    let encoded = encode_bytes(b"x").unwrap();
    assert_eq!(encoded, b"0 1 120 1 \n");
    let header = Header::parse(header_line(&encoded)).unwrap();
    assert_eq!(header.payload(), Payload::Repeated { byte: b'x', count: 1 });
    assert_eq!(decode_bytes(&encoded).unwrap(), b"x");

    let encoded = encode_bytes(b"\0").unwrap();
    assert_eq!(decode_bytes(&encoded).unwrap(), b"\0");
}

#[test]
fn codes_rebuilt_from_header_match_encoder() {
    let data = b"independent invocations agree on every code";
    let encoder_side = CodeTable::from_frequencies(&FrequencyTable::from_bytes(data).with_sentinel()).unwrap();

    let encoded = encode_bytes(data).unwrap();
    let header = Header::parse(header_line(&encoded)).unwrap();
    let decoder_side = CodeTable::from_frequencies(header.table()).unwrap();

    let a: Vec<_> = encoder_side.iter().map(|(b, c)| (b, c.to_string())).collect();
    let b: Vec<_> = decoder_side.iter().map(|(b, c)| (b, c.to_string())).collect();
    assert_eq!(a, b);
}

#[test]
fn file_round_trip_with_text_rendition() {
    let input = scratch("input.txt");
    let packed = scratch("packed.huff");
    let text = scratch("packed.txt");
    let output = scratch("output.txt");
    let data = b"It was the best of times, it was the worst of times.\n\0binary tail \xff\xfe";
    fs::write(&input, data).unwrap();

    let summary = encode_file(&input, &packed, Some(&text)).unwrap();
    assert_eq!(summary.input_bytes, data.len() as u64);
    assert_eq!(summary.output_bytes, fs::metadata(&packed).unwrap().len());

    let rendition = fs::read_to_string(&text).unwrap();
    let packed_bytes = fs::read(&packed).unwrap();
    let (head, bits) = rendition.split_once('\n').unwrap();
    assert_eq!(format!("{head}\n"), header_line(&packed_bytes));
    assert!(bits.chars().all(|c| c == '0' || c == '1'));
    assert_eq!(bits.len().div_ceil(8) + head.len() + 1, packed_bytes.len());

    decode_file(&packed, &output).unwrap();
    assert_eq!(fs::read(&output).unwrap(), data);

    for path in [&input, &packed, &text, &output] {
        fs::remove_file(path).unwrap();
    }
}

#[test]
fn failed_decode_leaves_no_output() {
    let input = scratch("corrupt.huff");
    let output = scratch("corrupt.out");
    fs::write(&input, b"0 1 97 2 98 x\n\x12").unwrap();

    let err = decode_file(&input, &output).unwrap_err();
    assert!(matches!(err, HuffError::MalformedHeader(_)));
    assert!(!output.exists());
    assert!(!scratch("corrupt.out.tmp").exists());

    fs::remove_file(&input).unwrap();
}
