mod common;

use common::{test_gif_bytes, TEST_PALETTE};
use lib_gif::container::decoder::DecodeError;
use lib_gif::{decode, encode};

#[test]
fn test_decode_structure() {
    let decoded = decode(&test_gif_bytes()).unwrap();

    assert_eq!(decoded.width, 4);
    assert_eq!(decoded.height, 4);
    assert!(decoded.has_global_palette());
    assert_eq!(decoded.palette_len(), 4);
    assert_eq!(decoded.palette, TEST_PALETTE);
    assert_eq!(decoded.frame_count(), 1);
    assert_eq!(decoded.blocks.len(), 2);
}

#[test]
fn test_round_trip_is_bit_exact() {
    let original = test_gif_bytes();
    let decoded = decode(&original).unwrap();
    let encoded = encode(&decoded).unwrap();
    assert_eq!(encoded, original);
}

#[test]
fn test_palette_edit_survives_round_trip() {
    let mut decoded = decode(&test_gif_bytes()).unwrap();
    // Every channel of the white entry moves, so exactly three bytes
    // of the encoding may change.
    decoded.palette[1] = [254, 215, 1];
    let encoded = encode(&decoded).unwrap();

    let reread = decode(&encoded).unwrap();
    assert_eq!(reread.palette[1], [254, 215, 1]);
    // Only the three palette bytes differ from the original.
    let original = test_gif_bytes();
    assert_eq!(encoded.len(), original.len());
    let diffs = encoded
        .iter()
        .zip(original.iter())
        .filter(|(a, b)| a != b)
        .count();
    assert_eq!(diffs, 3);
}

#[test]
fn test_shared_channels_keep_their_bytes() {
    // Recoloring white to gold leaves the red channel at 255; that
    // byte must survive untouched, so only two bytes change.
    let mut decoded = decode(&test_gif_bytes()).unwrap();
    decoded.palette[1] = [255, 215, 0];
    let encoded = encode(&decoded).unwrap();

    let original = test_gif_bytes();
    let diffs = encoded
        .iter()
        .zip(original.iter())
        .filter(|(a, b)| a != b)
        .count();
    assert_eq!(diffs, 2);
}

#[test]
fn test_bad_signature_is_rejected() {
    let mut bytes = test_gif_bytes();
    bytes[..6].copy_from_slice(b"GIF90a");
    assert!(matches!(decode(&bytes), Err(DecodeError::InvalidSignature)));
}

#[test]
fn test_missing_color_table_is_rejected() {
    let mut bytes = test_gif_bytes();
    bytes[10] &= 0x7F; // clear the global-table-present bit
    assert!(matches!(
        decode(&bytes),
        Err(DecodeError::MissingColorTable)
    ));
}

#[test]
fn test_truncated_data_is_rejected() {
    let bytes = test_gif_bytes();
    // Cutting the tail strands the image sub-block whose length byte
    // sits at offset 44; the error names that offset.
    let truncated = &bytes[..bytes.len() - 4];
    assert!(matches!(
        decode(truncated),
        Err(DecodeError::UnexpectedEof(44))
    ));
}

#[test]
fn test_truncation_inside_color_table_names_its_offset() {
    let bytes = test_gif_bytes();
    // The color table starts right after the 13-byte header and screen
    // descriptor; a cut inside it reports offset 13.
    let truncated = &bytes[..20];
    assert!(matches!(
        decode(truncated),
        Err(DecodeError::UnexpectedEof(13))
    ));
}

#[test]
fn test_trailing_bytes_are_rejected() {
    let mut bytes = test_gif_bytes();
    bytes.push(0x00);
    assert!(matches!(decode(&bytes), Err(DecodeError::TrailingData(1))));
}

#[test]
fn test_unknown_introducer_is_rejected() {
    let mut bytes = test_gif_bytes();
    let trailer_at = bytes.len() - 1;
    bytes[trailer_at] = 0x7E;
    bytes.push(0x3B);
    match decode(&bytes) {
        Err(DecodeError::UnknownBlock { introducer, offset }) => {
            assert_eq!(introducer, 0x7E);
            assert_eq!(offset, trailer_at);
        }
        other => panic!("expected UnknownBlock, got {:?}", other),
    }
}
