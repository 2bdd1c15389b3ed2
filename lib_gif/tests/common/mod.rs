#![allow(dead_code)]

/// Hand-assembled 4-color, single-frame container used across the
/// integration tests. The compressed pixel payload is opaque filler;
/// the structural codec never interprets it.
pub fn test_gif_bytes() -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"GIF89a");
    bytes.extend_from_slice(&4u16.to_le_bytes()); // width
    bytes.extend_from_slice(&4u16.to_le_bytes()); // height
    bytes.push(0x81); // global table present, 2 << 1 = 4 entries
    bytes.push(0x00); // background index
    bytes.push(0x00); // aspect ratio
    for color in TEST_PALETTE {
        bytes.extend_from_slice(&color);
    }
    // Graphic control extension.
    bytes.extend_from_slice(&[0x21, 0xF9, 0x04, 0x00, 0x0A, 0x00, 0x00, 0x00]);
    // Image descriptor at (0,0), 4x4, no local table.
    bytes.push(0x2C);
    bytes.extend_from_slice(&0u16.to_le_bytes());
    bytes.extend_from_slice(&0u16.to_le_bytes());
    bytes.extend_from_slice(&4u16.to_le_bytes());
    bytes.extend_from_slice(&4u16.to_le_bytes());
    bytes.push(0x00);
    bytes.push(0x02); // LZW minimum code size
    bytes.extend_from_slice(&[0x02, 0x4C, 0x01, 0x00]); // one sub-block + terminator
    bytes.push(0x3B);
    bytes
}

pub const TEST_PALETTE: [[u8; 3]; 4] = [
    [0, 0, 0],
    [255, 255, 255],
    [10, 10, 10],
    [128, 128, 128],
];

pub const TEST_DECLARATION: &str = r#"const uint8_t sad_map[] = {
    0x01, 0x02, 0x03
};

const lv_img_dsc_t sad = {
  .header.w = 4,
  .header.h = 4,
  .data_size = 3,
  .data = sad_map,
};
"#;
