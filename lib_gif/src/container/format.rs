pub const SIGNATURE_87A: [u8; 6] = *b"GIF87a";
pub const SIGNATURE_89A: [u8; 6] = *b"GIF89a";

pub const TRAILER: u8 = 0x3B;
pub const EXTENSION_INTRODUCER: u8 = 0x21;
pub const IMAGE_SEPARATOR: u8 = 0x2C;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Version {
    Gif87a,
    Gif89a,
}

impl Version {
    pub fn signature(&self) -> &'static [u8; 6] {
        match self {
            Version::Gif87a => &SIGNATURE_87A,
            Version::Gif89a => &SIGNATURE_89A,
        }
    }
}

/// A data block following the global color table. The payload is kept
/// as the raw byte span (introducer included) so that re-encoding an
/// untouched container is bit-exact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Extension(Vec<u8>),
    Image(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gif {
    pub version: Version,
    pub width: u16,
    pub height: u16,
    pub packed: u8,
    pub background_index: u8,
    pub aspect_ratio: u8,
    pub palette: Vec<[u8; 3]>,
    pub blocks: Vec<Block>,
}

impl Gif {
    pub const HEADER_SIZE: usize = 6;
    pub const SCREEN_DESCRIPTOR_SIZE: usize = 7;

    /// Number of global color table entries implied by the packed
    /// field. Always `2 << (packed & 0x07)` when the table is present.
    pub fn palette_len(&self) -> usize {
        2 << (self.packed & 0x07) as usize
    }

    pub fn has_global_palette(&self) -> bool {
        self.packed & 0x80 != 0
    }

    pub fn frame_count(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| matches!(b, Block::Image(_)))
            .count()
    }
}
