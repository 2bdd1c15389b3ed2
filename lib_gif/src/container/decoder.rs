use super::format::{
    Block, Gif, Version, EXTENSION_INTRODUCER, IMAGE_SEPARATOR, SIGNATURE_87A, SIGNATURE_89A,
    TRAILER,
};
use log::{debug, error, info};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Unsupported or malformed signature")]
    InvalidSignature,
    #[error("Global color table bit is unset; the table cannot be located")]
    MissingColorTable,
    #[error("Unexpected end of data while reading the element at offset {0}")]
    UnexpectedEof(usize),
    #[error("Unknown block introducer 0x{introducer:02x} at offset {offset}")]
    UnknownBlock { introducer: u8, offset: usize },
    #[error("{0} trailing byte(s) after the trailer")]
    TrailingData(usize),
}

pub fn decode(data: &[u8]) -> Result<Gif, DecodeError> {
    let mut cursor = 0;

    // UnexpectedEof always names the offset of the element that could
    // not be completed.
    if data.len() < Gif::HEADER_SIZE {
        error!("Data too short for the header");
        return Err(DecodeError::UnexpectedEof(0));
    }
    if data.len() < Gif::HEADER_SIZE + Gif::SCREEN_DESCRIPTOR_SIZE {
        error!("Data too short for the screen descriptor");
        return Err(DecodeError::UnexpectedEof(Gif::HEADER_SIZE));
    }

    let version = if data.starts_with(&SIGNATURE_89A) {
        Version::Gif89a
    } else if data.starts_with(&SIGNATURE_87A) {
        Version::Gif87a
    } else {
        error!("Signature does not match either supported version");
        return Err(DecodeError::InvalidSignature);
    };
    debug!("Signature validated: {:?}", version);
    cursor += Gif::HEADER_SIZE;

    let width = u16::from_le_bytes([data[cursor], data[cursor + 1]]);
    let height = u16::from_le_bytes([data[cursor + 2], data[cursor + 3]]);
    let packed = data[cursor + 4];
    let background_index = data[cursor + 5];
    let aspect_ratio = data[cursor + 6];
    cursor += Gif::SCREEN_DESCRIPTOR_SIZE;
    debug!(
        "Screen descriptor: {}x{}, packed=0x{:02x}",
        width, height, packed
    );

    if packed & 0x80 == 0 {
        error!("No global color table present");
        return Err(DecodeError::MissingColorTable);
    }

    let palette_len = 2usize << (packed & 0x07);
    let palette_bytes = palette_len * 3;
    if cursor + palette_bytes > data.len() {
        error!("Unexpected end of data while reading the color table");
        return Err(DecodeError::UnexpectedEof(cursor));
    }
    let mut palette = Vec::with_capacity(palette_len);
    for entry in data[cursor..cursor + palette_bytes].chunks_exact(3) {
        palette.push([entry[0], entry[1], entry[2]]);
    }
    cursor += palette_bytes;
    debug!("Read {} color table entries", palette.len());

    let mut blocks = Vec::new();
    loop {
        let introducer = *data
            .get(cursor)
            .ok_or(DecodeError::UnexpectedEof(cursor))?;
        match introducer {
            EXTENSION_INTRODUCER => {
                let end = skip_extension(data, cursor)?;
                blocks.push(Block::Extension(data[cursor..end].to_vec()));
                cursor = end;
            }
            IMAGE_SEPARATOR => {
                let end = skip_image(data, cursor)?;
                blocks.push(Block::Image(data[cursor..end].to_vec()));
                cursor = end;
            }
            TRAILER => {
                cursor += 1;
                break;
            }
            _ => {
                error!(
                    "Unknown block introducer 0x{:02x} at offset {}",
                    introducer, cursor
                );
                return Err(DecodeError::UnknownBlock {
                    introducer,
                    offset: cursor,
                });
            }
        }
    }

    if cursor != data.len() {
        error!("{} byte(s) after the trailer", data.len() - cursor);
        return Err(DecodeError::TrailingData(data.len() - cursor));
    }

    info!(
        "Decoded container: {}x{}, {} colors, {} blocks",
        width,
        height,
        palette.len(),
        blocks.len()
    );

    Ok(Gif {
        version,
        width,
        height,
        packed,
        background_index,
        aspect_ratio,
        palette,
        blocks,
    })
}

/// Consumes an extension block starting at `start` (the 0x21
/// introducer) and returns the offset one past its terminator.
fn skip_extension(data: &[u8], start: usize) -> Result<usize, DecodeError> {
    // Introducer + label, then length-prefixed sub-blocks.
    let pos = start + 2;
    if pos > data.len() {
        return Err(DecodeError::UnexpectedEof(start));
    }
    let end = skip_sub_blocks(data, pos)?;
    debug!("Extension block spans {}..{}", start, end);
    Ok(end)
}

/// Consumes an image block starting at `start` (the 0x2C separator):
/// descriptor, optional local color table, LZW minimum code size, then
/// the compressed sub-blocks. The pixel payload is opaque here.
fn skip_image(data: &[u8], start: usize) -> Result<usize, DecodeError> {
    let mut pos = start + 10; // separator + 9-byte descriptor
    if pos > data.len() {
        return Err(DecodeError::UnexpectedEof(start));
    }

    let local_packed = data[start + 9];
    if local_packed & 0x80 != 0 {
        let local_len = 2usize << (local_packed & 0x07);
        pos += local_len * 3;
    }

    // LZW minimum code size byte.
    pos += 1;
    if pos > data.len() {
        return Err(DecodeError::UnexpectedEof(pos - 1));
    }

    let end = skip_sub_blocks(data, pos)?;
    debug!("Image block spans {}..{}", start, end);
    Ok(end)
}

fn skip_sub_blocks(data: &[u8], mut pos: usize) -> Result<usize, DecodeError> {
    loop {
        let length_at = pos;
        let len = *data
            .get(pos)
            .ok_or(DecodeError::UnexpectedEof(length_at))? as usize;
        pos += 1;
        if len == 0 {
            return Ok(pos);
        }
        pos += len;
        if pos > data.len() {
            // The length byte promised data past the end.
            return Err(DecodeError::UnexpectedEof(length_at));
        }
    }
}
