use super::format::{Block, Gif, TRAILER};
use log::{debug, error, info};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("Color table holds {actual} entries but the packed field implies {expected}")]
    PaletteSizeMismatch { expected: usize, actual: usize },
}

/// Serializes a container back to bytes. Decoding and re-encoding an
/// untouched container reproduces the original byte sequence exactly.
pub fn encode(gif: &Gif) -> Result<Vec<u8>, EncodeError> {
    if gif.palette.len() != gif.palette_len() {
        error!(
            "Palette size {} does not match packed field (expected {})",
            gif.palette.len(),
            gif.palette_len()
        );
        return Err(EncodeError::PaletteSizeMismatch {
            expected: gif.palette_len(),
            actual: gif.palette.len(),
        });
    }

    let mut out = Vec::new();

    out.extend_from_slice(gif.version.signature());
    out.extend_from_slice(&gif.width.to_le_bytes());
    out.extend_from_slice(&gif.height.to_le_bytes());
    out.push(gif.packed);
    out.push(gif.background_index);
    out.push(gif.aspect_ratio);
    debug!(
        "Header written: {:?}, {}x{}, packed=0x{:02x}",
        gif.version, gif.width, gif.height, gif.packed
    );

    for color in &gif.palette {
        out.extend_from_slice(color);
    }
    debug!("Color table written with {} entries", gif.palette.len());

    for block in &gif.blocks {
        match block {
            Block::Extension(raw) | Block::Image(raw) => out.extend_from_slice(raw),
        }
    }
    out.push(TRAILER);

    info!("Encoded container: {} bytes", out.len());
    Ok(out)
}
