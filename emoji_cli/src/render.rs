//! Overlay mode: the compressed pixel payload cannot be edited in
//! place, so every frame is decompressed to full color, shaded, then
//! re-quantized and re-encoded. Frame decompression and recompression
//! are delegated to the `image` crate.

use image::codecs::gif::{GifDecoder, GifEncoder, Repeat};
use image::{AnimationDecoder, Frame, RgbaImage};
use lib_gif::constants::MAX_PALETTE_COLORS;
use lib_gif::overlay::{self, Effect};
use lib_gif::quantize::{self, QuantizeError};
use log::{debug, info};
use std::io::Cursor;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Frame decode/encode failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("Re-quantization failed: {0}")]
    Quantize(#[from] QuantizeError),
    #[error("Quantized frame no longer matches its dimensions")]
    FrameRebuild,
    #[error("The animation holds no frames")]
    EmptyAnimation,
}

/// Paints `effect` over every frame of a GIF and returns the
/// re-encoded byte sequence. Frames are independent; each output pixel
/// depends only on its position, the frame index and the frame count.
pub fn overlay_gif(gif_bytes: &[u8], effect: &Effect) -> Result<Vec<u8>, RenderError> {
    let decoder = GifDecoder::new(Cursor::new(gif_bytes))?;
    let frames = decoder.into_frames().collect_frames()?;
    if frames.is_empty() {
        return Err(RenderError::EmptyAnimation);
    }
    let frame_count = frames.len();
    let mut shaded = Vec::with_capacity(frame_count);
    for (frame_idx, frame) in frames.into_iter().enumerate() {
        let delay = frame.delay();
        let (left, top) = (frame.left(), frame.top());
        let mut buffer = frame.into_buffer();
        let (width, height) = buffer.dimensions();

        overlay::apply(effect, &mut buffer, width, height, frame_idx, frame_count);

        // Bound the palette ourselves rather than trusting the encoder.
        let quantized = quantize::quantize(buffer.as_raw(), MAX_PALETTE_COLORS)?;
        debug!(
            "Frame {}: {} palette entries after quantization",
            frame_idx,
            quantized.palette.len()
        );
        let rebuilt = RgbaImage::from_raw(width, height, quantized.to_rgba())
            .ok_or(RenderError::FrameRebuild)?;
        shaded.push(Frame::from_parts(rebuilt, left, top, delay));
    }

    let mut out = Vec::new();
    {
        let mut encoder = GifEncoder::new(&mut out);
        encoder.set_repeat(Repeat::Infinite)?;
        encoder.encode_frames(shaded.into_iter())?;
    }
    info!("Re-encoded animation: {} bytes", out.len());
    Ok(out)
}
