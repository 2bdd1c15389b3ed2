//! Re-quantization of synthesized full-color frames back to a bounded
//! indexed palette, built from the observed color distribution of the
//! frame. Frames that exceed the bound keep their most frequent colors
//! and map the rest to the nearest surviving entry.

use log::{debug, info};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuantizeError {
    #[error("Invalid pixel data length: expected multiple of 4 bytes, got {0}")]
    InvalidPixelDataLength(usize),
    #[error("Color bound {0} outside the supported 1..=256 range")]
    InvalidColorBound(usize),
}

pub struct Quantized {
    pub palette: Vec<[u8; 4]>,
    pub indices: Vec<u8>,
}

impl Quantized {
    /// Expands the indices back into raw RGBA pixel data.
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut pixels = Vec::with_capacity(self.indices.len() * 4);
        for &index in &self.indices {
            pixels.extend_from_slice(&self.palette[index as usize]);
        }
        pixels
    }
}

/// Quantizes a raw RGBA buffer to at most `max_colors` palette
/// entries. When the frame holds no more unique colors than the bound,
/// every pixel survives exactly.
pub fn quantize(pixels: &[u8], max_colors: usize) -> Result<Quantized, QuantizeError> {
    if pixels.len() % 4 != 0 {
        return Err(QuantizeError::InvalidPixelDataLength(pixels.len()));
    }
    if max_colors == 0 || max_colors > 256 {
        return Err(QuantizeError::InvalidColorBound(max_colors));
    }

    // Observed color distribution, in first-seen order for determinism.
    let mut counts: HashMap<[u8; 4], (usize, usize)> = HashMap::new();
    for pixel in pixels.chunks_exact(4) {
        let color = [pixel[0], pixel[1], pixel[2], pixel[3]];
        let order = counts.len();
        counts.entry(color).or_insert((order, 0)).1 += 1;
    }
    debug!("Frame holds {} unique colors", counts.len());

    let mut ranked: Vec<([u8; 4], usize, usize)> = counts
        .iter()
        .map(|(&color, &(order, count))| (color, order, count))
        .collect();
    // Most frequent first; first-seen order breaks ties.
    ranked.sort_by(|a, b| b.2.cmp(&a.2).then(a.1.cmp(&b.1)));

    let palette: Vec<[u8; 4]> = ranked
        .iter()
        .take(max_colors)
        .map(|&(color, _, _)| color)
        .collect();

    let mut lookup: HashMap<[u8; 4], u8> = HashMap::with_capacity(palette.len());
    for (index, &color) in palette.iter().enumerate() {
        lookup.insert(color, index as u8);
    }

    let mut indices = Vec::with_capacity(pixels.len() / 4);
    for pixel in pixels.chunks_exact(4) {
        let color = [pixel[0], pixel[1], pixel[2], pixel[3]];
        let index = match lookup.get(&color) {
            Some(&index) => index,
            None => {
                let index = nearest(&palette, color);
                lookup.insert(color, index);
                index
            }
        };
        indices.push(index);
    }

    info!(
        "Quantized {} pixels to {} palette entries",
        indices.len(),
        palette.len()
    );
    Ok(Quantized { palette, indices })
}

fn nearest(palette: &[[u8; 4]], color: [u8; 4]) -> u8 {
    let mut best = 0usize;
    let mut best_distance = u32::MAX;
    for (index, entry) in palette.iter().enumerate() {
        let distance: u32 = entry
            .iter()
            .zip(color.iter())
            .map(|(&a, &b)| {
                let d = i32::from(a) - i32::from(b);
                (d * d) as u32
            })
            .sum();
        if distance < best_distance {
            best_distance = distance;
            best = index;
        }
    }
    best as u8
}
