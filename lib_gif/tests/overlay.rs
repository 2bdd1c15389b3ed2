mod common;

use lib_gif::overlay::{apply, shade, Effect, FlameParams, TearParams};
use lib_gif::quantize::{quantize, QuantizeError};

const WIDTH: u32 = 240;
const HEIGHT: u32 = 240;
const FRAMES: usize = 30;

#[test]
fn test_flame_is_deterministic() {
    let effect = Effect::Flame(FlameParams::default());
    for (x, y) in [(0, 0), (120, 30), (239, 57)] {
        let a = shade(&effect, x, y, WIDTH, HEIGHT, 7, FRAMES);
        let b = shade(&effect, x, y, WIDTH, HEIGHT, 7, FRAMES);
        assert_eq!(a, b);
    }
}

#[test]
fn test_flame_stays_inside_its_band() {
    let effect = Effect::Flame(FlameParams::default());
    let band_bottom = (HEIGHT as f32 * 0.24) as u32;
    for frame in 0..FRAMES {
        for y in band_bottom..HEIGHT {
            for x in [0, 60, 120, 180, 239] {
                assert_eq!(shade(&effect, x, y, WIDTH, HEIGHT, frame, FRAMES), None);
            }
        }
    }
}

#[test]
fn test_flame_covers_every_column_at_the_band_base() {
    let effect = Effect::Flame(FlameParams::default());
    let band_bottom = (HEIGHT as f32 * 0.24) as u32;
    for x in 0..WIDTH {
        assert!(shade(&effect, x, band_bottom - 1, WIDTH, HEIGHT, 0, FRAMES).is_some());
    }
}

#[test]
fn test_frames_animate() {
    let effect = Effect::Flame(FlameParams::default());
    let mut distinct = false;
    let probe_y = (HEIGHT as f32 * 0.24) as u32 / 2;
    for x in 0..WIDTH {
        if shade(&effect, x, probe_y, WIDTH, HEIGHT, 0, FRAMES)
            != shade(&effect, x, probe_y, WIDTH, HEIGHT, FRAMES / 2, FRAMES)
        {
            distinct = true;
            break;
        }
    }
    assert!(distinct, "flame band did not move between frames");
}

#[test]
fn test_tears_fall_over_time() {
    let effect = Effect::Tears(TearParams::default());

    let lowest_hit = |frame: usize| -> Option<u32> {
        let mut lowest = None;
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                if shade(&effect, x, y, WIDTH, HEIGHT, frame, FRAMES).is_some() {
                    lowest = Some(y);
                }
            }
        }
        lowest
    };

    let early = lowest_hit(1).expect("no tear drawn early in the cycle");
    let late = lowest_hit(12).expect("no tear drawn mid-cycle");
    assert!(late > early, "teardrop did not descend: {} vs {}", early, late);
}

#[test]
fn test_tear_colors_come_from_params() {
    let params = TearParams::default();
    let effect = Effect::Tears(params.clone());
    let mut seen_base = false;
    let mut seen_highlight = false;
    for y in 0..HEIGHT {
        for x in 0..WIDTH {
            match shade(&effect, x, y, WIDTH, HEIGHT, 2, FRAMES) {
                Some(c) if c == params.color_base => seen_base = true,
                Some(c) if c == params.color_highlight => seen_highlight = true,
                Some(c) => panic!("unexpected overlay color {:?}", c),
                None => {}
            }
        }
    }
    assert!(seen_base);
    assert!(seen_highlight);
}

#[test]
fn test_apply_only_touches_overlay_pixels() {
    let effect = Effect::Flame(FlameParams::default());
    let mut buffer = vec![7u8; (WIDTH * HEIGHT * 4) as usize];
    apply(&effect, &mut buffer, WIDTH, HEIGHT, 0, FRAMES);

    for y in 0..HEIGHT {
        for x in 0..WIDTH {
            let at = ((y * WIDTH + x) * 4) as usize;
            let pixel = &buffer[at..at + 4];
            match shade(&effect, x, y, WIDTH, HEIGHT, 0, FRAMES) {
                Some(color) => {
                    assert_eq!(pixel, &[color[0], color[1], color[2], 255]);
                }
                None => assert_eq!(pixel, &[7, 7, 7, 7]),
            }
        }
    }
}

#[test]
fn test_quantize_exact_below_bound() {
    // Two unique colors; quantization must preserve every pixel.
    let mut pixels = Vec::new();
    for i in 0..64 {
        if i % 2 == 0 {
            pixels.extend_from_slice(&[255, 0, 0, 255]);
        } else {
            pixels.extend_from_slice(&[0, 0, 255, 255]);
        }
    }
    let quantized = quantize(&pixels, 256).unwrap();
    assert_eq!(quantized.palette.len(), 2);
    assert_eq!(quantized.to_rgba(), pixels);
}

#[test]
fn test_quantize_bounds_palette() {
    // A 256-color gradient squeezed into 16 entries.
    let mut pixels = Vec::new();
    for i in 0..=255u16 {
        pixels.extend_from_slice(&[i as u8, (255 - i) as u8, 40, 255]);
    }
    let quantized = quantize(&pixels, 16).unwrap();
    assert_eq!(quantized.palette.len(), 16);
    assert_eq!(quantized.indices.len(), 256);
    // Every index stays within the palette.
    assert!(quantized.indices.iter().all(|&i| (i as usize) < 16));
}

#[test]
fn test_quantize_rejects_ragged_input() {
    assert!(matches!(
        quantize(&[1, 2, 3], 256),
        Err(QuantizeError::InvalidPixelDataLength(3))
    ));
}
